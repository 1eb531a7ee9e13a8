//! Configuration for the stock bot

use crate::error::{Result, StockError};
use std::fmt;
use stockbot_utils::Vars;

/// Default upstream stock API
pub const DEFAULT_API_BASE_URL: &str = "https://stock.indianapi.in";

/// Default keep-alive port
pub const DEFAULT_KEEPALIVE_PORT: u16 = 3000;

pub const ENV_DISCORD_TOKEN: &str = "DISCORD_BOT_TOKEN";
pub const ENV_CLIENT_ID: &str = "CLIENT_ID";
pub const ENV_API_KEY: &str = "INDIAN_API_KEY";
pub const ENV_API_BASE_URL: &str = "INDIAN_API_BASE_URL";
pub const ENV_PORT: &str = "PORT";

/// Process configuration, loaded once at startup
#[derive(Clone)]
pub struct BotConfig {
    /// Discord bot token
    pub discord_token: String,

    /// Discord application id used for command registration
    pub application_id: u64,

    /// Upstream API key sent as `x-api-key`
    pub api_key: String,

    /// Upstream base URL
    pub api_base_url: String,

    /// Keep-alive port, `None` disables the listener
    pub keepalive_port: Option<u16>,

    /// Push the slash command list on startup
    pub register_commands: bool,
}

impl fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BotConfig")
            .field("discord_token", &"<redacted>")
            .field("application_id", &self.application_id)
            .field("api_key", &"<redacted>")
            .field("api_base_url", &self.api_base_url)
            .field("keepalive_port", &self.keepalive_port)
            .field("register_commands", &self.register_commands)
            .finish()
    }
}

impl BotConfig {
    /// Create a new configuration builder
    pub fn builder() -> BotConfigBuilder {
        BotConfigBuilder::default()
    }

    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::builder().with_vars(&Vars::process())?.build()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.discord_token.trim().is_empty() {
            return Err(StockError::ConfigError(format!("{ENV_DISCORD_TOKEN} is empty")));
        }

        if self.application_id == 0 {
            return Err(StockError::ConfigError(format!(
                "{ENV_CLIENT_ID} must be a non-zero application id"
            )));
        }

        if self.api_key.trim().is_empty() {
            return Err(StockError::ConfigError(format!("{ENV_API_KEY} is empty")));
        }

        url::Url::parse(&self.api_base_url).map_err(|e| {
            StockError::ConfigError(format!("invalid API base URL {}: {e}", self.api_base_url))
        })?;

        Ok(())
    }
}

/// Builder for BotConfig
#[derive(Debug, Default)]
pub struct BotConfigBuilder {
    discord_token: Option<String>,
    application_id: Option<u64>,
    api_key: Option<String>,
    api_base_url: Option<String>,
    keepalive_port: Option<Option<u16>>,
    register_commands: Option<bool>,
}

impl BotConfigBuilder {
    /// Set the Discord bot token
    pub fn discord_token(mut self, token: impl Into<String>) -> Self {
        self.discord_token = Some(token.into());
        self
    }

    /// Set the Discord application id
    pub fn application_id(mut self, id: u64) -> Self {
        self.application_id = Some(id);
        self
    }

    /// Set the upstream API key
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Override the upstream base URL
    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = Some(url.into());
        self
    }

    /// Set the keep-alive port, `None` disables it
    pub fn keepalive_port(mut self, port: Option<u16>) -> Self {
        self.keepalive_port = Some(port);
        self
    }

    /// Enable or disable startup command registration
    pub fn register_commands(mut self, register: bool) -> Self {
        self.register_commands = Some(register);
        self
    }

    /// Fill unset fields from configuration variables.
    ///
    /// Values already set on the builder take precedence.
    pub fn with_vars<F>(mut self, vars: &Vars<F>) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if self.discord_token.is_none() {
            self.discord_token = Some(vars.required(ENV_DISCORD_TOKEN)?);
        }
        if self.application_id.is_none() {
            self.application_id = vars.parse(ENV_CLIENT_ID)?;
            if self.application_id.is_none() {
                return Err(StockError::ConfigError(format!("{ENV_CLIENT_ID} not set")));
            }
        }
        if self.api_key.is_none() {
            self.api_key = Some(vars.required(ENV_API_KEY)?);
        }
        if self.api_base_url.is_none() {
            self.api_base_url = vars.optional(ENV_API_BASE_URL);
        }
        if self.keepalive_port.is_none() {
            if let Some(port) = vars.parse::<u16>(ENV_PORT)? {
                self.keepalive_port = Some(Some(port));
            }
        }
        Ok(self)
    }

    /// Build the configuration
    pub fn build(self) -> Result<BotConfig> {
        let config = BotConfig {
            discord_token: self
                .discord_token
                .ok_or_else(|| StockError::ConfigError(format!("{ENV_DISCORD_TOKEN} not set")))?,
            application_id: self
                .application_id
                .ok_or_else(|| StockError::ConfigError(format!("{ENV_CLIENT_ID} not set")))?,
            api_key: self
                .api_key
                .ok_or_else(|| StockError::ConfigError(format!("{ENV_API_KEY} not set")))?,
            api_base_url: self
                .api_base_url
                .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
            keepalive_port: self.keepalive_port.unwrap_or(Some(DEFAULT_KEEPALIVE_PORT)),
            register_commands: self.register_commands.unwrap_or(true),
        };

        config.validate()?;
        Ok(config)
    }
}
