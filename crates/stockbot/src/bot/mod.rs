//! Stock Market Bot
//!
//! Wires the upstream client, the command dispatcher, the Discord adapter
//! and the keep-alive listener together.
//!
//! # Example
//!
//! ```rust,ignore
//! use stockbot::{BotConfig, StockBot};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = BotConfig::from_env()?;
//!     StockBot::new(config)?.run().await?;
//!     Ok(())
//! }
//! ```

pub mod commands;
pub mod dispatcher;

use crate::api::{IndianApiClient, StockApi};
use crate::config::BotConfig;
use crate::error::Result;
use crate::keepalive;
use crate::platforms::discord;
use std::sync::Arc;
use tracing::info;

pub use commands::{COMMANDS, Command};
pub use dispatcher::{Dispatcher, Outcome};

/// Stock Market Bot
pub struct StockBot {
    config: BotConfig,
    dispatcher: Dispatcher,
}

impl StockBot {
    /// Create a bot backed by the IndianAPI client
    pub fn new(config: BotConfig) -> Result<Self> {
        config.validate()?;
        let api = IndianApiClient::from_config(&config)?;
        Ok(Self::with_api(config, Arc::new(api)))
    }

    /// Create a bot backed by any stock data source
    pub fn with_api(config: BotConfig, api: Arc<dyn StockApi>) -> Self {
        Self {
            config,
            dispatcher: Dispatcher::new(api),
        }
    }

    pub fn config(&self) -> &BotConfig {
        &self.config
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Start the keep-alive listener and serve Discord until shutdown
    pub async fn run(self) -> Result<()> {
        self.config.validate()?;

        let keepalive = match self.config.keepalive_port {
            Some(port) => Some(keepalive::spawn(port).await?),
            None => {
                info!("keep-alive server disabled");
                None
            }
        };

        let result = discord::run(&self.config, self.dispatcher).await;

        if let Some(handle) = keepalive {
            handle.abort();
        }
        result
    }
}
