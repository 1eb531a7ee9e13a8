//! Error types for the stock bot

use poise::serenity_prelude as serenity;
use stockbot_utils::EnvError;
use thiserror::Error;

/// Failures talking to the upstream stock API
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Connection, TLS or body read failure
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Upstream answered with a non-2xx status
    #[error("HTTP {status}: {}", .message.as_deref().unwrap_or("no message"))]
    Status {
        status: u16,
        message: Option<String>,
    },

    /// Body was not valid JSON
    #[error("malformed payload: {0}")]
    Malformed(#[from] serde_json::Error),
}

impl UpstreamError {
    /// Message supplied by the upstream API, if it sent one
    pub fn upstream_message(&self) -> Option<&str> {
        match self {
            UpstreamError::Status { message, .. } => message.as_deref(),
            UpstreamError::Network(_) | UpstreamError::Malformed(_) => None,
        }
    }
}

/// Stock bot errors
#[derive(Debug, Error)]
pub enum StockError {
    /// Stock API request failed
    #[error("Upstream error: {0}")]
    Upstream(#[from] UpstreamError),

    /// Command name not handled by this bot
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    /// Required command option was not supplied
    #[error("Missing required option `{0}`")]
    MissingArgument(&'static str),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Acknowledging or answering an interaction failed
    #[error("Reply failed: {0}")]
    Reply(String),

    /// Slash command registration failed
    #[error("Command registration failed: {0}")]
    Registration(String),

    /// Discord client error
    #[error("Discord error: {0}")]
    Discord(#[from] Box<serenity::Error>),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for stock bot operations
pub type Result<T> = std::result::Result<T, StockError>;

impl StockError {
    /// Upstream-provided message carried by this error
    pub fn upstream_message(&self) -> Option<&str> {
        match self {
            StockError::Upstream(err) => err.upstream_message(),
            _ => None,
        }
    }
}

impl From<serenity::Error> for StockError {
    fn from(err: serenity::Error) -> Self {
        StockError::Discord(Box::new(err))
    }
}

impl From<EnvError> for StockError {
    fn from(err: EnvError) -> Self {
        StockError::ConfigError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StockError::UnknownCommand("ping".to_string());
        assert_eq!(err.to_string(), "Unknown command: ping");

        let err = StockError::from(UpstreamError::Status {
            status: 429,
            message: Some("Rate limit exceeded".to_string()),
        });
        assert_eq!(err.to_string(), "Upstream error: HTTP 429: Rate limit exceeded");

        let err = UpstreamError::Status {
            status: 502,
            message: None,
        };
        assert_eq!(err.to_string(), "HTTP 502: no message");
    }

    #[test]
    fn test_upstream_message() {
        let err = StockError::from(UpstreamError::Status {
            status: 401,
            message: Some("Invalid API key".to_string()),
        });
        assert_eq!(err.upstream_message(), Some("Invalid API key"));

        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = StockError::from(UpstreamError::from(json_err));
        assert_eq!(err.upstream_message(), None);

        assert_eq!(StockError::MissingArgument("company").upstream_message(), None);
    }

    #[test]
    fn test_env_error_conversion() {
        let err: StockError = EnvError::Missing("INDIAN_API_KEY".to_string()).into();
        match err {
            StockError::ConfigError(msg) => assert_eq!(msg, "INDIAN_API_KEY not set"),
            other => panic!("Expected ConfigError, got {other:?}"),
        }
    }
}
