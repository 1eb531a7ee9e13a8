//! Indian stock market Discord bot
//!
//! Serves market data from the IndianAPI stock service through five slash
//! commands:
//!
//! - `/nseactive`, `/bseactive`: most active stocks on NSE or BSE
//! - `/ipoupcoming`: the upcoming IPO calendar
//! - `/companyinfo <company>`: a company profile card
//! - `/trendingstocks`: top gainers and losers
//!
//! # Architecture
//!
//! Each invocation flows through the [`Dispatcher`]: it is deferred, the
//! matching endpoint is fetched once through [`StockApi`], the payload is read
//! into the lenient views in [`model`] and rendered by
//! [`interface::formatter`], and exactly one reply is sent through a
//! [`interface::Responder`]. A small HTTP listener in [`keepalive`] answers
//! hosting health pings.
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

pub mod api;
pub mod bot;
pub mod config;
pub mod error;
pub mod interface;
pub mod keepalive;
pub mod model;
pub mod platforms;

// Re-export main types for convenience
pub use api::{Endpoint, IndianApiClient, StockApi};
pub use bot::{Command, Dispatcher, Outcome, StockBot};
pub use config::{BotConfig, BotConfigBuilder};
pub use error::{Result, StockError, UpstreamError};
pub use model::Exchange;
