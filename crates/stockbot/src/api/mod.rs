//! Upstream stock API access
//!
//! [`StockApi`] is the seam between the dispatcher and the network;
//! [`IndianApiClient`] is the production implementation.

pub mod indian_api;

pub use indian_api::IndianApiClient;

use crate::error::Result;
use crate::model::Exchange;
use async_trait::async_trait;
use serde_json::Value;

/// Upstream resource fetched for a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// `/{EXCHANGE}_most_active`
    MostActive(Exchange),
    /// `/ipo`
    Ipo,
    /// `/stock?name=<company>`
    Stock { name: String },
    /// `/trending`
    Trending,
}

impl Endpoint {
    /// Path relative to the API base URL
    pub fn path(&self) -> String {
        match self {
            Endpoint::MostActive(exchange) => format!("{}_most_active", exchange.code()),
            Endpoint::Ipo => "ipo".to_string(),
            Endpoint::Stock { .. } => "stock".to_string(),
            Endpoint::Trending => "trending".to_string(),
        }
    }

    /// Query parameter, if the endpoint takes one
    pub fn query(&self) -> Option<(&'static str, &str)> {
        match self {
            Endpoint::Stock { name } => Some(("name", name.as_str())),
            _ => None,
        }
    }
}

/// Source of raw upstream payloads
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StockApi: Send + Sync {
    /// GET the endpoint and return its decoded JSON body
    async fn fetch(&self, endpoint: Endpoint) -> Result<Value>;
}
