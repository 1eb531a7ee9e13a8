//! Reply handle for a single command invocation

use crate::error::Result;
use async_trait::async_trait;

/// Two-phase reply protocol of a slash command interaction.
///
/// The dispatcher calls [`Responder::defer`] once, right after recognizing
/// the command, and [`Responder::reply`] once with the final content.
#[async_trait]
pub trait Responder: Send + Sync {
    /// Acknowledge the interaction and reserve the window for a later reply
    async fn defer(&self) -> Result<()>;

    /// Send the content-bearing reply
    async fn reply(&self, content: &str) -> Result<()>;
}
