//! Command dispatcher
//!
//! Drives one invocation through `received -> deferred -> completed`: the
//! command is acknowledged, its endpoint fetched once, the payload formatted
//! and exactly one final reply sent. Errors after the acknowledgement become
//! a failure reply; nothing propagates to the caller.

use crate::api::StockApi;
use crate::bot::commands::Command;
use crate::error::{Result, StockError};
use crate::interface::formatter::{self, EmptyResult};
use crate::interface::Responder;
use crate::model::{CompanyProfile, IpoCalendar, StockQuote, TrendingSet};
use std::sync::Arc;
use tracing::{debug, error, warn};

/// How an invocation ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Not one of our commands; nothing was sent
    Ignored,
    /// Formatted data was sent
    Content,
    /// The command's "no data" message was sent
    Empty,
    /// The failure message was sent
    Failed,
    /// The acknowledgement failed, so no reply was attempted
    Abandoned,
    /// Deferred, but sending the final reply failed
    Undelivered,
}

/// Rendered reply body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Content(String),
    Empty(EmptyResult),
}

/// Routes invocations to the upstream API and the formatter
#[derive(Clone)]
pub struct Dispatcher {
    api: Arc<dyn StockApi>,
}

impl Dispatcher {
    pub fn new(api: Arc<dyn StockApi>) -> Self {
        Self { api }
    }

    /// Handle one invocation end to end
    pub async fn dispatch(
        &self,
        name: &str,
        company: Option<&str>,
        responder: &dyn Responder,
    ) -> Outcome {
        let parsed = match Command::parse(name, company) {
            Err(StockError::UnknownCommand(_)) => {
                debug!(command = name, "ignoring unknown command");
                return Outcome::Ignored;
            }
            parsed => parsed,
        };

        if let Err(err) = responder.defer().await {
            warn!(command = name, error = %err, "failed to defer interaction");
            return Outcome::Abandoned;
        }
        debug!(command = name, "deferred");

        let rendered = match parsed {
            Ok(command) => self.render(&command).await,
            Err(err) => Err(err),
        };

        let (content, outcome) = match rendered {
            Ok(Reply::Content(content)) => (content, Outcome::Content),
            Ok(Reply::Empty(empty)) => {
                debug!(command = name, ?empty, "no data");
                (empty.to_string(), Outcome::Empty)
            }
            Err(err) => {
                error!(command = name, error = %err, "command failed");
                (formatter::failure(failure_detail(&err).as_deref()), Outcome::Failed)
            }
        };

        if let Err(err) = responder.reply(&formatter::fit_message(&content)).await {
            error!(command = name, error = %err, "failed to send reply");
            return Outcome::Undelivered;
        }

        debug!(command = name, ?outcome, "completed");
        outcome
    }

    /// Fetch and format the reply for a parsed command
    pub async fn render(&self, command: &Command) -> Result<Reply> {
        let payload = self.api.fetch(command.endpoint()).await?;

        let reply = match command {
            Command::MostActive(exchange) => {
                let quotes = StockQuote::list_from(payload);
                if quotes.is_empty() {
                    Reply::Empty(EmptyResult::MostActive(*exchange))
                } else {
                    Reply::Content(formatter::most_active(*exchange, &quotes))
                }
            }
            Command::UpcomingIpos => {
                let calendar = IpoCalendar::from_value(payload);
                if calendar.upcoming.is_empty() {
                    Reply::Empty(EmptyResult::UpcomingIpos)
                } else {
                    Reply::Content(formatter::upcoming_ipos(&calendar.upcoming))
                }
            }
            Command::CompanyInfo { .. } => {
                let profile = CompanyProfile::from_value(payload);
                if profile.is_found() {
                    Reply::Content(formatter::company_info(&profile))
                } else {
                    Reply::Empty(EmptyResult::CompanyNotFound)
                }
            }
            Command::Trending => {
                let set = TrendingSet::from_value(payload);
                if set.is_empty() {
                    Reply::Empty(EmptyResult::Trending)
                } else {
                    Reply::Content(formatter::trending(&set.top_gainers, &set.top_losers))
                }
            }
        };

        Ok(reply)
    }
}

/// Part of an error worth showing to the user
fn failure_detail(err: &StockError) -> Option<String> {
    match err {
        StockError::MissingArgument(_) => Some(err.to_string()),
        _ => err.upstream_message().map(str::to_string),
    }
}
