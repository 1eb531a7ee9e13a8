//! Slash commands understood by the bot
//!
//! [`COMMANDS`] is the registry pushed to the chat platform at startup;
//! [`Command`] is a parsed invocation.

use crate::api::Endpoint;
use crate::error::{Result, StockError};
use crate::model::Exchange;

/// Declared option of a slash command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub required: bool,
}

/// Declared slash command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub option: Option<OptionSpec>,
}

/// Name of the company option of `companyinfo`
pub const COMPANY_OPTION: &str = "company";

/// Commands registered with the platform
pub const COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        name: "nseactive",
        description: "Get the top 5 most active NSE stocks",
        option: None,
    },
    CommandSpec {
        name: "bseactive",
        description: "Get the top 5 most active BSE stocks",
        option: None,
    },
    CommandSpec {
        name: "ipoupcoming",
        description: "Get upcoming IPOs",
        option: None,
    },
    CommandSpec {
        name: "companyinfo",
        description: "Get information about a company",
        option: Some(OptionSpec {
            name: COMPANY_OPTION,
            description: "Company name",
            required: true,
        }),
    },
    CommandSpec {
        name: "trendingstocks",
        description: "Show top 3 gainers and losers",
        option: None,
    },
];

/// Registry entry for a command name
pub fn spec(name: &str) -> Option<&'static CommandSpec> {
    COMMANDS.iter().find(|spec| spec.name == name)
}

/// Parsed command invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `nseactive` / `bseactive`
    MostActive(Exchange),
    /// `ipoupcoming`
    UpcomingIpos,
    /// `companyinfo <company>`
    CompanyInfo { company: String },
    /// `trendingstocks`
    Trending,
}

impl Command {
    /// Parse an invocation from its command name and `company` option
    pub fn parse(name: &str, company: Option<&str>) -> Result<Self> {
        match name {
            "nseactive" => Ok(Command::MostActive(Exchange::Nse)),
            "bseactive" => Ok(Command::MostActive(Exchange::Bse)),
            "ipoupcoming" => Ok(Command::UpcomingIpos),
            "companyinfo" => {
                let company = company
                    .map(str::trim)
                    .filter(|c| !c.is_empty())
                    .ok_or(StockError::MissingArgument(COMPANY_OPTION))?;
                Ok(Command::CompanyInfo {
                    company: company.to_string(),
                })
            }
            "trendingstocks" => Ok(Command::Trending),
            _ => Err(StockError::UnknownCommand(name.to_string())),
        }
    }

    /// Registered command name
    pub fn name(&self) -> &'static str {
        match self {
            Command::MostActive(Exchange::Nse) => "nseactive",
            Command::MostActive(Exchange::Bse) => "bseactive",
            Command::UpcomingIpos => "ipoupcoming",
            Command::CompanyInfo { .. } => "companyinfo",
            Command::Trending => "trendingstocks",
        }
    }

    /// Upstream resource backing the command
    pub fn endpoint(&self) -> Endpoint {
        match self {
            Command::MostActive(exchange) => Endpoint::MostActive(*exchange),
            Command::UpcomingIpos => Endpoint::Ipo,
            Command::CompanyInfo { company } => Endpoint::Stock {
                name: company.clone(),
            },
            Command::Trending => Endpoint::Trending,
        }
    }
}
