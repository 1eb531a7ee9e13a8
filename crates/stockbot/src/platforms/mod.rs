//! Platform-specific bot implementations

pub mod discord;

pub use discord::DiscordResponder;
