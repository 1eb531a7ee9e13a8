//! Shared utilities for stockbot
//!
//! Logging setup and environment variable helpers used by the bot crate and
//! its binary.

pub mod env;
pub mod logging;

pub use env::{EnvError, Vars};
pub use logging::{LogFormat, init_tracing};
