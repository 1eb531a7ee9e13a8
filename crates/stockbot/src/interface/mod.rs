//! Platform-facing interfaces
//!
//! The reply protocol every chat platform adapter implements, and the
//! formatting of replies.

pub mod formatter;
pub mod responder;

pub use formatter::EmptyResult;
pub use responder::Responder;
