//! Side-effect collaborators fired by a button press
//!
//! A cell's `auxTrigger` goes to an `HttpTrigger`; its `legacyMisc` and every
//! command's `misc` text go to a `GenericExecutor`. Neither is ever handed
//! to an interpreter.

pub mod exec;
pub mod http;

use crate::core::error::Result;

pub use exec::LoggedExecutor;
pub use http::{HttpMethod, HttpRequestSpec, LoggedTrigger, ReqwestTrigger};

/// Fires the HTTP request described by a cell's trigger text
pub trait HttpTrigger {
    fn execute(&mut self, text: &str) -> Result<()>;
}

/// Receives free-form misc text
pub trait GenericExecutor {
    fn execute(&mut self, text: &str) -> Result<()>;
}
