//! Button command language
//!
//! Raw command text -> structured parser (fallback evaluator on structural
//! failure) -> `CommandList` -> either applied to the lights or serialized
//! back to canonical text for storage.

pub mod expression;
pub mod fallback;
pub mod model;
pub mod parser;
pub mod serializer;
pub mod splitter;

use thiserror::Error;

use crate::core::types::Clock;
use crate::namespace::Namespace;

pub use expression::{Bindings, EvalError, Expr, ExprParseError, Value};
pub use fallback::{FallbackEvaluator, MAX_BIND_RETRIES};
pub use model::{ArgToken, Command, CommandList};
pub use parser::{parse_structured, ParseOutcome, ParsePath, ParseWarning};
pub use serializer::serialize;
pub use splitter::split_fields;

/// Problems in command text
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CommandError {
    /// Brackets do not balance, or the text is not a bracketed list
    #[error("Structural error: {reason}")]
    Structural { reason: String },

    #[error("Command has {found} resolvable fields, needs 5")]
    FieldCount { found: usize },

    #[error("Invalid strip index: {0}")]
    InvalidIndex(String),

    #[error("Malformed command entry: {0}")]
    MalformedEntry(String),

    /// Never fatal; the name is used verbatim
    #[error("Unknown identifier: {name}")]
    UnknownIdentifier { name: String },

    #[error("Evaluation failed: {0}")]
    Evaluation(String),

    /// An edited field that would not survive serialization
    #[error("Invalid {field} '{value}': {reason}")]
    InvalidField {
        field: &'static str,
        value: String,
        reason: &'static str,
    },
}

/// Parse command text, falling back to the evaluator on structural failure
///
/// Never fails: blank text gives an empty list, and unrecoverable text gives
/// an empty list with warnings.
pub fn parse_command_list(text: &str, namespace: &Namespace, clock: &dyn Clock) -> ParseOutcome {
    if text.trim().is_empty() {
        return ParseOutcome::empty(ParsePath::Empty);
    }

    match parse_structured(text, namespace) {
        Ok(outcome) => outcome,
        Err(error) => {
            tracing::debug!("Structured parse failed ({}), trying fallback evaluator", error);
            let mut outcome = fallback::recover(text, namespace, clock);
            outcome.warnings.insert(0, ParseWarning { entry: None, error });
            outcome
        }
    }
}

/// Parse optional cell text; absent text is an empty list
pub fn parse_optional(text: Option<&str>, namespace: &Namespace, clock: &dyn Clock) -> ParseOutcome {
    match text {
        Some(text) => parse_command_list(text, namespace, clock),
        None => ParseOutcome::empty(ParsePath::Empty),
    }
}
