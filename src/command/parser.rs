//! Structure-preserving command list parser
//!
//! Reads `[[index, effect, [args], color, [args], misc?], ...]` without
//! evaluating anything: argument entries and misc text are kept as the source
//! text they were written with.

use serde::Serialize;

use crate::command::model::{is_null_sentinel, ArgToken, Command, CommandList};
use crate::command::splitter::{bracket_body, split_fields};
use crate::command::CommandError;
use crate::namespace::Namespace;

/// Minimum number of fields in one command entry
pub const REQUIRED_FIELDS: usize = 5;

/// Which path produced a command list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ParsePath {
    /// Nothing to parse (absent or blank text)
    Empty,
    /// Bracket structure read directly
    Structured,
    /// Recovered by the fallback evaluator
    Fallback,
}

/// Non-fatal problem found while parsing
#[derive(Debug, Clone, PartialEq)]
pub struct ParseWarning {
    /// Position of the offending entry in the outer list, if entry-specific
    pub entry: Option<usize>,
    pub error: CommandError,
}

impl std::fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.entry {
            Some(entry) => write!(f, "entry {}: {}", entry, self.error),
            None => write!(f, "{}", self.error),
        }
    }
}

/// Parsed commands plus everything that was skipped along the way
#[derive(Debug, Clone, PartialEq)]
pub struct ParseOutcome {
    pub commands: CommandList,
    pub warnings: Vec<ParseWarning>,
    pub path: ParsePath,
}

impl ParseOutcome {
    pub fn empty(path: ParsePath) -> Self {
        Self {
            commands: CommandList::new(),
            warnings: Vec::new(),
            path,
        }
    }

    /// Entries dropped because they could not be read as commands
    pub fn skipped(&self) -> usize {
        self.warnings
            .iter()
            .filter(|w| !matches!(w.error, CommandError::UnknownIdentifier { .. }))
            .count()
    }
}

/// Parse command list text along the structure-preserving path
///
/// Fails with `CommandError::Structural` only when the text as a whole is not
/// a bracketed list with balanced nesting. Problems inside individual entries
/// are recorded as warnings and the entry is skipped.
pub fn parse_structured(text: &str, namespace: &Namespace) -> Result<ParseOutcome, CommandError> {
    let body = bracket_body(text).ok_or_else(|| CommandError::Structural {
        reason: "command list must be enclosed in [ ]".to_string(),
    })?;
    let entries = drop_trailing_empty(split_fields(body)?);

    let mut outcome = ParseOutcome::empty(ParsePath::Structured);
    for (i, entry) in entries.iter().enumerate() {
        match parse_entry(entry) {
            Ok(command) => {
                note_unknown_names(&command, i, namespace, &mut outcome.warnings);
                outcome.commands.push(command);
            }
            Err(error) => {
                tracing::warn!("Skipping command entry {}: {}", i, error);
                outcome.warnings.push(ParseWarning {
                    entry: Some(i),
                    error,
                });
            }
        }
    }

    Ok(outcome)
}

/// Parse a single `[index, effect, args, color, args, misc?]` entry
pub fn parse_entry(entry: &str) -> Result<Command, CommandError> {
    let body = bracket_body(entry).ok_or_else(|| CommandError::MalformedEntry(entry.to_string()))?;
    let fields = drop_trailing_empty(split_fields(body)?);

    let resolvable = fields
        .iter()
        .take(REQUIRED_FIELDS)
        .filter(|f| !unquote(f).is_empty())
        .count();
    if resolvable < REQUIRED_FIELDS {
        return Err(CommandError::FieldCount { found: resolvable });
    }

    let strip = fields[0]
        .parse::<usize>()
        .map_err(|_| CommandError::InvalidIndex(fields[0].to_string()))?;

    let misc = fields.get(REQUIRED_FIELDS..).and_then(misc_text);

    Ok(Command {
        strip,
        effect: parse_ref(fields[1]),
        effect_args: parse_args(fields[2])?,
        color: parse_ref(fields[3]),
        color_args: parse_args(fields[4])?,
        misc,
    })
}

/// A name field; quotes around it are dropped
///
/// Only a bare sentinel means absent: `'None'` is the name `None`.
fn parse_ref(field: &str) -> Option<String> {
    if is_null_sentinel(field) {
        return None;
    }
    Some(unquote(field).to_string())
}

/// Fields past the fifth joined back into one text, trailing empties dropped
fn misc_text(fields: &[&str]) -> Option<String> {
    let used = fields
        .iter()
        .rposition(|f| !f.is_empty())
        .map_or(0, |last| last + 1);
    let text = fields[..used].join(", ");
    if text.is_empty() || is_null_sentinel(&text) {
        None
    } else {
        Some(text)
    }
}

/// An argument field: null, a bracketed list, or a single bare value
fn parse_args(field: &str) -> Result<Option<Vec<ArgToken>>, CommandError> {
    if is_null_sentinel(field) {
        return Ok(None);
    }
    let Some(body) = bracket_body(field) else {
        return Ok(Some(vec![ArgToken::new(field)]));
    };

    let items = drop_trailing_empty(split_fields(body)?);
    if items.iter().any(|item| item.is_empty()) {
        return Err(CommandError::MalformedEntry(format!(
            "empty argument in {}",
            field
        )));
    }
    Ok(Some(items.into_iter().map(ArgToken::new).collect()))
}

fn unquote(field: &str) -> &str {
    for quote in ['\'', '"'] {
        if field.len() >= 2 && field.starts_with(quote) && field.ends_with(quote) {
            return &field[1..field.len() - 1];
        }
    }
    field
}

/// `[a, b,]` reads like `[a, b]`
fn drop_trailing_empty(mut fields: Vec<&str>) -> Vec<&str> {
    if fields.last().is_some_and(|f| f.is_empty()) {
        fields.pop();
    }
    fields
}

fn note_unknown_names(
    command: &Command,
    entry: usize,
    namespace: &Namespace,
    warnings: &mut Vec<ParseWarning>,
) {
    for name in [&command.effect, &command.color].into_iter().flatten() {
        if !namespace.knows(name) {
            tracing::debug!("Entry {} uses unknown name {}", entry, name);
            warnings.push(ParseWarning {
                entry: Some(entry),
                error: CommandError::UnknownIdentifier { name: name.clone() },
            });
        }
    }
}
