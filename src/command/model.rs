//! In-memory form of a button's command text

use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::types::StripIndex;

/// Tokens that mean "absent" wherever a name, argument list or misc text is expected
pub const NULL_SENTINELS: [&str; 2] = ["None", "null"];

/// Sentinel written by the serializer for absent fields
pub const NULL_TOKEN: &str = "None";

pub fn is_null_sentinel(text: &str) -> bool {
    NULL_SENTINELS.contains(&text.trim())
}

/// One argument, kept as the source text it was written with
///
/// Evaluation is deferred until the command is applied, so an argument such
/// as `time() % 4` is re-read on every press.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
pub struct ArgToken(String);

impl ArgToken {
    pub fn new(source: impl Into<String>) -> Self {
        let source: String = source.into();
        Self(source.trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The numeric value when the token is a plain number literal
    pub fn as_number(&self) -> Option<f64> {
        self.0.parse::<f64>().ok().filter(|n| n.is_finite())
    }

    pub fn is_numeric(&self) -> bool {
        self.as_number().is_some()
    }
}

impl From<&str> for ArgToken {
    fn from(source: &str) -> Self {
        Self::new(source)
    }
}

impl From<f64> for ArgToken {
    fn from(value: f64) -> Self {
        Self(value.to_string())
    }
}

/// One strip's effect/color binding
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Command {
    pub strip: StripIndex,
    pub effect: Option<String>,
    pub effect_args: Option<Vec<ArgToken>>,
    pub color: Option<String>,
    pub color_args: Option<Vec<ArgToken>>,
    /// Trailing text handed to the executor at apply time, never interpreted here
    pub misc: Option<String>,
}

impl Command {
    pub fn new(strip: StripIndex) -> Self {
        Self {
            strip,
            ..Self::default()
        }
    }

    pub fn with_effect<I, T>(mut self, name: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<ArgToken>,
    {
        self.effect = Some(name.into());
        self.effect_args = Some(args.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_color<I, T>(mut self, name: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<ArgToken>,
    {
        self.color = Some(name.into());
        self.color_args = Some(args.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_misc(mut self, misc: impl Into<String>) -> Self {
        let misc: String = misc.into();
        let misc = misc.trim();
        self.misc = if misc.is_empty() { None } else { Some(misc.to_string()) };
        self
    }

    /// Overlay the fields `later` supplies onto this command
    pub fn merge_from(&mut self, later: &Command) {
        if later.effect.is_some() {
            self.effect = later.effect.clone();
        }
        if later.effect_args.is_some() {
            self.effect_args = later.effect_args.clone();
        }
        if later.color.is_some() {
            self.color = later.color.clone();
        }
        if later.color_args.is_some() {
            self.color_args = later.color_args.clone();
        }
        if later.misc.is_some() {
            self.misc = later.misc.clone();
        }
    }
}

/// Ordered commands parsed from one button
///
/// Order matters: when two commands address the same strip, the later one
/// wins when applied.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CommandList {
    commands: Vec<Command>,
}

impl CommandList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: Command) {
        self.commands.push(command);
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Command> {
        self.commands.iter()
    }

    pub fn as_slice(&self) -> &[Command] {
        &self.commands
    }

    /// Distinct strip indices in ascending order
    pub fn strip_indices(&self) -> Vec<StripIndex> {
        let mut indices: Vec<StripIndex> = self.commands.iter().map(|c| c.strip).collect();
        indices.sort_unstable();
        indices.dedup();
        indices
    }

    /// Collapse the list to one command per strip, later fields overriding earlier ones
    pub fn merged_by_strip(&self) -> BTreeMap<StripIndex, Command> {
        let mut merged: BTreeMap<StripIndex, Command> = BTreeMap::new();
        for command in &self.commands {
            merged
                .entry(command.strip)
                .and_modify(|existing| existing.merge_from(command))
                .or_insert_with(|| command.clone());
        }
        merged
    }
}

impl From<Vec<Command>> for CommandList {
    fn from(commands: Vec<Command>) -> Self {
        Self { commands }
    }
}

impl FromIterator<Command> for CommandList {
    fn from_iter<I: IntoIterator<Item = Command>>(iter: I) -> Self {
        Self {
            commands: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for CommandList {
    type Item = Command;
    type IntoIter = std::vec::IntoIter<Command>;

    fn into_iter(self) -> Self::IntoIter {
        self.commands.into_iter()
    }
}

impl<'a> IntoIterator for &'a CommandList {
    type Item = &'a Command;
    type IntoIter = std::slice::Iter<'a, Command>;

    fn into_iter(self) -> Self::IntoIter {
        self.commands.iter()
    }
}
