//! Button press handling
//!
//! Parses the pressed cell's command text, evaluates each argument token
//! right before its bind, and fires the cell's trigger texts. Nothing here
//! returns an error to the caller: failures are logged and collected in the
//! `ApplyReport`.

use crate::command::expression::{Expr, Value};
use crate::command::fallback::{seed_bindings, MAX_BIND_RETRIES};
use crate::command::{self, ArgToken, ParsePath};
use crate::core::error::{PadError, Result};
use crate::core::types::{Clock, GridPos, Tempo};
use crate::grid::cell::GridCell;
use crate::grid::document::Grid;
use crate::lighting::{LightingSystem, StripBinding};
use crate::namespace::Namespace;
use crate::trigger::{GenericExecutor, HttpTrigger};

/// Identifiers bound to the current tempo in argument expressions
const TEMPO_NAMES: [&str; 2] = ["default_bpm", "bpm"];

/// Everything a press reads besides the cell itself
#[derive(Clone, Copy)]
pub struct ApplyContext<'a> {
    pub namespace: &'a Namespace,
    pub tempo: Tempo,
    pub clock: &'a dyn Clock,
}

impl<'a> ApplyContext<'a> {
    pub fn new(namespace: &'a Namespace, tempo: Tempo, clock: &'a dyn Clock) -> Self {
        Self {
            namespace,
            tempo,
            clock,
        }
    }

    /// Evaluate one argument token against the namespace, tempo and clock
    ///
    /// Tokens that do not parse or evaluate are passed on as text.
    pub fn evaluate_arg(&self, token: &ArgToken) -> Value {
        if let Some(n) = token.as_number() {
            return Value::Number(n);
        }
        let expr = match Expr::parse(token.as_str()) {
            Ok(expr) => expr,
            Err(e) => {
                tracing::warn!("Argument '{}' passed as text: {}", token, e);
                return Value::Text(token.as_str().to_string());
            }
        };

        let mut bindings = seed_bindings(self.namespace, self.clock);
        for name in TEMPO_NAMES {
            bindings.bind(name, Value::Number(self.tempo.bpm));
        }
        match bindings.eval_binding_unknowns(&expr, MAX_BIND_RETRIES) {
            Ok((value, _)) => value,
            Err(e) => {
                tracing::warn!("Argument '{}' passed as text: {}", token, e);
                Value::Text(token.as_str().to_string())
            }
        }
    }

    pub fn evaluate_args(&self, tokens: Option<&[ArgToken]>) -> Option<Vec<Value>> {
        tokens.map(|tokens| tokens.iter().map(|t| self.evaluate_arg(t)).collect())
    }
}

/// What a press did
#[derive(Debug, Clone, PartialEq)]
pub struct ApplyReport {
    pub path: ParsePath,
    pub strips_bound: usize,
    pub misc_sent: usize,
    pub http_fired: bool,
    pub legacy_fired: bool,
    /// Parse warnings and collaborator failures, in the order they happened
    pub problems: Vec<String>,
}

impl ApplyReport {
    fn new(path: ParsePath) -> Self {
        Self {
            path,
            strips_bound: 0,
            misc_sent: 0,
            http_fired: false,
            legacy_fired: false,
            problems: Vec::new(),
        }
    }

    pub fn is_clean(&self) -> bool {
        self.problems.is_empty()
    }
}

/// Apply a cell's configuration to the collaborators
///
/// Commands bind in list order, so a later command for the same strip wins.
/// Each command's misc text goes to `exec` right after its bind; then the
/// cell's `aux_trigger` goes to `http` and its `legacy_misc` to `exec`.
pub fn apply_on_press(
    cell: &GridCell,
    ctx: &ApplyContext<'_>,
    lighting: &mut dyn LightingSystem,
    http: &mut dyn HttpTrigger,
    exec: &mut dyn GenericExecutor,
) -> ApplyReport {
    let outcome = command::parse_optional(cell.command_text.as_deref(), ctx.namespace, ctx.clock);
    let mut report = ApplyReport::new(outcome.path);
    for warning in &outcome.warnings {
        tracing::warn!("Command text: {}", warning);
        report.problems.push(warning.to_string());
    }

    for cmd in &outcome.commands {
        let effect_args = ctx.evaluate_args(cmd.effect_args.as_deref());
        let color_args = ctx.evaluate_args(cmd.color_args.as_deref());
        let binding = StripBinding {
            index: cmd.strip,
            effect: cmd.effect.as_deref(),
            effect_args: effect_args.as_deref(),
            color: cmd.color.as_deref(),
            color_args: color_args.as_deref(),
        };

        match lighting.bind_strip(binding, ctx.tempo) {
            Ok(()) => report.strips_bound += 1,
            Err(e) => {
                tracing::warn!("Bind of strip {} failed: {}", cmd.strip, e);
                report.problems.push(e.to_string());
            }
        }

        if let Some(misc) = &cmd.misc {
            match exec.execute(misc) {
                Ok(()) => report.misc_sent += 1,
                Err(e) => report.problems.push(e.to_string()),
            }
        }
    }

    if let Some(aux) = &cell.aux_trigger {
        match http.execute(aux) {
            Ok(()) => report.http_fired = true,
            Err(e) => {
                tracing::warn!("HTTP trigger failed: {}", e);
                report.problems.push(e.to_string());
            }
        }
    }

    if let Some(legacy) = &cell.legacy_misc {
        match exec.execute(legacy) {
            Ok(()) => report.legacy_fired = true,
            Err(e) => report.problems.push(e.to_string()),
        }
    }

    report
}

/// Toggle the button at `pos` and apply its configuration
pub fn press_button(
    grid: &mut Grid,
    pos: GridPos,
    ctx: &ApplyContext<'_>,
    lighting: &mut dyn LightingSystem,
    http: &mut dyn HttpTrigger,
    exec: &mut dyn GenericExecutor,
) -> Result<ApplyReport> {
    let lit = grid.toggle(pos)?;
    tracing::debug!("Button ({}, {}) pressed, LED {}", pos.row, pos.col, if lit { "on" } else { "off" });
    let cell = grid.cell(pos).ok_or(PadError::InvalidPosition {
        row: pos.row,
        col: pos.col,
    })?;
    Ok(apply_on_press(cell, ctx, lighting, http, exec))
}
