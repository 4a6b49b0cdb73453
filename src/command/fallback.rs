//! Fallback evaluator for command text the structured parser cannot read
//!
//! The whole text is evaluated as one expression of the closed grammar in
//! `command::expression` against a namespace seeded with the null sentinels,
//! every effect and color name (bound to itself), the catalog constants and a
//! `time` placeholder. Free identifiers are bound to their own name and the
//! evaluation retried, at most `MAX_BIND_RETRIES` times. Any failure yields an
//! empty command list.
//!
//! Recovered argument and misc text is the canonical rendering of the parsed
//! expression, not a slice of the input: `1e3` comes back as `1000`, `0.50`
//! as `0.5` and `(x+1)*2` as `(x + 1) * 2`. The value each token evaluates to
//! is unchanged.

use crate::command::expression::{Bindings, Expr, Value, TIME_ACCESSOR};
use crate::command::model::{ArgToken, Command, NULL_SENTINELS};
use crate::command::parser::{ParseOutcome, ParsePath, ParseWarning, REQUIRED_FIELDS};
use crate::command::CommandError;
use crate::core::types::Clock;
use crate::namespace::Namespace;

/// How many unknown identifiers may be bound to their own name before giving up
pub const MAX_BIND_RETRIES: usize = 25;

/// Bindings visible to fallback evaluation and apply-time argument evaluation
pub fn seed_bindings<'c>(namespace: &Namespace, clock: &'c dyn Clock) -> Bindings<'c> {
    let mut bindings = Bindings::new(clock);
    for sentinel in NULL_SENTINELS {
        bindings.bind(sentinel, Value::Null);
    }
    for name in namespace.effect_names().iter().chain(namespace.color_names()) {
        bindings.bind(name.clone(), Value::Text(name.clone()));
    }
    for (name, value) in namespace.constants() {
        bindings.bind(name, Value::Number(value));
    }
    // Display-only: the number changes on every read
    let now = bindings.now();
    bindings.bind(TIME_ACCESSOR, Value::Number(now));
    bindings
}

/// An evaluated expression together with the tree it came from
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluated {
    pub expr: Expr,
    pub value: Value,
    /// Identifiers that were bound to their own name during evaluation
    pub self_bound: Vec<String>,
}

/// Tolerant recovery path over a restricted namespace
pub struct FallbackEvaluator<'a> {
    namespace: &'a Namespace,
    clock: &'a dyn Clock,
    max_retries: usize,
}

impl<'a> FallbackEvaluator<'a> {
    pub fn new(namespace: &'a Namespace, clock: &'a dyn Clock) -> Self {
        Self {
            namespace,
            clock,
            max_retries: MAX_BIND_RETRIES,
        }
    }

    /// Evaluate the text; the resulting value is for display only
    pub fn evaluate(&self, text: &str) -> Result<Evaluated, CommandError> {
        let expr = Expr::parse(text).map_err(|e| CommandError::Evaluation(e.to_string()))?;
        let mut bindings = seed_bindings(self.namespace, self.clock);
        let (value, self_bound) = bindings
            .eval_binding_unknowns(&expr, self.max_retries)
            .map_err(|e| CommandError::Evaluation(e.to_string()))?;
        Ok(Evaluated {
            expr,
            value,
            self_bound,
        })
    }

    /// Recover a command list; never fails, returns an empty list instead
    pub fn recover(&self, text: &str) -> ParseOutcome {
        let mut outcome = ParseOutcome::empty(ParsePath::Fallback);

        let evaluated = match self.evaluate(text) {
            Ok(evaluated) => evaluated,
            Err(error) => {
                tracing::warn!("Fallback evaluation failed: {}", error);
                outcome.warnings.push(ParseWarning { entry: None, error });
                return outcome;
            }
        };

        for name in &evaluated.self_bound {
            outcome.warnings.push(ParseWarning {
                entry: None,
                error: CommandError::UnknownIdentifier { name: name.clone() },
            });
        }

        let (Expr::List(entry_exprs), Value::List(entry_values)) =
            (&evaluated.expr, &evaluated.value)
        else {
            outcome.warnings.push(ParseWarning {
                entry: None,
                error: CommandError::Evaluation(format!(
                    "expected a list of commands, got {}",
                    evaluated.value
                )),
            });
            return outcome;
        };

        for (i, (expr, value)) in entry_exprs.iter().zip(entry_values).enumerate() {
            match command_from_value(expr, value) {
                Ok(command) => outcome.commands.push(command),
                Err(error) => {
                    tracing::warn!("Skipping recovered entry {}: {}", i, error);
                    outcome.warnings.push(ParseWarning {
                        entry: Some(i),
                        error,
                    });
                }
            }
        }

        outcome
    }
}

/// Build a command from one evaluated entry
///
/// Structure (index, names, nulls) comes from the value; argument and misc
/// text comes from the expression so dynamic arguments stay unevaluated.
fn command_from_value(expr: &Expr, value: &Value) -> Result<Command, CommandError> {
    let (Expr::List(field_exprs), Value::List(field_values)) = (expr, value) else {
        return Err(CommandError::MalformedEntry(expr.to_string()));
    };
    if field_values.len() < REQUIRED_FIELDS {
        return Err(CommandError::FieldCount {
            found: field_values.len(),
        });
    }

    let strip = match field_values[0] {
        Value::Number(n) if n >= 0.0 && n.fract() == 0.0 && n <= u32::MAX as f64 => n as usize,
        ref other => return Err(CommandError::InvalidIndex(other.to_string())),
    };

    let misc = if field_values.len() > REQUIRED_FIELDS {
        let parts: Vec<String> = field_exprs[REQUIRED_FIELDS..]
            .iter()
            .zip(&field_values[REQUIRED_FIELDS..])
            .filter(|(_, v)| !v.is_null())
            .map(|(e, _)| e.to_string())
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(", "))
        }
    } else {
        None
    };

    Ok(Command {
        strip,
        effect: name_from_value(&field_values[1])?,
        effect_args: args_from(&field_exprs[2], &field_values[2]),
        color: name_from_value(&field_values[3])?,
        color_args: args_from(&field_exprs[4], &field_values[4]),
        misc,
    })
}

fn name_from_value(value: &Value) -> Result<Option<String>, CommandError> {
    match value {
        Value::Null => Ok(None),
        Value::Text(name) if name.trim().is_empty() => {
            Err(CommandError::MalformedEntry("empty name".to_string()))
        }
        Value::Text(name) => Ok(Some(name.clone())),
        other => Err(CommandError::MalformedEntry(format!(
            "expected a name, got {}",
            other
        ))),
    }
}

fn args_from(expr: &Expr, value: &Value) -> Option<Vec<ArgToken>> {
    match (expr, value) {
        (_, Value::Null) => None,
        (Expr::List(items), _) => Some(items.iter().map(|e| ArgToken::new(e.to_string())).collect()),
        (other, _) => Some(vec![ArgToken::new(other.to_string())]),
    }
}

/// Convenience wrapper: recover with the given namespace and clock
pub fn recover(text: &str, namespace: &Namespace, clock: &dyn Clock) -> ParseOutcome {
    FallbackEvaluator::new(namespace, clock).recover(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::FixedClock;

    #[test]
    fn test_recovers_tuple_wrapped_list() {
        let ns = Namespace::builtin();
        let clock = FixedClock(0.0);
        let outcome = recover("([0, chase, (60, 10, 0.3), solid, [255, 0, 15]],)", &ns, &clock);

        assert_eq!(outcome.path, ParsePath::Fallback);
        assert_eq!(outcome.commands.len(), 1);
        let cmd = &outcome.commands.as_slice()[0];
        assert_eq!(cmd.strip, 0);
        assert_eq!(cmd.effect.as_deref(), Some("chase"));
        assert_eq!(
            cmd.effect_args,
            Some(vec![ArgToken::new("60"), ArgToken::new("10"), ArgToken::new("0.3")])
        );
        assert_eq!(cmd.color.as_deref(), Some("solid"));
    }

    #[test]
    fn test_dynamic_args_stay_unevaluated() {
        let ns = Namespace::builtin();
        let clock = FixedClock(42.0);
        let outcome = recover("([1, strobe, [time() % 2, default_bpm * 4], None, None],)", &ns, &clock);
        let cmd = &outcome.commands.as_slice()[0];
        assert_eq!(
            cmd.effect_args,
            Some(vec![ArgToken::new("time() % 2"), ArgToken::new("default_bpm * 4")])
        );
    }

    #[test]
    fn test_unknown_identifiers_bound_to_themselves() {
        let ns = Namespace::builtin();
        let clock = FixedClock(0.0);
        let outcome = recover("([0, myFx, None, myColor, None, go],)", &ns, &clock);
        let cmd = &outcome.commands.as_slice()[0];
        assert_eq!(cmd.effect.as_deref(), Some("myFx"));
        assert_eq!(cmd.color.as_deref(), Some("myColor"));
        assert_eq!(cmd.misc.as_deref(), Some("go"));
        assert_eq!(outcome.warnings.len(), 3);
    }

    #[test]
    fn test_retry_cap_bounds_evaluation() {
        let ns = Namespace::empty();
        let clock = FixedClock(0.0);

        let names: Vec<String> = (0..MAX_BIND_RETRIES).map(|i| format!("u{}", i)).collect();
        let at_cap = format!("[[0, None, [{}], None, None]]", names.join(", "));
        let outcome = recover(&at_cap, &ns, &clock);
        assert_eq!(outcome.commands.len(), 1);

        let names: Vec<String> = (0..=MAX_BIND_RETRIES).map(|i| format!("u{}", i)).collect();
        let over_cap = format!("[[0, None, [{}], None, None]]", names.join(", "));
        let outcome = recover(&over_cap, &ns, &clock);
        assert!(outcome.commands.is_empty());
        assert!(matches!(
            outcome.warnings[0].error,
            CommandError::Evaluation(_)
        ));
    }

    #[test]
    fn test_unparseable_text_yields_empty() {
        let ns = Namespace::builtin();
        let clock = FixedClock(0.0);
        let outcome = recover("[[0, chase, [1, 2]", &ns, &clock);
        assert!(outcome.commands.is_empty());
        assert_eq!(outcome.warnings.len(), 1);
    }

    #[test]
    fn test_non_list_result_yields_empty() {
        let ns = Namespace::builtin();
        let clock = FixedClock(0.0);
        let outcome = recover("chase", &ns, &clock);
        assert!(outcome.commands.is_empty());
    }

    #[test]
    fn test_bad_entries_skipped() {
        let ns = Namespace::builtin();
        let clock = FixedClock(0.0);
        let outcome = recover(
            "([0, chase], [1.5, chase, None, None, None], [2, 7, None, None, None], [3, chase, None, None, None])",
            &ns,
            &clock,
        );
        assert_eq!(outcome.commands.len(), 1);
        assert_eq!(outcome.commands.as_slice()[0].strip, 3);
        assert_eq!(outcome.skipped(), 3);
    }

    #[test]
    fn test_recovered_tokens_are_canonical() {
        let ns = Namespace::builtin();
        let clock = FixedClock(0.0);
        let outcome = recover("([0, chase, (1e3, 0.50, 1e400, (default_bpm+1)*2), None, None],)", &ns, &clock);
        let args = outcome.commands.as_slice()[0].effect_args.clone().unwrap();
        let text: Vec<&str> = args.iter().map(ArgToken::as_str).collect();
        assert_eq!(text, vec!["1000", "0.5", "1e999", "(default_bpm + 1) * 2"]);
        assert_eq!(args[2].as_number(), None);
        assert_eq!(Expr::parse(args[2].as_str()).unwrap(), Expr::Number(f64::INFINITY));
    }

    #[test]
    fn test_empty_string_name_skipped() {
        let ns = Namespace::builtin();
        let clock = FixedClock(0.0);
        let outcome = recover("([0, '', None, None, None], [1, chase, None, None, None])", &ns, &clock);
        assert_eq!(outcome.commands.len(), 1);
        assert_eq!(outcome.commands.as_slice()[0].strip, 1);
        assert_eq!(outcome.skipped(), 1);
    }

    #[test]
    fn test_deep_nesting_yields_empty() {
        let ns = Namespace::builtin();
        let clock = FixedClock(0.0);
        for depth in [200, 200_000] {
            let outcome = recover(&format!("{}1", "(".repeat(depth)), &ns, &clock);
            assert!(outcome.commands.is_empty());
            assert!(matches!(
                outcome.warnings[0].error,
                CommandError::Evaluation(_)
            ));
        }
    }

    #[test]
    fn test_evaluate_time_is_display_only_number() {
        let ns = Namespace::builtin();
        let clock = FixedClock(3.0);
        let evaluator = FallbackEvaluator::new(&ns, &clock);
        let evaluated = evaluator.evaluate("[time, time() + 1]").unwrap();
        assert_eq!(
            evaluated.value,
            Value::List(vec![Value::Number(3.0), Value::Number(4.0)])
        );
    }
}
