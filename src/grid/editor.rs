//! Per-strip edit form for one button's command text
//!
//! `load_into_editor` turns a cell's command text into one tab per strip;
//! `commit_from_editor` turns the tabs back into canonical text and persists
//! the grid.

use std::collections::BTreeMap;

use crate::command::model::{is_null_sentinel, NULL_TOKEN};
use crate::command::{self, split_fields, ArgToken, Command, CommandError, CommandList};
use crate::core::error::{PadError, Result};
use crate::core::types::{GridPos, StripIndex, SystemClock};
use crate::grid::cell::GridCell;
use crate::grid::document::Grid;
use crate::grid::store::ConfigStore;
use crate::namespace::{Namespace, ParamSpec};

/// Editable fields for one strip; empty strings mean absent
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StripTab {
    pub effect: String,
    pub effect_args: Vec<String>,
    pub color: String,
    pub color_args: Vec<String>,
    pub misc: String,
}

/// One argument slot shown in the form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgSlot {
    pub name: String,
    pub default: Option<String>,
    pub value: String,
}

/// Strip tabs, ascending by strip index
pub type EditorForm = BTreeMap<StripIndex, StripTab>;

impl StripTab {
    pub fn from_command(command: &Command) -> Self {
        Self {
            effect: command.effect.clone().unwrap_or_default(),
            effect_args: tokens_to_strings(command.effect_args.as_deref()),
            color: command.color.clone().unwrap_or_default(),
            color_args: tokens_to_strings(command.color_args.as_deref()),
            misc: command.misc.clone().unwrap_or_default(),
        }
    }

    /// Declared effect parameters paired with the current values
    pub fn effect_slots(&self, namespace: &Namespace) -> Vec<ArgSlot> {
        slots(namespace.effect_params(self.effect.trim()), &self.effect_args)
    }

    /// Declared color parameters paired with the current values
    pub fn color_slots(&self, namespace: &Namespace) -> Vec<ArgSlot> {
        slots(namespace.color_params(self.color.trim()), &self.color_args)
    }

    /// Check that every field serializes into text the structured parser reads back
    ///
    /// Names may not contain separators, brackets or quotes, nor spell a
    /// null sentinel. Each argument must be one balanced field, and misc
    /// text must be balanced.
    pub fn validate(&self) -> std::result::Result<(), CommandError> {
        check_name("effect", &self.effect)?;
        check_name("color", &self.color)?;
        for arg in &self.effect_args {
            check_arg("effect argument", arg)?;
        }
        for arg in &self.color_args {
            check_arg("color argument", arg)?;
        }
        if split_fields(&self.misc).is_err() {
            return Err(invalid("misc", &self.misc, "unbalanced brackets"));
        }
        Ok(())
    }

    pub fn to_command(&self, strip: StripIndex) -> Command {
        Command {
            strip,
            effect: non_empty(&self.effect),
            effect_args: form_args(&self.effect, &self.effect_args),
            color: non_empty(&self.color),
            color_args: form_args(&self.color, &self.color_args),
            misc: non_empty(&self.misc),
        }
    }
}

fn invalid(field: &'static str, value: &str, reason: &'static str) -> CommandError {
    CommandError::InvalidField {
        field,
        value: value.to_string(),
        reason,
    }
}

fn check_name(field: &'static str, name: &str) -> std::result::Result<(), CommandError> {
    let name = name.trim();
    if name.contains([',', '[', ']', '(', ')', '\'', '"']) {
        return Err(invalid(field, name, "names cannot contain , [ ] ( ) or quotes"));
    }
    if is_null_sentinel(name) {
        return Err(invalid(field, name, "leave the field empty for no value"));
    }
    Ok(())
}

fn check_arg(field: &'static str, arg: &str) -> std::result::Result<(), CommandError> {
    match split_fields(arg) {
        Ok(parts) if parts.len() <= 1 => Ok(()),
        Ok(_) => Err(invalid(field, arg, "one value per slot, commas only inside brackets")),
        Err(_) => Err(invalid(field, arg, "unbalanced brackets")),
    }
}

fn tokens_to_strings(tokens: Option<&[ArgToken]>) -> Vec<String> {
    tokens
        .unwrap_or_default()
        .iter()
        .map(|t| t.as_str().to_string())
        .collect()
}

fn slots(params: Option<&[ParamSpec]>, values: &[String]) -> Vec<ArgSlot> {
    let params = params.unwrap_or_default();
    let count = params.len().max(values.len());
    (0..count)
        .map(|i| {
            let param = params.get(i);
            ArgSlot {
                name: param.map_or_else(|| format!("arg{}", i), |p| p.name.clone()),
                default: param.and_then(|p| p.default.clone()),
                value: values.get(i).cloned().unwrap_or_default(),
            }
        })
        .collect()
}

fn non_empty(text: &str) -> Option<String> {
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

/// Trailing empty slots are dropped; an empty slot before a filled one holds its position as null
fn form_args(name: &str, values: &[String]) -> Option<Vec<ArgToken>> {
    let filled = values.iter().rposition(|v| !v.trim().is_empty());
    match filled {
        Some(last) => Some(
            values[..=last]
                .iter()
                .map(|v| match v.trim() {
                    "" => ArgToken::new(NULL_TOKEN),
                    text => ArgToken::new(text),
                })
                .collect(),
        ),
        None if !name.trim().is_empty() => Some(Vec::new()),
        None => None,
    }
}

/// Parse a cell's command text into strip tabs
///
/// Commands addressing the same strip are merged in list order, so the tab
/// shows what a press would leave bound.
pub fn load_into_editor(cell: &GridCell, namespace: &Namespace) -> EditorForm {
    let outcome = command::parse_optional(cell.command_text.as_deref(), namespace, &SystemClock);
    for warning in &outcome.warnings {
        tracing::debug!("Loading cell: {}", warning);
    }
    outcome
        .commands
        .merged_by_strip()
        .iter()
        .map(|(strip, cmd)| (*strip, StripTab::from_command(cmd)))
        .collect()
}

/// Build the ascending command list the form describes
pub fn build_command_list(form: &EditorForm) -> CommandList {
    form.iter().map(|(strip, tab)| tab.to_command(*strip)).collect()
}

/// Serialize the form into the cell at `pos` and persist the grid
///
/// Every tab is validated first; nothing is written if one is rejected. The
/// in-memory grid only changes once the save succeeded. Returns the command
/// text written.
pub fn commit_from_editor(
    form: &EditorForm,
    grid: &mut Grid,
    pos: GridPos,
    store: &ConfigStore,
    name: &str,
) -> Result<Option<String>> {
    for (strip, tab) in form {
        if let Err(e) = tab.validate() {
            tracing::warn!("Strip {} not committed: {}", strip, e);
            return Err(e.into());
        }
    }

    let list = build_command_list(form);
    let text = (!list.is_empty()).then(|| command::serialize(&list));

    let mut updated = grid.clone();
    let cell = updated.cell_mut(pos).ok_or(PadError::InvalidPosition {
        row: pos.row,
        col: pos.col,
    })?;
    cell.command_text = text.clone();

    store.save(name, &updated)?;
    *grid = updated;
    tracing::info!("Saved button ({}, {}) to '{}'", pos.row, pos.col, name);
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tab(effect: &str, args: &[&str]) -> StripTab {
        StripTab {
            effect: effect.into(),
            effect_args: args.iter().map(|a| a.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_load_groups_by_strip() {
        let ns = Namespace::builtin();
        let cell = GridCell::new(0, true)
            .with_command_text("[[2, strobe, [240], None, None], [0, chase, [60, 10, 0.3], solid, [255, 0, 15]]]");
        let form = load_into_editor(&cell, &ns);

        assert_eq!(form.keys().copied().collect::<Vec<_>>(), vec![0, 2]);
        assert_eq!(form[&0].effect, "chase");
        assert_eq!(form[&0].color_args, vec!["255", "0", "15"]);
        assert_eq!(form[&2].effect_args, vec!["240"]);
    }

    #[test]
    fn test_load_merges_duplicates() {
        let ns = Namespace::builtin();
        let cell = GridCell::new(0, true)
            .with_command_text("[[0, chase, [], solid, [1, 2, 3]], [0, strobe, None, None, None]]");
        let form = load_into_editor(&cell, &ns);
        assert_eq!(form.len(), 1);
        assert_eq!(form[&0].effect, "strobe");
        assert_eq!(form[&0].color, "solid");
    }

    #[test]
    fn test_load_empty_cell() {
        let ns = Namespace::builtin();
        assert!(load_into_editor(&GridCell::new(0, true), &ns).is_empty());
    }

    #[test]
    fn test_slots_pair_params_with_values() {
        let ns = Namespace::builtin();
        let slots = tab("chase", &["60"]).effect_slots(&ns);
        assert_eq!(slots.len(), 3);
        assert_eq!(slots[0].name, "bpm");
        assert_eq!(slots[0].value, "60");
        assert_eq!(slots[1].name, "length");
        assert_eq!(slots[1].default.as_deref(), Some("10"));
        assert_eq!(slots[1].value, "");

        let unknown = tab("myFx", &["1", "2"]).effect_slots(&ns);
        assert_eq!(unknown[1].name, "arg1");
    }

    fn rejected_field(tab: &StripTab) -> &'static str {
        match tab.validate() {
            Err(CommandError::InvalidField { field, .. }) => field,
            other => panic!("Expected InvalidField, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_bad_names() {
        assert_eq!(rejected_field(&tab("chase, solid", &[])), "effect");
        assert_eq!(rejected_field(&tab("fx[1]", &[])), "effect");
        assert_eq!(rejected_field(&tab("go()", &[])), "effect");
        assert_eq!(rejected_field(&tab("'chase'", &[])), "effect");
        assert_eq!(rejected_field(&tab("None", &[])), "effect");

        let color = StripTab {
            color: "null".into(),
            ..Default::default()
        };
        assert_eq!(rejected_field(&color), "color");
    }

    #[test]
    fn test_validate_rejects_bad_args() {
        assert_eq!(rejected_field(&tab("chase", &["[1"])), "effect argument");
        assert_eq!(rejected_field(&tab("chase", &["1)"])), "effect argument");
        assert_eq!(rejected_field(&tab("chase", &["1, 2"])), "effect argument");

        let color = StripTab {
            color: "solid".into(),
            color_args: vec!["255".into(), "(0".into()],
            ..Default::default()
        };
        assert_eq!(rejected_field(&color), "color argument");
    }

    #[test]
    fn test_validate_rejects_unbalanced_misc() {
        let misc = StripTab {
            misc: "flash(2".into(),
            ..Default::default()
        };
        assert_eq!(rejected_field(&misc), "misc");
    }

    #[test]
    fn test_validate_accepts_expressions() {
        let ok = StripTab {
            effect: "sinWave".into(),
            effect_args: vec!["default_bpm * 2".into(), "[1, 2]".into(), "time() % 3".into(), "".into()],
            color: "solid".into(),
            color_args: vec!["255".into()],
            misc: "flash(2), go".into(),
        };
        assert!(ok.validate().is_ok());
        assert!(StripTab::default().validate().is_ok());
    }

    #[test]
    fn test_build_command_list() {
        let mut form = EditorForm::new();
        form.insert(2, tab("strobe", &[]));
        form.insert(0, tab("chase", &["60", "", "0.3", ""]));
        form.insert(1, StripTab::default());

        let list = build_command_list(&form);
        assert_eq!(list.strip_indices(), vec![0, 1, 2]);
        let cmds = list.as_slice();
        assert_eq!(
            cmds[0].effect_args,
            Some(vec![ArgToken::new("60"), ArgToken::new("None"), ArgToken::new("0.3")])
        );
        assert_eq!(cmds[1], Command::new(1));
        assert_eq!(cmds[2].effect_args, Some(Vec::new()));
        assert_eq!(
            command::serialize(&list),
            "[[0, chase, [60, None, 0.3], None, None, None], \
             [1, None, None, None, None, None], \
             [2, strobe, [], None, None, None]]"
        );
    }
}
