//! One button's persisted configuration

use serde::{Deserialize, Serialize};

use crate::core::error::{PadError, Result};
use crate::core::types::MAX_COLOR_CODE;

/// A button record, stored as `[colorCode, active, auxTrigger, commandText, legacyMisc]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CellRecord", into = "CellRecord")]
pub struct GridCell {
    color: u8,
    /// Whether the button LED is lit
    pub active: bool,
    /// HTTP request fired on press
    pub aux_trigger: Option<String>,
    /// Command list text applied to the strips on press
    pub command_text: Option<String>,
    /// Single-strip misc text kept from older configs
    pub legacy_misc: Option<String>,
}

/// On-disk shape of a cell
#[derive(Serialize, Deserialize, Clone)]
struct CellRecord(u8, bool, Option<String>, Option<String>, Option<String>);

impl GridCell {
    /// Cell with no attached text; codes above 63 are clamped
    pub fn new(color: u8, active: bool) -> Self {
        Self {
            color: color.min(MAX_COLOR_CODE),
            active,
            aux_trigger: None,
            command_text: None,
            legacy_misc: None,
        }
    }

    pub fn color(&self) -> u8 {
        self.color
    }

    pub fn set_color(&mut self, color: u8) -> Result<()> {
        if color > MAX_COLOR_CODE {
            return Err(PadError::Persistence(format!(
                "color code {} out of range 0-{}",
                color, MAX_COLOR_CODE
            )));
        }
        self.color = color;
        Ok(())
    }

    pub fn with_command_text(mut self, text: impl Into<String>) -> Self {
        self.command_text = non_blank(Some(text.into()));
        self
    }

    pub fn with_aux_trigger(mut self, text: impl Into<String>) -> Self {
        self.aux_trigger = non_blank(Some(text.into()));
        self
    }

    pub fn with_legacy_misc(mut self, text: impl Into<String>) -> Self {
        self.legacy_misc = non_blank(Some(text.into()));
        self
    }

    /// Flip the LED state, returning the new state
    pub fn toggle(&mut self) -> bool {
        self.active = !self.active;
        self.active
    }
}

fn non_blank(text: Option<String>) -> Option<String> {
    text.filter(|t| !t.trim().is_empty())
}

impl TryFrom<CellRecord> for GridCell {
    type Error = PadError;

    fn try_from(record: CellRecord) -> Result<Self> {
        let CellRecord(color, active, aux_trigger, command_text, legacy_misc) = record;
        let mut cell = GridCell::new(0, active);
        cell.set_color(color)?;
        cell.aux_trigger = non_blank(aux_trigger);
        cell.command_text = non_blank(command_text);
        cell.legacy_misc = non_blank(legacy_misc);
        Ok(cell)
    }
}

impl From<GridCell> for CellRecord {
    fn from(cell: GridCell) -> Self {
        CellRecord(
            cell.color,
            cell.active,
            cell.aux_trigger,
            cell.command_text,
            cell.legacy_misc,
        )
    }
}
