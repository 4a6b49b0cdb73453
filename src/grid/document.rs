//! The 9×9 grid document

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::config::GridInit;
use crate::core::error::{PadError, Result};
use crate::core::types::{GridPos, GRID_SIZE};
use crate::grid::cell::GridCell;

/// All button records, indexed `[row][col]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<GridCell>>", into = "Vec<Vec<GridCell>>")]
pub struct Grid {
    rows: Vec<Vec<GridCell>>,
}

impl Grid {
    pub fn new(init: GridInit) -> Self {
        let cell = match init {
            GridInit::Blank => GridCell::new(0, true),
            GridInit::Device => GridCell::new(3, false),
        };
        Self {
            rows: vec![vec![cell; GRID_SIZE]; GRID_SIZE],
        }
    }

    pub fn cell(&self, pos: GridPos) -> Option<&GridCell> {
        self.rows.get(pos.row).and_then(|row| row.get(pos.col))
    }

    pub fn cell_mut(&mut self, pos: GridPos) -> Option<&mut GridCell> {
        self.rows.get_mut(pos.row).and_then(|row| row.get_mut(pos.col))
    }

    pub fn set_cell(&mut self, pos: GridPos, cell: GridCell) -> Result<()> {
        let slot = self.cell_mut(pos).ok_or(PadError::InvalidPosition {
            row: pos.row,
            col: pos.col,
        })?;
        *slot = cell;
        Ok(())
    }

    /// Flip a button's LED state, returning the new state
    pub fn toggle(&mut self, pos: GridPos) -> Result<bool> {
        self.cell_mut(pos)
            .map(GridCell::toggle)
            .ok_or(PadError::InvalidPosition {
                row: pos.row,
                col: pos.col,
            })
    }

    /// Every cell with its position, row by row
    pub fn iter(&self) -> impl Iterator<Item = (GridPos, &GridCell)> {
        self.rows.iter().enumerate().flat_map(|(row, cells)| {
            cells
                .iter()
                .enumerate()
                .map(move |(col, cell)| (GridPos::new(row, col), cell))
        })
    }

    /// Human-readable JSON, four-space indented
    pub fn to_json(&self) -> Result<String> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut ser)?;
        String::from_utf8(buf).map_err(|e| PadError::Persistence(e.to_string()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| PadError::Persistence(format!("Invalid grid: {}", e)))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| PadError::Persistence(format!("Failed to read {}: {}", path.display(), e)))?;
        Self::from_json(&text)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = self.to_json()?;
        std::fs::write(path, json)
            .map_err(|e| PadError::Persistence(format!("Failed to write {}: {}", path.display(), e)))
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new(GridInit::default())
    }
}

impl TryFrom<Vec<Vec<GridCell>>> for Grid {
    type Error = PadError;

    fn try_from(rows: Vec<Vec<GridCell>>) -> Result<Self> {
        if rows.len() != GRID_SIZE || rows.iter().any(|row| row.len() != GRID_SIZE) {
            return Err(PadError::Persistence(format!(
                "grid must be {}x{}",
                GRID_SIZE, GRID_SIZE
            )));
        }
        Ok(Self { rows })
    }
}

impl From<Grid> for Vec<Vec<GridCell>> {
    fn from(grid: Grid) -> Self {
        grid.rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_modes() {
        let blank = Grid::new(GridInit::Blank);
        let cell = blank.cell(GridPos::new(8, 8)).unwrap();
        assert_eq!((cell.color(), cell.active), (0, true));

        let device = Grid::new(GridInit::Device);
        let cell = device.cell(GridPos::new(0, 0)).unwrap();
        assert_eq!((cell.color(), cell.active), (3, false));
        assert_eq!(device.iter().count(), GRID_SIZE * GRID_SIZE);
    }

    #[test]
    fn test_out_of_bounds_access() {
        let mut grid = Grid::default();
        assert!(grid.cell(GridPos::new(9, 0)).is_none());
        assert!(matches!(
            grid.toggle(GridPos::new(0, 9)),
            Err(PadError::InvalidPosition { row: 0, col: 9 })
        ));
        assert!(grid.set_cell(GridPos::new(10, 10), GridCell::new(1, true)).is_err());
    }

    #[test]
    fn test_json_uses_four_space_indent() {
        let mut grid = Grid::default();
        grid.set_cell(GridPos::new(0, 1), GridCell::new(5, false).with_aux_trigger("http://x/y"))
            .unwrap();
        let json = grid.to_json().unwrap();
        assert!(json.starts_with("[\n    [\n        [\n            0,"));

        let back = Grid::from_json(&json).unwrap();
        assert_eq!(back, grid);
    }

    #[test]
    fn test_wrong_dimensions_rejected() {
        assert!(Grid::from_json("[[[0, true, null, null, null]]]").is_err());
        assert!(Grid::from_json("{}").is_err());
    }
}
