//! Named grid configurations on disk, one `<name>.json` per configuration

use std::path::{Path, PathBuf};

use crate::core::config::GridInit;
use crate::core::error::{PadError, Result};
use crate::grid::document::Grid;

const EXTENSION: &str = "json";

#[derive(Debug, Clone)]
pub struct ConfigStore {
    dir: PathBuf,
}

impl ConfigStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", name, EXTENSION))
    }

    pub fn exists(&self, name: &str) -> bool {
        self.path_for(name).is_file()
    }

    /// Configuration names, sorted; a missing directory has none
    pub fn list_names(&self) -> Result<Vec<String>> {
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(persistence(&self.dir, e)),
        };

        let mut names = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| persistence(&self.dir, e))?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    /// Write a fresh grid under a new name
    pub fn create(&self, name: &str, init: GridInit) -> Result<Grid> {
        let name = name.trim();
        if name.is_empty() {
            return Err(PadError::Persistence("configuration name is empty".into()));
        }
        if name.contains(['/', '\\']) || name.starts_with('.') {
            return Err(PadError::Persistence(format!("invalid configuration name '{}'", name)));
        }
        if self.exists(name) {
            return Err(PadError::Persistence(format!("configuration '{}' already exists", name)));
        }

        std::fs::create_dir_all(&self.dir).map_err(|e| persistence(&self.dir, e))?;
        let grid = Grid::new(init);
        grid.save(&self.path_for(name))?;
        tracing::info!("Created configuration '{}'", name);
        Ok(grid)
    }

    pub fn load(&self, name: &str) -> Result<Grid> {
        Grid::load(&self.path_for(name))
    }

    pub fn save(&self, name: &str, grid: &Grid) -> Result<()> {
        grid.save(&self.path_for(name))
    }
}

fn persistence(path: &Path, e: std::io::Error) -> PadError {
    PadError::Persistence(format!("{}: {}", path.display(), e))
}
