//! Effect/color catalogs - built-in defaults or loaded from TOML
//!
//! A catalog file looks like:
//!
//! ```toml
//! [constants]
//! default_bpm = 120.0
//!
//! [[effects]]
//! name = "chase"
//! params = [{ name = "bpm", default = "default_bpm" }, { name = "length", default = 10 }]
//!
//! [[colors]]
//! name = "solid"
//! params = [{ name = "r" }, { name = "g" }, { name = "b" }]
//! ```

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

use crate::namespace::{FxSpec, NamespaceProvider, ParamSpec};

/// Catalog of effect and color functions
#[derive(Debug, Clone, Default)]
pub struct FxCatalog {
    effects: Vec<FxSpec>,
    colors: Vec<FxSpec>,
    constants: Vec<(String, f64)>,
}

impl FxCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// The effects and colors shipped with the light rig
    pub fn builtin() -> Self {
        let mut catalog = Self::new();

        catalog.add_effect(FxSpec::new("idleEffect", vec![]));
        catalog.add_effect(FxSpec::new(
            "sinWave",
            vec![
                ParamSpec::with_default("bpm", "default_bpm * 2"),
                ParamSpec::with_default("wave_length", "3"),
            ],
        ));
        catalog.add_effect(FxSpec::new(
            "chase",
            vec![
                ParamSpec::with_default("bpm", "default_bpm"),
                ParamSpec::with_default("length", "10"),
                ParamSpec::with_default("lifetime", "0.5"),
            ],
        ));
        catalog.add_effect(FxSpec::new(
            "strobe",
            vec![
                ParamSpec::with_default("bpm", "default_bpm * 10"),
                ParamSpec::with_default("offset", "0"),
            ],
        ));
        catalog.add_effect(FxSpec::new(
            "fadeInOut",
            vec![
                ParamSpec::with_default("bpm", "default_bpm"),
                ParamSpec::with_default("offset", "0"),
            ],
        ));
        catalog.add_effect(FxSpec::new(
            "swipe",
            vec![
                ParamSpec::with_default("bpm", "default_bpm"),
                ParamSpec::with_default("rank", "0"),
                ParamSpec::with_default("total", "3"),
            ],
        ));

        catalog.add_color(FxSpec::new("idleColor", vec![]));
        catalog.add_color(FxSpec::new(
            "solid",
            vec![
                ParamSpec::required("r"),
                ParamSpec::required("g"),
                ParamSpec::required("b"),
            ],
        ));
        catalog.add_color(FxSpec::new("rainbow", vec![]));

        catalog.constants.push(("default_bpm".into(), 120.0));
        catalog
    }

    pub fn add_effect(&mut self, spec: FxSpec) {
        self.effects.push(spec);
    }

    pub fn add_color(&mut self, spec: FxSpec) {
        self.colors.push(spec);
    }

    pub fn effects(&self) -> &[FxSpec] {
        &self.effects
    }

    pub fn colors(&self) -> &[FxSpec] {
        &self.colors
    }

    /// Load a catalog from a TOML file
    pub fn load_from_toml(path: &Path) -> Result<Self, CatalogLoadError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| CatalogLoadError::IoError(e.to_string()))?;
        Self::parse_toml(&content)
    }

    /// Parse a catalog from a TOML string
    pub fn parse_toml(content: &str) -> Result<Self, CatalogLoadError> {
        let data: TomlCatalog =
            toml::from_str(content).map_err(|e| CatalogLoadError::ParseError(e.to_string()))?;

        let mut catalog = Self::new();
        for entry in data.effects {
            catalog.add_effect(entry.into_spec()?);
        }
        for entry in data.colors {
            catalog.add_color(entry.into_spec()?);
        }
        catalog.constants = data.constants.into_iter().collect();
        Ok(catalog)
    }
}

impl NamespaceProvider for FxCatalog {
    fn list_effects(&self) -> Vec<FxSpec> {
        self.effects.clone()
    }

    fn list_colors(&self) -> Vec<FxSpec> {
        self.colors.clone()
    }

    fn constants(&self) -> Vec<(String, f64)> {
        self.constants.clone()
    }
}

/// Error type for catalog loading
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CatalogLoadError {
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Invalid default for {function}.{param}: {reason}")]
    InvalidDefault {
        function: String,
        param: String,
        reason: String,
    },
}

/// TOML representation of a catalog file
#[derive(Debug, Deserialize)]
struct TomlCatalog {
    #[serde(default)]
    constants: BTreeMap<String, f64>,
    #[serde(default)]
    effects: Vec<TomlFx>,
    #[serde(default)]
    colors: Vec<TomlFx>,
}

/// TOML representation of a single effect or color
#[derive(Debug, Deserialize)]
struct TomlFx {
    name: String,
    #[serde(default)]
    params: Vec<TomlParam>,
}

#[derive(Debug, Deserialize)]
struct TomlParam {
    name: String,
    default: Option<toml::Value>,
}

impl TomlFx {
    fn into_spec(self) -> Result<FxSpec, CatalogLoadError> {
        let mut params = Vec::with_capacity(self.params.len());
        for param in self.params {
            let default = match param.default {
                None => None,
                Some(toml::Value::String(s)) => Some(s),
                Some(toml::Value::Integer(i)) => Some(i.to_string()),
                Some(toml::Value::Float(f)) => Some(f.to_string()),
                Some(other) => {
                    return Err(CatalogLoadError::InvalidDefault {
                        function: self.name,
                        param: param.name,
                        reason: format!("unsupported {} value", other.type_str()),
                    })
                }
            };
            params.push(ParamSpec {
                name: param.name,
                default,
            });
        }
        Ok(FxSpec::new(self.name, params))
    }
}
