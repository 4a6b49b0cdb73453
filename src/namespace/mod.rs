//! Effect and color names the command language knows about
//!
//! The catalog is supplied from outside (built-in or a TOML file). Parsing
//! never rejects a name for being missing here; the namespace only decides
//! which identifiers produce warnings and what the fallback evaluator and
//! argument evaluation see as pre-bound.

pub mod catalog;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

pub use catalog::{CatalogLoadError, FxCatalog};

/// One declared parameter of an effect or color function
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamSpec {
    pub name: String,
    /// Default as source text (e.g. `default_bpm * 2`), if the parameter has one
    pub default: Option<String>,
}

impl ParamSpec {
    pub fn required(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default: None,
        }
    }

    pub fn with_default(name: impl Into<String>, default: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default: Some(default.into()),
        }
    }
}

/// A named effect or color function with its ordered parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FxSpec {
    pub name: String,
    pub params: Vec<ParamSpec>,
}

impl FxSpec {
    pub fn new(name: impl Into<String>, params: Vec<ParamSpec>) -> Self {
        Self {
            name: name.into(),
            params,
        }
    }
}

/// Anything that can describe the available effects and colors
pub trait NamespaceProvider {
    fn list_effects(&self) -> Vec<FxSpec>;
    fn list_colors(&self) -> Vec<FxSpec>;

    /// Named numeric constants visible to argument expressions
    fn constants(&self) -> Vec<(String, f64)> {
        Vec::new()
    }
}

/// Resolved lookup tables built from a provider
#[derive(Debug, Clone, Default)]
pub struct Namespace {
    effects: AHashMap<String, Vec<ParamSpec>>,
    colors: AHashMap<String, Vec<ParamSpec>>,
    constants: AHashMap<String, f64>,
    effect_names: Vec<String>,
    color_names: Vec<String>,
}

impl Namespace {
    /// A namespace that knows no names at all
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn builtin() -> Self {
        Self::from_provider(&FxCatalog::builtin())
    }

    pub fn from_provider(provider: &dyn NamespaceProvider) -> Self {
        let mut namespace = Self::default();
        for spec in provider.list_effects() {
            if namespace.effects.insert(spec.name.clone(), spec.params).is_none() {
                namespace.effect_names.push(spec.name);
            }
        }
        for spec in provider.list_colors() {
            if namespace.colors.insert(spec.name.clone(), spec.params).is_none() {
                namespace.color_names.push(spec.name);
            }
        }
        namespace.constants = provider.constants().into_iter().collect();
        namespace
    }

    pub fn has_effect(&self, name: &str) -> bool {
        self.effects.contains_key(name)
    }

    pub fn has_color(&self, name: &str) -> bool {
        self.colors.contains_key(name)
    }

    /// True if the name is either an effect or a color
    pub fn knows(&self, name: &str) -> bool {
        self.has_effect(name) || self.has_color(name)
    }

    pub fn effect_params(&self, name: &str) -> Option<&[ParamSpec]> {
        self.effects.get(name).map(Vec::as_slice)
    }

    pub fn color_params(&self, name: &str) -> Option<&[ParamSpec]> {
        self.colors.get(name).map(Vec::as_slice)
    }

    pub fn constant(&self, name: &str) -> Option<f64> {
        self.constants.get(name).copied()
    }

    /// Effect names in catalog order
    pub fn effect_names(&self) -> &[String] {
        &self.effect_names
    }

    /// Color names in catalog order
    pub fn color_names(&self) -> &[String] {
        &self.color_names
    }

    pub fn constants(&self) -> impl Iterator<Item = (&str, f64)> {
        self.constants.iter().map(|(k, v)| (k.as_str(), *v))
    }
}
