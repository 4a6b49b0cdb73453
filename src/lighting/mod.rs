//! Lighting system seam
//!
//! Button presses end in `LightingSystem::bind_strip`. The effect and color
//! math lives behind this trait; the command language only names functions
//! and hands over evaluated arguments.

pub mod strip_bank;

use crate::command::Value;
use crate::core::error::Result;
use crate::core::types::{StripIndex, Tempo};

pub use strip_bank::{StripBank, StripState};

/// One bind request with arguments already evaluated
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StripBinding<'a> {
    pub index: StripIndex,
    pub effect: Option<&'a str>,
    pub effect_args: Option<&'a [Value]>,
    pub color: Option<&'a str>,
    pub color_args: Option<&'a [Value]>,
}

impl<'a> StripBinding<'a> {
    pub fn new(index: StripIndex) -> Self {
        Self {
            index,
            effect: None,
            effect_args: None,
            color: None,
            color_args: None,
        }
    }
}

/// Anything strips can be bound on
pub trait LightingSystem {
    fn num_strips(&self) -> usize;

    /// Bind effect/color functions to a strip; absent fields keep their current value
    fn bind_strip(&mut self, binding: StripBinding<'_>, tempo: Tempo) -> Result<()>;
}
