//! In-memory strip bindings for a rig of equal-length strips

use crate::command::Value;
use crate::core::config::PadConfig;
use crate::core::error::{PadError, Result};
use crate::core::types::Tempo;
use crate::lighting::{LightingSystem, StripBinding};

/// Effect a strip runs before anything is bound
pub const DEFAULT_EFFECT: &str = "chase";
/// Color a strip runs before anything is bound
pub const DEFAULT_COLOR: &str = "idleColor";

/// Current binding of one strip
#[derive(Debug, Clone, PartialEq)]
pub struct StripState {
    pub effect: String,
    pub effect_args: Vec<Value>,
    pub color: String,
    pub color_args: Vec<Value>,
    /// Tempo in force at the last bind
    pub tempo: Tempo,
    /// Number of binds applied to this strip
    pub binds: u64,
}

impl Default for StripState {
    fn default() -> Self {
        Self {
            effect: DEFAULT_EFFECT.to_string(),
            effect_args: Vec::new(),
            color: DEFAULT_COLOR.to_string(),
            color_args: Vec::new(),
            tempo: Tempo::default(),
            binds: 0,
        }
    }
}

/// Bank of strips that records what each one is bound to
#[derive(Debug, Clone)]
pub struct StripBank {
    strips: Vec<StripState>,
    strip_length: usize,
}

impl StripBank {
    pub fn new(num_strips: usize, strip_length: usize) -> Self {
        Self {
            strips: vec![StripState::default(); num_strips],
            strip_length,
        }
    }

    pub fn from_config(config: &PadConfig) -> Self {
        Self::new(config.num_strips, config.strip_length)
    }

    pub fn strip(&self, index: usize) -> Option<&StripState> {
        self.strips.get(index)
    }

    pub fn strips(&self) -> &[StripState] {
        &self.strips
    }

    pub fn strip_length(&self) -> usize {
        self.strip_length
    }

    /// Total LEDs across all strips
    pub fn led_count(&self) -> usize {
        self.strips.len() * self.strip_length
    }
}

impl LightingSystem for StripBank {
    fn num_strips(&self) -> usize {
        self.strips.len()
    }

    fn bind_strip(&mut self, binding: StripBinding<'_>, tempo: Tempo) -> Result<()> {
        let count = self.strips.len();
        let strip = self
            .strips
            .get_mut(binding.index)
            .ok_or(PadError::StripOutOfRange {
                index: binding.index,
                count,
            })?;

        if let Some(effect) = binding.effect {
            strip.effect = effect.to_string();
        }
        if let Some(args) = binding.effect_args {
            strip.effect_args = args.to_vec();
        }
        if let Some(color) = binding.color {
            strip.color = color.to_string();
        }
        if let Some(args) = binding.color_args {
            strip.color_args = args.to_vec();
        }
        strip.tempo = tempo;
        strip.binds += 1;

        tracing::debug!(
            "Strip {} -> {}{:?} / {}{:?}",
            binding.index,
            strip.effect,
            strip.effect_args,
            strip.color,
            strip.color_args
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_bank_defaults() {
        let bank = StripBank::new(3, 70);
        assert_eq!(bank.num_strips(), 3);
        assert_eq!(bank.led_count(), 210);
        assert_eq!(bank.strip(0).unwrap().effect, DEFAULT_EFFECT);
        assert_eq!(bank.strip(2).unwrap().color, DEFAULT_COLOR);
    }

    #[test]
    fn test_bind_overwrites_only_supplied_fields() {
        let mut bank = StripBank::new(2, 10);
        let args = [Value::Number(255.0), Value::Number(0.0), Value::Number(15.0)];

        let mut binding = StripBinding::new(1);
        binding.color = Some("solid");
        binding.color_args = Some(&args);
        bank.bind_strip(binding, Tempo::new(90.0)).unwrap();

        let strip = bank.strip(1).unwrap();
        assert_eq!(strip.effect, DEFAULT_EFFECT);
        assert_eq!(strip.color, "solid");
        assert_eq!(strip.color_args, args.to_vec());
        assert_eq!(strip.tempo, Tempo::new(90.0));
        assert_eq!(strip.binds, 1);
    }

    #[test]
    fn test_bind_out_of_range() {
        let mut bank = StripBank::new(1, 10);
        let result = bank.bind_strip(StripBinding::new(5), Tempo::default());
        assert!(matches!(
            result,
            Err(PadError::StripOutOfRange { index: 5, count: 1 })
        ));
    }
}
