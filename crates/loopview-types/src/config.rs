//! Container configuration.
//!
//! `LoopConfig` is either built in code or loaded from TOML. Every field
//! has a default; invalid values are rejected at the validation boundary
//! and leave prior state unchanged.

use serde::{Deserialize, Serialize};

use crate::error::{LoopError, Result};

/// Scroll axis of the container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Vertical,
    Horizontal,
}

/// Configuration for a loopview container.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoopConfig {
    /// Drag resistance: raw drag deltas are divided by this. Greater than
    /// 1 moves content slower than the finger, less than 1 faster. Must be
    /// greater than 0.
    #[serde(default = "default_resistance")]
    pub resistance: f32,
    /// Settle-back duration multiplier, at least 1. 1 is fastest.
    #[serde(default = "default_to_normal_offset")]
    pub to_normal_offset: u32,
    /// Fling duration multiplier, at least 1. 1 is fastest.
    #[serde(default = "default_fling_offset")]
    pub fling_offset: u32,
    /// Active scroll axis.
    #[serde(default = "default_axis")]
    pub axis: Axis,
    /// Whether drag gestures scroll the container.
    #[serde(default = "default_touch_enabled")]
    pub touch_enabled: bool,
    /// Whether the host should consult the transform effect while drawing.
    #[serde(default)]
    pub effect_3d: bool,
    /// Logical page index shown at startup.
    #[serde(default = "default_start_index")]
    pub start_index: usize,
    /// Minimum pointer movement in pixels before a drag is recognized.
    #[serde(default = "default_touch_slop")]
    pub touch_slop: f32,
}

fn default_resistance() -> f32 {
    1.0
}

fn default_to_normal_offset() -> u32 {
    4
}

fn default_fling_offset() -> u32 {
    1
}

fn default_axis() -> Axis {
    Axis::Vertical
}

fn default_touch_enabled() -> bool {
    true
}

fn default_start_index() -> usize {
    1
}

fn default_touch_slop() -> f32 {
    8.0
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            resistance: default_resistance(),
            to_normal_offset: default_to_normal_offset(),
            fling_offset: default_fling_offset(),
            axis: default_axis(),
            touch_enabled: default_touch_enabled(),
            effect_3d: false,
            start_index: default_start_index(),
            touch_slop: default_touch_slop(),
        }
    }
}

impl LoopConfig {
    /// Parse a config from TOML text and validate it.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every field against its documented range.
    pub fn validate(&self) -> Result<()> {
        if self.resistance.is_nan() || self.resistance <= 0.0 {
            return Err(LoopError::Config(format!(
                "resistance must be greater than 0, got {}",
                self.resistance
            )));
        }
        if self.to_normal_offset < 1 {
            return Err(LoopError::Config(
                "to_normal_offset must be at least 1".into(),
            ));
        }
        if self.fling_offset < 1 {
            return Err(LoopError::Config("fling_offset must be at least 1".into()));
        }
        if self.touch_slop.is_nan() || self.touch_slop < 0.0 {
            return Err(LoopError::Config(format!(
                "touch_slop must not be negative, got {}",
                self.touch_slop
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values() {
        let c = LoopConfig::default();
        assert_eq!(c.resistance, 1.0);
        assert_eq!(c.to_normal_offset, 4);
        assert_eq!(c.fling_offset, 1);
        assert_eq!(c.axis, Axis::Vertical);
        assert!(c.touch_enabled);
        assert!(!c.effect_3d);
        assert_eq!(c.start_index, 1);
        assert_eq!(c.touch_slop, 8.0);
    }

    #[test]
    fn default_validates() {
        assert!(LoopConfig::default().validate().is_ok());
    }

    #[test]
    fn empty_toml_gives_defaults() {
        let c = LoopConfig::from_toml_str("").unwrap();
        assert_eq!(c.resistance, 1.0);
        assert_eq!(c.axis, Axis::Vertical);
    }

    #[test]
    fn toml_overrides_fields() {
        let c = LoopConfig::from_toml_str(
            r#"
            resistance = 1.5
            to_normal_offset = 2
            axis = "horizontal"
            effect_3d = true
            "#,
        )
        .unwrap();
        assert_eq!(c.resistance, 1.5);
        assert_eq!(c.to_normal_offset, 2);
        assert_eq!(c.axis, Axis::Horizontal);
        assert!(c.effect_3d);
        // Untouched fields keep their defaults.
        assert_eq!(c.fling_offset, 1);
        assert!(c.touch_enabled);
    }

    #[test]
    fn zero_resistance_rejected() {
        let err = LoopConfig::from_toml_str("resistance = 0.0").unwrap_err();
        assert!(format!("{err}").contains("resistance"));
    }

    #[test]
    fn negative_resistance_rejected() {
        let c = LoopConfig {
            resistance: -2.0,
            ..LoopConfig::default()
        };
        assert!(c.validate().is_err());
    }

    #[test]
    fn nan_resistance_rejected() {
        let c = LoopConfig {
            resistance: f32::NAN,
            ..LoopConfig::default()
        };
        assert!(c.validate().is_err());
    }

    #[test]
    fn zero_offsets_rejected() {
        let c = LoopConfig {
            to_normal_offset: 0,
            ..LoopConfig::default()
        };
        assert!(c.validate().is_err());
        let c = LoopConfig {
            fling_offset: 0,
            ..LoopConfig::default()
        };
        assert!(c.validate().is_err());
    }

    #[test]
    fn negative_touch_slop_rejected() {
        let c = LoopConfig {
            touch_slop: -1.0,
            ..LoopConfig::default()
        };
        assert!(c.validate().is_err());
    }

    #[test]
    fn bad_axis_string_rejected() {
        assert!(LoopConfig::from_toml_str(r#"axis = "diagonal""#).is_err());
    }

    #[test]
    fn axis_lowercase_names() {
        let json = serde_json::to_string(&Axis::Horizontal).unwrap();
        assert_eq!(json, "\"horizontal\"");
    }

    #[test]
    fn config_json_roundtrip() {
        let c = LoopConfig {
            resistance: 2.0,
            axis: Axis::Horizontal,
            start_index: 0,
            ..LoopConfig::default()
        };
        let json = serde_json::to_string(&c).unwrap();
        let c2: LoopConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(c2.resistance, 2.0);
        assert_eq!(c2.axis, Axis::Horizontal);
        assert_eq!(c2.start_index, 0);
    }

    // -- Property tests: validation matches the documented ranges --

    use proptest::prelude::*;

    proptest! {
        #[test]
        fn positive_ranges_always_validate(
            resistance in 0.001f32..100.0,
            to_normal_offset in 1u32..1000,
            fling_offset in 1u32..1000,
            touch_slop in 0.0f32..64.0,
        ) {
            let c = LoopConfig {
                resistance,
                to_normal_offset,
                fling_offset,
                touch_slop,
                ..LoopConfig::default()
            };
            prop_assert!(c.validate().is_ok());
        }

        #[test]
        fn non_positive_resistance_never_validates(resistance in -100.0f32..=0.0) {
            let c = LoopConfig {
                resistance,
                ..LoopConfig::default()
            };
            prop_assert!(c.validate().is_err());
        }
    }
}
