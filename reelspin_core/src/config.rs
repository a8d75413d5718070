use crate::paytable::Paytable;
use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, TAU};

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("invalid machine config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("reel speed must be a positive finite angle per tick, got {0}")]
    InvalidSpeed(f64),
    #[error("stagger between reel stops must be non-zero")]
    ZeroStagger,
    #[error("scroll-back correction must lie in [0, 2π), got {0}")]
    InvalidScrollBack(f64),
    #[error("spin cost cannot be negative, got {0}")]
    NegativeSpinCost(i64),
    #[error("paytable symbol index {0} is outside the symbol domain")]
    SymbolOutOfRange(u8),
    #[error("paytable combination {0:?} is not sorted ascending")]
    UnsortedCombination([u8; 3]),
    #[error("paytable combination {0:?} appears more than once")]
    DuplicateCombination([u8; 3]),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineConfig {
    pub starting_balance: i64,
    pub spin_cost: i64,
    /// Radians advanced per animation tick while a reel is moving.
    pub speed: f64,
    /// Delay from spin start until reel 0 receives its stop command.
    pub base_duration_ms: u64,
    /// Extra delay added per reel index.
    pub stagger_ms: u64,
    pub single_scroll_back: f64,
    pub double_scroll_back: f64,
    pub paytable: Paytable,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            starting_balance: 50_000,
            spin_cost: 1,
            speed: 0.15,
            base_duration_ms: 2000,
            stagger_ms: 500,
            single_scroll_back: PI / 2.7,
            double_scroll_back: PI / 5.5,
            paytable: Paytable::classic(),
        }
    }
}

impl MachineConfig {
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.speed.is_finite() && self.speed > 0.0) {
            return Err(ConfigError::InvalidSpeed(self.speed));
        }
        if self.stagger_ms == 0 {
            return Err(ConfigError::ZeroStagger);
        }
        for back in [self.single_scroll_back, self.double_scroll_back] {
            if !(0.0..TAU).contains(&back) {
                return Err(ConfigError::InvalidScrollBack(back));
            }
        }
        if self.spin_cost < 0 {
            return Err(ConfigError::NegativeSpinCost(self.spin_cost));
        }
        self.paytable.validate()
    }

    pub fn scroll_back(&self, double: bool) -> f64 {
        if double {
            self.double_scroll_back
        } else {
            self.single_scroll_back
        }
    }

    /// Offset from spin start at which `reel` receives its stop command.
    pub fn stop_delay_ms(&self, reel: usize) -> u64 {
        self.base_duration_ms + reel as u64 * self.stagger_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_reference_machine() {
        let c = MachineConfig::default();
        assert_eq!(c.starting_balance, 50_000);
        assert_eq!(c.stop_delay_ms(0), 2000);
        assert_eq!(c.stop_delay_ms(1), 2500);
        assert_eq!(c.stop_delay_ms(2), 3000);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let c = MachineConfig::from_json_str(r#"{ "starting_balance": 10, "stagger_ms": 250 }"#)
            .unwrap();
        assert_eq!(c.starting_balance, 10);
        assert_eq!(c.stagger_ms, 250);
        assert_eq!(c.speed, 0.15);
        assert_eq!(c.paytable, Paytable::classic());
    }

    #[test]
    fn rejects_degenerate_timing() {
        assert!(matches!(
            MachineConfig::from_json_str(r#"{ "stagger_ms": 0 }"#),
            Err(ConfigError::ZeroStagger)
        ));
        assert!(matches!(
            MachineConfig::from_json_str(r#"{ "speed": -1.0 }"#),
            Err(ConfigError::InvalidSpeed(_))
        ));
        assert!(matches!(
            MachineConfig::from_json_str("not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn rejects_bad_scroll_back_and_cost() {
        assert!(matches!(
            MachineConfig::from_json_str(r#"{ "double_scroll_back": 7.0 }"#),
            Err(ConfigError::InvalidScrollBack(b)) if b == 7.0
        ));
        assert!(matches!(
            MachineConfig::from_json_str(r#"{ "single_scroll_back": -0.1 }"#),
            Err(ConfigError::InvalidScrollBack(_))
        ));
        assert!(matches!(
            MachineConfig::from_json_str(r#"{ "spin_cost": -1 }"#),
            Err(ConfigError::NegativeSpinCost(-1))
        ));
        assert!(MachineConfig::from_json_str(r#"{ "spin_cost": 0 }"#).is_ok());
    }
}
