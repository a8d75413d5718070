use crate::engine::normalize_rotation;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ReelState {
    #[default]
    Idle,
    /// Turning freely until the stop command arrives.
    Spinning,
    /// Stop target armed; catching up to it.
    Settling,
}

#[derive(Debug, Clone, Default)]
pub struct Reel {
    rotation: f64,
    target: f64,
    state: ReelState,
}

impl Reel {
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    pub fn state(&self) -> ReelState {
        self.state
    }

    pub fn start(&mut self) {
        self.state = ReelState::Spinning;
        self.target = self.rotation;
    }

    pub fn arm(&mut self, target: f64) {
        debug_assert!(target >= self.rotation, "stop target behind the reel");
        self.target = target;
        self.state = ReelState::Settling;
    }

    pub fn advance(&mut self, speed: f64) {
        match self.state {
            ReelState::Spinning => self.rotation += speed,
            ReelState::Settling if self.rotation < self.target => {
                self.rotation = (self.rotation + speed).min(self.target);
            }
            _ => {}
        }
    }

    pub fn is_at_rest(&self) -> bool {
        match self.state {
            ReelState::Idle => true,
            ReelState::Spinning => false,
            ReelState::Settling => self.rotation >= self.target,
        }
    }

    /// Drops whole revolutions and returns the reel to `Idle`.
    pub fn normalize(&mut self) {
        self.rotation = normalize_rotation(self.rotation);
        self.target = self.rotation;
        self.state = ReelState::Idle;
    }
}
