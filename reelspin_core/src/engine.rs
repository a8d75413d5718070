use crate::{
    config::MachineConfig,
    rng::{ProvablyFairRng, RandomSource},
    symbols::{Symbol, SYMBOL_ARC, SYMBOL_COUNT},
};
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

pub const REEL_COUNT: usize = 3;

/// Target drawn for one reel at the start of a spin cycle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpinOutcome {
    pub symbol: Symbol,
    pub double: bool,
    pub scroll_to: f64,
}

impl SpinOutcome {
    pub fn new(symbol: Symbol, double: bool) -> Self {
        Self {
            symbol,
            double,
            scroll_to: symbol.scroll_to(),
        }
    }

    pub fn from_draws(double_draw: f64, symbol_draw: f64) -> Self {
        Self::new(Symbol::from_draw(symbol_draw), double_draw.round() >= 1.0)
    }
}

pub fn generate_outcomes<R: RandomSource + ?Sized>(rng: &mut R) -> [SpinOutcome; REEL_COUNT] {
    // per reel: mode draw, then symbol draw
    let floats = rng.next_floats(REEL_COUNT * 2);
    std::array::from_fn(|reel| SpinOutcome::from_draws(floats[reel * 2], floats[reel * 2 + 1]))
}

/// Absolute angle at which a reel currently at `rotation` must come to rest.
pub fn stop_target(rotation: f64, outcome: &SpinOutcome, config: &MachineConfig) -> f64 {
    debug_assert!(rotation.is_finite(), "reel rotation must be finite");
    let mut rounds = (rotation / TAU).floor();
    let done_path = rotation - rounds * TAU;
    if done_path > outcome.scroll_to {
        rounds += 1.0;
    }
    let mut target = outcome.scroll_to + rounds * TAU - config.scroll_back(outcome.double);
    // the reel never turns backwards
    if target < rotation {
        target += ((rotation - target) / TAU).ceil() * TAU;
    }
    target.max(rotation)
}

/// Reduces an angle to `[0, 2π)` without changing the face it shows.
pub fn normalize_rotation(rotation: f64) -> f64 {
    let r = rotation - (rotation / TAU).floor() * TAU;
    if r >= TAU {
        r - TAU
    } else {
        r.max(0.0)
    }
}

/// Symbol shown on the pay line for a reel resting at `rotation` after a `scroll_back` correction.
pub fn landed_symbol(rotation: f64, scroll_back: f64) -> Symbol {
    let face = normalize_rotation(rotation + scroll_back);
    let idx = (face / SYMBOL_ARC).round() as usize % SYMBOL_COUNT;
    Symbol::ALL[idx]
}

/// Verify that a published symbol triple matches what the seeds produce.
pub fn verify_outcomes(
    server_seed: &str,
    client_seed: &str,
    nonce: u64,
    expected_indices: &[u8],
) -> bool {
    let mut rng = ProvablyFairRng::new(server_seed, client_seed, nonce);
    let actual: Vec<u8> = generate_outcomes(&mut rng)
        .iter()
        .map(|o| o.symbol.to_index())
        .collect();
    actual == expected_indices
}
