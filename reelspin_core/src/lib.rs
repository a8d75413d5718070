pub mod clock;
pub mod config;
pub mod controller;
pub mod engine;
pub mod paytable;
pub mod reel;
pub mod rng;
pub mod schedule;
pub mod session;
pub mod symbols;

pub use crate::clock::{Clock, SystemClock, VirtualClock};
pub use crate::config::{ConfigError, MachineConfig};
pub use crate::controller::{SpinController, SpinResult, MAX_CYCLE_FRAMES};
pub use crate::engine::{
    generate_outcomes, landed_symbol, normalize_rotation, stop_target, verify_outcomes,
    SpinOutcome, REEL_COUNT,
};
pub use crate::paytable::{evaluate, Paytable, PaytableEntry};
pub use crate::reel::{Reel, ReelState};
pub use crate::rng::{
    derive_floats, derive_hash_hex, ProvablyFairRng, RandomSource, SequenceRandom, StdRandom,
};
pub use crate::schedule::{StopCommand, StopSchedule};
pub use crate::session::{Session, INITIAL_LABEL};
pub use crate::symbols::{Symbol, SYMBOL_COUNT};
