use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

pub const SYMBOL_COUNT: usize = 5;

/// Angular width of one symbol face on the reel strip.
pub const SYMBOL_ARC: f64 = TAU / SYMBOL_COUNT as f64;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Symbol {
    Seven,
    Cherry,
    Bar,
    DoubleBar,
    TripleBar,
}

impl Symbol {
    pub const ALL: [Symbol; SYMBOL_COUNT] = [
        Symbol::Seven,
        Symbol::Cherry,
        Symbol::Bar,
        Symbol::DoubleBar,
        Symbol::TripleBar,
    ];

    pub fn from_index(i: u8) -> Option<Self> {
        match i {
            0 => Some(Symbol::Seven),
            1 => Some(Symbol::Cherry),
            2 => Some(Symbol::Bar),
            3 => Some(Symbol::DoubleBar),
            4 => Some(Symbol::TripleBar),
            _ => None,
        }
    }

    pub fn to_index(self) -> u8 {
        match self {
            Symbol::Seven => 0,
            Symbol::Cherry => 1,
            Symbol::Bar => 2,
            Symbol::DoubleBar => 3,
            Symbol::TripleBar => 4,
        }
    }

    /// Maps a uniform draw in `[0, 1)` onto the symbol domain.
    pub fn from_draw(draw: f64) -> Self {
        let idx = ((draw * SYMBOL_COUNT as f64).floor() as usize).min(SYMBOL_COUNT - 1);
        Self::ALL[idx]
    }

    /// Angle fragment within one revolution at which this symbol faces the pay line.
    pub fn scroll_to(self) -> f64 {
        SYMBOL_ARC * self.to_index() as f64
    }

    pub fn name(self) -> &'static str {
        match self {
            Symbol::Seven => "seven",
            Symbol::Cherry => "cherry",
            Symbol::Bar => "bar",
            Symbol::DoubleBar => "bar2",
            Symbol::TripleBar => "bar3",
        }
    }
}
