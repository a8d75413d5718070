use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One settled spin cycle as reported by a driver.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SpinReport {
    pub ts: DateTime<Utc>,
    pub nonce: Option<u64>,
    pub symbols: Vec<u8>, // indices of symbols, reel order
    pub double_flags: Vec<bool>,
    pub payout: u32,
    pub label: String,
    pub balance: i64,
}

impl SpinReport {
    pub fn symbols_csv(&self) -> String {
        self.symbols
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .join("-")
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct SimulationSummary {
    pub spins: u64,
    pub wins: u64,
    pub total_wagered: i64,
    pub total_paid: u64,
    pub biggest_payout: u32,
    pub final_balance: i64,
}

impl SimulationSummary {
    pub fn record(&mut self, cost: i64, payout: u32, balance: i64) {
        self.spins += 1;
        self.total_wagered += cost;
        self.total_paid += u64::from(payout);
        if payout > 0 {
            self.wins += 1;
        }
        self.biggest_payout = self.biggest_payout.max(payout);
        self.final_balance = balance;
    }

    /// Paid out per unit wagered; 0 before anything was wagered.
    pub fn rtp(&self) -> f64 {
        if self.total_wagered <= 0 {
            return 0.0;
        }
        self.total_paid as f64 / self.total_wagered as f64
    }

    pub fn hit_rate(&self) -> f64 {
        if self.spins == 0 {
            return 0.0;
        }
        self.wins as f64 / self.spins as f64
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct VerifyReport {
    pub server_seed_hash: String,
    pub nonce: u64,
    pub expected: Vec<u8>,
    pub matches: bool,
}
