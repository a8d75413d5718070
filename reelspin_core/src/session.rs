pub const INITIAL_LABEL: &str = "Here will be your result";

/// Balance and last outcome label for the running machine. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    balance: i64,
    last_label: String,
}

impl Session {
    pub fn new(balance: i64) -> Self {
        Self {
            balance,
            last_label: INITIAL_LABEL.to_string(),
        }
    }

    pub fn balance(&self) -> i64 {
        self.balance
    }

    pub fn last_label(&self) -> &str {
        &self.last_label
    }

    pub(crate) fn charge(&mut self, cost: i64) {
        self.balance -= cost;
    }

    pub(crate) fn credit(&mut self, payout: u32) {
        self.balance += i64::from(payout);
    }

    pub(crate) fn set_label(&mut self, label: String) {
        self.last_label = label;
    }
}
