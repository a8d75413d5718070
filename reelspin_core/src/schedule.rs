use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopCommand {
    pub reel: usize,
    pub deadline_ms: u64,
}

/// Pending stop commands, kept sorted by deadline.
#[derive(Debug, Clone, Default)]
pub struct StopSchedule {
    pending: Vec<StopCommand>,
}

impl StopSchedule {
    /// Queues a command. Returns false if the reel already has one pending.
    pub fn push(&mut self, cmd: StopCommand) -> bool {
        if self.pending.iter().any(|c| c.reel == cmd.reel) {
            return false;
        }
        // equal deadlines keep insertion order
        let at = self
            .pending
            .partition_point(|c| c.deadline_ms <= cmd.deadline_ms);
        self.pending.insert(at, cmd);
        true
    }

    /// Removes and returns every command due at `now_ms`, earliest first.
    pub fn take_due(&mut self, now_ms: u64) -> Vec<StopCommand> {
        let due = self.pending.partition_point(|c| c.deadline_ms <= now_ms);
        self.pending.drain(..due).collect()
    }

    pub fn next_deadline(&self) -> Option<u64> {
        self.pending.first().map(|c| c.deadline_ms)
    }

    pub fn pending(&self) -> &[StopCommand] {
        &self.pending
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}
