use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Durable progress record for the batch in flight
///
/// Written on every status transition so a controller started mid-run can
/// reconstruct progress. Removed on `complete` and `stopped`, kept with
/// `running = false` after an `error`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub running: bool,
    /// URL of the notebook tab the batch was started against
    pub target: String,
    pub total: usize,
    pub processed: usize,
    pub last_message: String,
    pub updated_at: DateTime<Utc>,
}

impl SessionState {
    pub fn started(target: impl Into<String>, total: usize) -> Self {
        Self {
            running: true,
            target: target.into(),
            total,
            processed: 0,
            last_message: format!("Starting to add {} videos...", total),
            updated_at: Utc::now(),
        }
    }

    /// Count one confirmed insertion, never exceeding `total`
    pub fn record_success(&mut self) {
        if self.processed < self.total {
            self.processed += 1;
        }
    }

    pub fn set_message(&mut self, message: impl Into<String>) {
        self.last_message = message.into();
        self.updated_at = Utc::now();
    }

    pub fn remaining(&self) -> usize {
        self.total.saturating_sub(self.processed)
    }
}
