//! Counters returned by bulk operations.

use serde::{Deserialize, Serialize};

/// Outcome of a directory import.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImportSummary {
    pub processed: u64,
    pub created: u64,
    pub updated: u64,
    pub expired: u64,
    pub errors: u64,
}

/// Outcome of `POST /events/batch`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BatchSummary {
    pub created: u64,
    pub updated: u64,
    pub errors: u64,
}

impl BatchSummary {
    pub fn record(&mut self, created: bool) {
        if created {
            self.created += 1;
        } else {
            self.updated += 1;
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewsletterSummary {
    pub sent: u64,
    pub skipped: u64,
    pub errors: u64,
}

impl NewsletterSummary {
    #[must_use]
    pub const fn has_errors(&self) -> bool {
        self.errors > 0
    }
}
