use crate::action::ActionKind;
use crate::item::CanonicalItem;

/// Lifecycle of a bulk action: `Idle -> Running -> Settled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BulkPhase {
    #[default]
    Idle,
    Running,
    Settled,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BulkFailure {
    pub item: CanonicalItem,
    pub error: String,
}

/// Settled result of a bulk action, partitioned by outcome.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BulkOutcome {
    pub succeeded: Vec<CanonicalItem>,
    pub failed: Vec<BulkFailure>,
}

impl BulkOutcome {
    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    pub fn is_complete_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn is_complete_failure(&self) -> bool {
        self.succeeded.is_empty() && !self.failed.is_empty()
    }

    pub fn failed_ids(&self) -> impl Iterator<Item = &str> {
        self.failed.iter().map(|failure| failure.item.id.as_str())
    }

    /// Human-readable summary, e.g. `"8 of 10 published, 2 failed"`.
    pub fn summary(&self, action: ActionKind) -> String {
        let base = format!(
            "{} of {} {}",
            self.succeeded.len(),
            self.total(),
            action.past_tense()
        );
        if self.failed.is_empty() {
            base
        } else {
            format!("{base}, {} failed", self.failed.len())
        }
    }
}
