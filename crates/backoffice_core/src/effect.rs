use crate::{ActionKind, CanonicalItem, Resource};

/// Side effects requested by [`crate::update`]; executed outside the core.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Load the full list. The answer must echo `generation`.
    FetchList { resource: Resource, generation: u64 },
    /// Run one action. The answer must echo `ticket`.
    RunRowAction {
        ticket: u64,
        resource: Resource,
        action: ActionKind,
        item: CanonicalItem,
    },
    RunBulkAction {
        ticket: u64,
        resource: Resource,
        action: ActionKind,
        targets: Vec<CanonicalItem>,
    },
}
