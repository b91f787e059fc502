use std::fmt;
use std::str::FromStr;

use crate::item::{CanonicalItem, UnknownVariant};

/// Mutation that can be applied to one row or to a selected set of rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Activate,
    Deactivate,
    Delete,
    Publish,
    Unpublish,
    Block,
    Unblock,
}

/// What the local list should do with an item once its action succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Patch {
    Keep,
    Remove,
}

impl ActionKind {
    pub const ALL: [ActionKind; 7] = [
        ActionKind::Activate,
        ActionKind::Deactivate,
        ActionKind::Delete,
        ActionKind::Publish,
        ActionKind::Unpublish,
        ActionKind::Block,
        ActionKind::Unblock,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ActionKind::Activate => "activate",
            ActionKind::Deactivate => "deactivate",
            ActionKind::Delete => "delete",
            ActionKind::Publish => "publish",
            ActionKind::Unpublish => "unpublish",
            ActionKind::Block => "block",
            ActionKind::Unblock => "unblock",
        }
    }

    /// Past participle used in summaries ("8 of 10 published").
    pub fn past_tense(self) -> &'static str {
        match self {
            ActionKind::Activate => "activated",
            ActionKind::Deactivate => "deactivated",
            ActionKind::Delete => "deleted",
            ActionKind::Publish => "published",
            ActionKind::Unpublish => "unpublished",
            ActionKind::Block => "blocked",
            ActionKind::Unblock => "unblocked",
        }
    }

    /// Applies the confirmed effect of this action to a local copy.
    ///
    /// Deleting removes the row unless the resource soft-deletes, in which
    /// case the row stays and is flagged.
    pub fn patch(self, item: &mut CanonicalItem, soft_delete: bool) -> Patch {
        match self {
            ActionKind::Activate => {
                item.is_deleted = false;
                item.status = "active".to_string();
            }
            ActionKind::Deactivate => {
                item.status = "inactive".to_string();
            }
            ActionKind::Delete => {
                if !soft_delete {
                    return Patch::Remove;
                }
                item.is_deleted = true;
                item.status = "deleted".to_string();
            }
            ActionKind::Publish => {
                item.is_published = true;
                item.status = "published".to_string();
            }
            ActionKind::Unpublish => {
                item.is_published = false;
                item.status = "pending".to_string();
            }
            ActionKind::Block => {
                item.is_blocked = true;
                item.status = "blocked".to_string();
            }
            ActionKind::Unblock => {
                item.is_blocked = false;
                item.status = if item.is_published {
                    "published".to_string()
                } else {
                    "active".to_string()
                };
            }
        }
        Patch::Keep
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionKind {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        ActionKind::ALL
            .into_iter()
            .find(|action| action.as_str() == wanted)
            .ok_or_else(|| UnknownVariant(s.to_string()))
    }
}
