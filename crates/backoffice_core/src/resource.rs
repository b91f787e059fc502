use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::action::ActionKind;
use crate::item::{SourceKind, UnknownVariant};

/// Administrative list page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resource {
    Roles,
    #[default]
    Annonces,
    Dons,
    Favoris,
}

impl Resource {
    pub const ALL: [Resource; 4] = [
        Resource::Roles,
        Resource::Annonces,
        Resource::Dons,
        Resource::Favoris,
    ];

    pub fn slug(self) -> &'static str {
        match self {
            Resource::Roles => "roles",
            Resource::Annonces => "annonces",
            Resource::Dons => "dons",
            Resource::Favoris => "favoris",
        }
    }

    pub fn source_kind(self) -> SourceKind {
        match self {
            Resource::Roles => SourceKind::Role,
            Resource::Annonces => SourceKind::Listing,
            Resource::Dons => SourceKind::Donation,
            Resource::Favoris => SourceKind::Favorite,
        }
    }

    pub fn supports(self, action: ActionKind) -> bool {
        use ActionKind::*;
        match self {
            Resource::Roles => matches!(action, Activate | Deactivate | Delete),
            Resource::Annonces | Resource::Dons => {
                matches!(action, Publish | Unpublish | Block | Unblock | Delete)
            }
            Resource::Favoris => action == Delete,
        }
    }

    /// Roles are flagged on delete instead of disappearing from the list.
    pub fn soft_deletes(self) -> bool {
        self == Resource::Roles
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for Resource {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Resource::ALL
            .into_iter()
            .find(|resource| resource.slug() == wanted)
            .ok_or_else(|| UnknownVariant(s.to_string()))
    }
}
