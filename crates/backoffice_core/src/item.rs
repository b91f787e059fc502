use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

/// Display category of a canonical item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    Product,
    Donation,
    Exchange,
    Listing,
}

impl ItemType {
    pub const ALL: [ItemType; 4] = [
        ItemType::Product,
        ItemType::Donation,
        ItemType::Exchange,
        ItemType::Listing,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ItemType::Product => "product",
            ItemType::Donation => "donation",
            ItemType::Exchange => "exchange",
            ItemType::Listing => "listing",
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant(pub String);

impl fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown variant '{}'", self.0)
    }
}

impl std::error::Error for UnknownVariant {}

impl FromStr for ItemType {
    type Err = UnknownVariant;

    /// Accepts the English names as well as the API's French sub-type names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "product" | "produit" => Ok(ItemType::Product),
            "donation" | "don" => Ok(ItemType::Donation),
            "exchange" | "echange" | "échange" => Ok(ItemType::Exchange),
            "listing" | "annonce" => Ok(ItemType::Listing),
            _ => Err(UnknownVariant(s.to_string())),
        }
    }
}

/// Shape of a raw API record, which decides how it is normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    Product,
    Donation,
    Exchange,
    Listing,
    /// A favorite entry wrapping the favorited record.
    Favorite,
    /// A role-like entity that can be soft-deleted.
    Role,
}

impl SourceKind {
    /// Item type used when the record itself does not say otherwise.
    pub fn default_item_type(self) -> ItemType {
        match self {
            SourceKind::Product => ItemType::Product,
            SourceKind::Donation => ItemType::Donation,
            SourceKind::Exchange => ItemType::Exchange,
            SourceKind::Listing | SourceKind::Favorite | SourceKind::Role => ItemType::Listing,
        }
    }
}

impl FromStr for SourceKind {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "favorite" | "favori" | "favoris" => Ok(SourceKind::Favorite),
            "role" | "roles" => Ok(SourceKind::Role),
            other => match other.parse::<ItemType>()? {
                ItemType::Product => Ok(SourceKind::Product),
                ItemType::Donation => Ok(SourceKind::Donation),
                ItemType::Exchange => Ok(SourceKind::Exchange),
                ItemType::Listing => Ok(SourceKind::Listing),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Owner {
    pub name: String,
    pub is_professional: bool,
}

/// Normalized, display-ready record built from a heterogeneous API payload.
///
/// `raw` keeps the source payload for detail views; nothing in the
/// filter/sort/paginate pipeline reads it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CanonicalItem {
    pub id: String,
    pub title: String,
    pub description: String,
    pub item_type: ItemType,
    pub status: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub is_published: bool,
    pub is_blocked: bool,
    pub is_deleted: bool,
    pub price: Option<f64>,
    pub quantity: u32,
    pub owner: Option<Owner>,
    pub category: Option<String>,
    #[serde(skip)]
    pub raw: Value,
}

impl CanonicalItem {
    /// Minimal item with safe defaults; mostly useful for tests and fixtures.
    pub fn new(id: impl Into<String>, title: impl Into<String>, item_type: ItemType) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            item_type,
            status: "pending".to_string(),
            created_at: None,
            updated_at: None,
            is_published: false,
            is_blocked: false,
            is_deleted: false,
            price: None,
            quantity: 1,
            owner: None,
            category: None,
            raw: Value::Null,
        }
    }

    pub fn owner_name(&self) -> Option<&str> {
        self.owner.as_ref().map(|owner| owner.name.as_str())
    }
}
