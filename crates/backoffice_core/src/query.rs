use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::item::{CanonicalItem, ItemType, UnknownVariant};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TypeFilter {
    #[default]
    All,
    Only(ItemType),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(String),
}

/// Active filter dimensions. Every dimension must match; an empty search
/// and `All` filters let everything through.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterCriteria {
    pub search_text: String,
    pub type_filter: TypeFilter,
    pub status_filter: StatusFilter,
}

impl FilterCriteria {
    pub fn is_empty(&self) -> bool {
        self.search_text.trim().is_empty()
            && self.type_filter == TypeFilter::All
            && self.status_filter == StatusFilter::All
    }

    pub fn matches(&self, item: &CanonicalItem) -> bool {
        self.matches_type(item) && self.matches_status(item) && self.matches_search(item)
    }

    fn matches_type(&self, item: &CanonicalItem) -> bool {
        match self.type_filter {
            TypeFilter::All => true,
            TypeFilter::Only(item_type) => item.item_type == item_type,
        }
    }

    fn matches_status(&self, item: &CanonicalItem) -> bool {
        match &self.status_filter {
            StatusFilter::All => true,
            StatusFilter::Only(status) => item.status.eq_ignore_ascii_case(status.trim()),
        }
    }

    fn matches_search(&self, item: &CanonicalItem) -> bool {
        let needle = self.search_text.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        let contains = |haystack: &str| haystack.to_lowercase().contains(&needle);
        contains(&item.title)
            || contains(&item.description)
            || item.category.as_deref().is_some_and(contains)
            || item.owner_name().is_some_and(contains)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    Title,
    Description,
    ItemType,
    Status,
    CreatedAt,
    UpdatedAt,
    Price,
    Quantity,
    Category,
    OwnerName,
    Published,
    Blocked,
}

impl SortKey {
    pub const ALL: [SortKey; 12] = [
        SortKey::Title,
        SortKey::Description,
        SortKey::ItemType,
        SortKey::Status,
        SortKey::CreatedAt,
        SortKey::UpdatedAt,
        SortKey::Price,
        SortKey::Quantity,
        SortKey::Category,
        SortKey::OwnerName,
        SortKey::Published,
        SortKey::Blocked,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Title => "title",
            SortKey::Description => "description",
            SortKey::ItemType => "item_type",
            SortKey::Status => "status",
            SortKey::CreatedAt => "created_at",
            SortKey::UpdatedAt => "updated_at",
            SortKey::Price => "price",
            SortKey::Quantity => "quantity",
            SortKey::Category => "category",
            SortKey::OwnerName => "owner_name",
            SortKey::Published => "published",
            SortKey::Blocked => "blocked",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('-', "_");
        SortKey::ALL
            .into_iter()
            .find(|key| key.as_str() == wanted)
            .ok_or_else(|| UnknownVariant(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn reversed(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn ascending(key: SortKey) -> Self {
        Self {
            key,
            direction: SortDirection::Ascending,
        }
    }

    pub fn descending(key: SortKey) -> Self {
        Self {
            key,
            direction: SortDirection::Descending,
        }
    }
}

/// Comparable projection of one field. Strings are pre-lowercased.
#[derive(Debug, PartialEq)]
enum SortValue {
    Text(String),
    Number(f64),
    Time(i64),
    Flag(bool),
}

impl SortValue {
    fn compare(&self, other: &SortValue) -> Ordering {
        match (self, other) {
            (SortValue::Text(a), SortValue::Text(b)) => a.cmp(b),
            (SortValue::Number(a), SortValue::Number(b)) => a.total_cmp(b),
            (SortValue::Time(a), SortValue::Time(b)) => a.cmp(b),
            (SortValue::Flag(a), SortValue::Flag(b)) => a.cmp(b),
            // A key always projects to one variant, so this is unreachable in practice.
            _ => Ordering::Equal,
        }
    }
}

fn sort_value(item: &CanonicalItem, key: SortKey) -> Option<SortValue> {
    let text = |value: &str| Some(SortValue::Text(value.to_lowercase()));
    match key {
        SortKey::Title => text(&item.title),
        SortKey::Description => text(&item.description),
        SortKey::ItemType => text(item.item_type.as_str()),
        SortKey::Status => text(&item.status),
        SortKey::CreatedAt => item
            .created_at
            .map(|at| SortValue::Time(at.timestamp_millis())),
        SortKey::UpdatedAt => item
            .updated_at
            .map(|at| SortValue::Time(at.timestamp_millis())),
        SortKey::Price => item.price.map(SortValue::Number),
        SortKey::Quantity => Some(SortValue::Number(f64::from(item.quantity))),
        SortKey::Category => item.category.as_deref().and_then(text),
        SortKey::OwnerName => item.owner_name().and_then(text),
        SortKey::Published => Some(SortValue::Flag(item.is_published)),
        SortKey::Blocked => Some(SortValue::Flag(item.is_blocked)),
    }
}

/// Orders two optional values; absent values go last in both directions.
fn compare_present_first(
    a: &Option<SortValue>,
    b: &Option<SortValue>,
    direction: SortDirection,
) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => match direction {
            SortDirection::Ascending => a.compare(b),
            SortDirection::Descending => b.compare(a),
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Filters then sorts a snapshot without touching the input.
///
/// The sort is stable: items with equal keys keep their filtered order.
pub fn apply(
    items: &[CanonicalItem],
    criteria: &FilterCriteria,
    sort: Option<&SortSpec>,
) -> Vec<CanonicalItem> {
    apply_indices(items, criteria, sort)
        .into_iter()
        .map(|index| items[index].clone())
        .collect()
}

/// Same as [`apply`], but yields positions into `items`.
pub fn apply_indices(
    items: &[CanonicalItem],
    criteria: &FilterCriteria,
    sort: Option<&SortSpec>,
) -> Vec<usize> {
    let filtered = items
        .iter()
        .enumerate()
        .filter(|(_, item)| criteria.matches(item));
    let Some(sort) = sort else {
        return filtered.map(|(index, _)| index).collect();
    };

    // Project keys once instead of re-lowercasing inside the comparator.
    let mut keyed: Vec<(Option<SortValue>, usize)> = filtered
        .map(|(index, item)| (sort_value(item, sort.key), index))
        .collect();
    keyed.sort_by(|(a, _), (b, _)| compare_present_first(a, b, sort.direction));
    keyed.into_iter().map(|(_, index)| index).collect()
}
