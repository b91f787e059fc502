use chrono::{DateTime, Utc};

use crate::{BulkPhase, CanonicalItem, ItemType, Resource};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PageViewModel {
    pub resource: Resource,
    pub rows: Vec<RowView>,
    pub total_items: usize,
    pub filtered_count: usize,
    pub total_pages: usize,
    pub current_page: usize,
    pub page_size: usize,
    pub selected_count: usize,
    pub all_visible_selected: bool,
    pub list_loading: bool,
    pub bulk_phase: BulkPhase,
    pub error: Option<String>,
    pub notice: Option<String>,
    /// Distinct statuses present in the list, for the status dropdown.
    pub statuses: Vec<String>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RowView {
    pub id: String,
    pub title: String,
    pub item_type: ItemType,
    pub status: String,
    pub owner_name: Option<String>,
    pub owner_is_professional: bool,
    pub category: Option<String>,
    pub price: Option<f64>,
    pub quantity: u32,
    pub created_at: Option<DateTime<Utc>>,
    pub selected: bool,
    pub busy: bool,
}

impl RowView {
    pub(crate) fn from_item(item: &CanonicalItem, selected: bool, busy: bool) -> Self {
        Self {
            id: item.id.clone(),
            title: item.title.clone(),
            item_type: item.item_type,
            status: item.status.clone(),
            owner_name: item.owner.as_ref().map(|owner| owner.name.clone()),
            owner_is_professional: item
                .owner
                .as_ref()
                .is_some_and(|owner| owner.is_professional),
            category: item.category.clone(),
            price: item.price,
            quantity: item.quantity,
            created_at: item.created_at,
            selected,
            busy,
        }
    }
}
