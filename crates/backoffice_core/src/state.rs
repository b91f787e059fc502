use std::collections::{BTreeMap, BTreeSet};

use crate::bulk::BulkPhase;
use crate::paginate::{clamp_page, paginate, PageSpec};
use crate::query::{apply_indices, FilterCriteria, SortSpec};
use crate::view_model::{PageViewModel, RowView};
use crate::{ActionKind, CanonicalItem, Patch, Resource, Selection};

/// State of one administrative list page.
///
/// The filtered/sorted order is memoized as indices into `items` and rebuilt
/// whenever the list, the criteria or the sort change.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PageState {
    resource: Resource,
    items: Vec<CanonicalItem>,
    criteria: FilterCriteria,
    sort: Option<SortSpec>,
    page: PageSpec,
    selection: Selection,
    filtered: Vec<usize>,
    generation: u64,
    list_loading: bool,
    /// Last ticket handed to a row or bulk action.
    ticket: u64,
    /// Rows with a request in flight, keyed to that request's ticket.
    busy_rows: BTreeMap<String, u64>,
    bulk_phase: BulkPhase,
    bulk_ticket: Option<u64>,
    error: Option<String>,
    notice: Option<String>,
    dirty: bool,
}

impl PageState {
    pub fn new(resource: Resource) -> Self {
        Self {
            resource,
            ..Self::default()
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page = PageSpec::new(1, page_size);
        self
    }

    pub fn resource(&self) -> Resource {
        self.resource
    }

    pub fn items(&self) -> &[CanonicalItem] {
        &self.items
    }

    pub fn item(&self, id: &str) -> Option<&CanonicalItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn sort(&self) -> Option<&SortSpec> {
        self.sort.as_ref()
    }

    pub fn page(&self) -> PageSpec {
        self.page
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_list_loading(&self) -> bool {
        self.list_loading
    }

    pub fn is_row_busy(&self, id: &str) -> bool {
        self.busy_rows.contains_key(id)
    }

    pub fn bulk_phase(&self) -> BulkPhase {
        self.bulk_phase
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// True while a list fetch, row action or bulk action is in flight.
    pub fn is_busy(&self) -> bool {
        self.list_loading || !self.busy_rows.is_empty() || self.bulk_phase == BulkPhase::Running
    }

    pub fn filtered_len(&self) -> usize {
        self.filtered.len()
    }

    /// Ids of the rows on the current page.
    pub fn visible_ids(&self) -> Vec<String> {
        let page = paginate(&self.filtered, self.page);
        page.items
            .iter()
            .map(|index| self.items[*index].id.clone())
            .collect()
    }

    /// Selected items that still exist in the list, in list order.
    pub fn selected_items(&self) -> Vec<CanonicalItem> {
        self.items
            .iter()
            .filter(|item| self.selection.is_selected(&item.id))
            .cloned()
            .collect()
    }

    pub fn view(&self) -> PageViewModel {
        let page = paginate(&self.filtered, self.page);
        let rows: Vec<RowView> = page
            .items
            .iter()
            .map(|index| {
                let item = &self.items[*index];
                RowView::from_item(
                    item,
                    self.selection.is_selected(&item.id),
                    self.busy_rows.contains_key(&item.id),
                )
            })
            .collect();
        let visible: Vec<&str> = rows.iter().map(|row| row.id.as_str()).collect();
        let statuses: BTreeSet<&str> = self.items.iter().map(|item| item.status.as_str()).collect();

        PageViewModel {
            resource: self.resource,
            all_visible_selected: self.selection.is_all_visible_selected(&visible),
            rows,
            total_items: self.items.len(),
            filtered_count: self.filtered.len(),
            total_pages: page.total_pages,
            current_page: page.clamped_page,
            page_size: self.page.page_size,
            selected_count: self.selection.len(),
            list_loading: self.list_loading,
            bulk_phase: self.bulk_phase,
            error: self.error.clone(),
            notice: self.notice.clone(),
            statuses: statuses.into_iter().map(str::to_string).collect(),
            dirty: self.dirty,
        }
    }

    /// Returns whether anything changed since the last call, and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Starts over on another resource. The generation and ticket counters
    /// carry on so answers for the previous resource stay stale.
    pub(crate) fn switch_resource(&mut self, resource: Resource) {
        let page_size = self.page.page_size;
        let generation = self.generation;
        let ticket = self.ticket;
        *self = Self::new(resource).with_page_size(page_size);
        self.generation = generation;
        self.ticket = ticket;
        self.mark_dirty();
    }

    /// Starts a new list fetch and returns its generation. Responses
    /// carrying an older generation are ignored.
    pub(crate) fn begin_fetch(&mut self) -> u64 {
        self.generation += 1;
        self.list_loading = true;
        self.mark_dirty();
        self.generation
    }

    pub(crate) fn is_current_generation(&self, generation: u64) -> bool {
        generation == self.generation
    }

    pub(crate) fn replace_items(&mut self, items: Vec<CanonicalItem>) {
        self.items = items;
        self.list_loading = false;
        self.selection
            .retain_known(self.items.iter().map(|item| item.id.as_str()));
        self.busy_rows
            .retain(|id, _| self.items.iter().any(|item| &item.id == id));
        self.recompute();
        self.clamp_page();
        self.mark_dirty();
    }

    pub(crate) fn fetch_failed(&mut self, message: String) {
        self.list_loading = false;
        self.error = Some(message);
        self.mark_dirty();
    }

    pub(crate) fn criteria_mut(&mut self) -> &mut FilterCriteria {
        &mut self.criteria
    }

    /// Call after editing criteria: refilters and returns to page 1.
    pub(crate) fn criteria_changed(&mut self) {
        self.page.page_index = 1;
        self.recompute();
        self.mark_dirty();
    }

    pub(crate) fn reset_criteria(&mut self) {
        self.criteria = FilterCriteria::default();
        self.selection.clear();
        self.criteria_changed();
    }

    pub(crate) fn set_sort(&mut self, sort: Option<SortSpec>) {
        self.sort = sort;
        self.recompute();
        self.clamp_page();
        self.mark_dirty();
    }

    pub(crate) fn request_page(&mut self, page_index: usize) {
        let clamped = clamp_page(page_index, self.filtered.len(), self.page.page_size);
        if clamped != self.page.page_index {
            self.page.page_index = clamped;
            self.mark_dirty();
        }
    }

    pub(crate) fn set_page_size(&mut self, page_size: usize) {
        self.page = PageSpec::new(1, page_size);
        self.mark_dirty();
    }

    pub(crate) fn selection_mut(&mut self) -> &mut Selection {
        self.mark_dirty();
        &mut self.selection
    }

    fn next_ticket(&mut self) -> u64 {
        self.ticket += 1;
        self.ticket
    }

    /// Marks a row busy and returns the ticket its answer must echo, or
    /// `None` if the row already has a request in flight.
    pub(crate) fn begin_row_action(&mut self, id: &str) -> Option<u64> {
        if self.busy_rows.contains_key(id) {
            return None;
        }
        let ticket = self.next_ticket();
        self.busy_rows.insert(id.to_string(), ticket);
        self.mark_dirty();
        Some(ticket)
    }

    /// Releases the row if `ticket` is the request it is waiting for.
    /// Returns false for answers that belong to an earlier page.
    pub(crate) fn finish_row_action(&mut self, id: &str, ticket: u64) -> bool {
        if self.busy_rows.get(id) != Some(&ticket) {
            return false;
        }
        self.busy_rows.remove(id);
        self.mark_dirty();
        true
    }

    pub(crate) fn begin_bulk(&mut self) -> u64 {
        let ticket = self.next_ticket();
        self.bulk_ticket = Some(ticket);
        self.bulk_phase = BulkPhase::Running;
        self.mark_dirty();
        ticket
    }

    /// Moves a running bulk action to settled if `ticket` is the one it
    /// started with.
    pub(crate) fn finish_bulk(&mut self, ticket: u64) -> bool {
        if self.bulk_ticket != Some(ticket) {
            return false;
        }
        self.bulk_ticket = None;
        self.bulk_phase = BulkPhase::Settled;
        self.mark_dirty();
        true
    }

    pub(crate) fn set_error(&mut self, message: Option<String>) {
        self.error = message;
        self.mark_dirty();
    }

    pub(crate) fn set_notice(&mut self, message: Option<String>) {
        self.notice = message;
        self.mark_dirty();
    }

    /// Applies a confirmed action to the local copy of one item. Returns
    /// false when the id is no longer in the list.
    pub(crate) fn apply_confirmed(&mut self, id: &str, action: ActionKind) -> bool {
        let soft_delete = self.resource.soft_deletes();
        let Some(position) = self.items.iter().position(|item| item.id == id) else {
            return false;
        };
        if action.patch(&mut self.items[position], soft_delete) == Patch::Remove {
            self.items.remove(position);
            self.selection.retain_known(self.items.iter().map(|item| item.id.as_str()));
        }
        self.recompute();
        self.clamp_page();
        self.mark_dirty();
        true
    }

    fn recompute(&mut self) {
        self.filtered = apply_indices(&self.items, &self.criteria, self.sort.as_ref());
    }

    fn clamp_page(&mut self) {
        self.page.page_index =
            clamp_page(self.page.page_index, self.filtered.len(), self.page.page_size);
    }
}
