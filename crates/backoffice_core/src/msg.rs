use serde_json::Value;

use crate::{ActionKind, BulkOutcome, Resource, SortKey, StatusFilter, TypeFilter};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// User switched to another list page.
    ResourceSelected(Resource),
    /// User asked for a fresh copy of the list.
    RefreshRequested,
    /// Engine delivered the raw records of a list fetch.
    ListLoaded { generation: u64, records: Vec<Value> },
    /// Engine could not load the list.
    ListFailed { generation: u64, message: String },
    /// User edited the search box.
    SearchChanged(String),
    TypeFilterChanged(TypeFilter),
    StatusFilterChanged(StatusFilter),
    FiltersReset,
    /// User clicked a column header. Same column again flips the direction.
    SortRequested(SortKey),
    SortCleared,
    PageRequested(usize),
    PageSizeChanged(usize),
    /// User ticked or unticked one row.
    RowToggled(String),
    /// User clicked the "select all" box of the current page.
    VisibleToggled,
    SelectionCleared,
    RowActionRequested { id: String, action: ActionKind },
    /// Engine confirmed a row action. `ticket` echoes the request.
    RowActionSucceeded {
        ticket: u64,
        id: String,
        action: ActionKind,
    },
    RowActionFailed {
        ticket: u64,
        id: String,
        action: ActionKind,
        message: String,
    },
    /// User applied an action to every selected row.
    BulkActionRequested(ActionKind),
    /// Engine finished every request of a bulk action.
    BulkActionSettled {
        ticket: u64,
        action: ActionKind,
        outcome: BulkOutcome,
    },
    ErrorDismissed,
    NoticeDismissed,
    /// Fallback for placeholder wiring.
    NoOp,
}
