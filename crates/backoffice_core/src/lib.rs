//! Back-office core: list pipeline, pure page state machine and view-model helpers.
//!
//! Raw API records flow through [`normalize_all`] into canonical items, then
//! through [`apply`] (filter + sort) and [`paginate`] into page rows. The
//! [`Selection`] and the bulk action model sit on top. [`update`] ties them
//! together as a reducer over [`PageState`].
mod action;
mod bulk;
mod effect;
mod item;
mod msg;
mod normalize;
mod paginate;
mod query;
mod resource;
mod selection;
mod state;
mod update;
mod view_model;

pub use action::{ActionKind, Patch};
pub use bulk::{BulkFailure, BulkOutcome, BulkPhase};
pub use effect::Effect;
pub use item::{CanonicalItem, ItemType, Owner, SourceKind, UnknownVariant};
pub use msg::Msg;
pub use normalize::{normalize, normalize_all, unwrap_records};
pub use paginate::{clamp_page, paginate, total_pages, Page, PageSpec, DEFAULT_PAGE_SIZE};
pub use query::{
    apply, apply_indices, FilterCriteria, SortDirection, SortKey, SortSpec, StatusFilter,
    TypeFilter,
};
pub use resource::Resource;
pub use selection::Selection;
pub use state::PageState;
pub use update::update;
pub use view_model::{PageViewModel, RowView};
