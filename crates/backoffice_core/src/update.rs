use backoffice_logging::{bo_debug, bo_info};

use crate::normalize::normalize_all;
use crate::{ActionKind, BulkOutcome, BulkPhase, Effect, Msg, PageState, SortSpec, StatusFilter};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: PageState, msg: Msg) -> (PageState, Vec<Effect>) {
    let effects = match msg {
        Msg::ResourceSelected(resource) => {
            if resource == state.resource() {
                return (state, Vec::new());
            }
            state.switch_resource(resource);
            vec![fetch(&mut state)]
        }
        Msg::RefreshRequested => {
            state.selection_mut().clear();
            vec![fetch(&mut state)]
        }
        Msg::ListLoaded {
            generation,
            records,
        } => {
            if !state.is_current_generation(generation) {
                bo_debug!(
                    "Ignoring stale list response gen={} (current {})",
                    generation,
                    state.generation()
                );
                return (state, Vec::new());
            }
            let items = normalize_all(&records, state.resource().source_kind());
            bo_debug!(
                "Loaded {} {} items from {} records",
                items.len(),
                state.resource(),
                records.len()
            );
            state.replace_items(items);
            Vec::new()
        }
        Msg::ListFailed {
            generation,
            message,
        } => {
            if !state.is_current_generation(generation) {
                return (state, Vec::new());
            }
            state.fetch_failed(message);
            Vec::new()
        }
        Msg::SearchChanged(text) => {
            if state.criteria().search_text != text {
                state.criteria_mut().search_text = text;
                state.criteria_changed();
            }
            Vec::new()
        }
        Msg::TypeFilterChanged(filter) => {
            if state.criteria().type_filter != filter {
                state.criteria_mut().type_filter = filter;
                state.criteria_changed();
            }
            Vec::new()
        }
        Msg::StatusFilterChanged(filter) => {
            let filter = match filter {
                StatusFilter::Only(status) if status.trim().is_empty() => StatusFilter::All,
                other => other,
            };
            if state.criteria().status_filter != filter {
                state.criteria_mut().status_filter = filter;
                state.criteria_changed();
            }
            Vec::new()
        }
        Msg::FiltersReset => {
            state.reset_criteria();
            Vec::new()
        }
        Msg::SortRequested(key) => {
            let next = match state.sort() {
                Some(current) if current.key == key => SortSpec {
                    key,
                    direction: current.direction.reversed(),
                },
                _ => SortSpec::ascending(key),
            };
            state.set_sort(Some(next));
            Vec::new()
        }
        Msg::SortCleared => {
            if state.sort().is_some() {
                state.set_sort(None);
            }
            Vec::new()
        }
        Msg::PageRequested(page_index) => {
            state.request_page(page_index);
            Vec::new()
        }
        Msg::PageSizeChanged(page_size) => {
            state.set_page_size(page_size);
            Vec::new()
        }
        Msg::RowToggled(id) => {
            state.selection_mut().toggle_one(&id);
            Vec::new()
        }
        Msg::VisibleToggled => {
            let visible = state.visible_ids();
            if !visible.is_empty() {
                state.selection_mut().toggle_all_visible(&visible);
            }
            Vec::new()
        }
        Msg::SelectionCleared => {
            if !state.selection().is_empty() {
                state.selection_mut().clear();
            }
            Vec::new()
        }
        Msg::RowActionRequested { id, action } => row_action_requested(&mut state, id, action),
        Msg::RowActionSucceeded { ticket, id, action } => {
            if !state.finish_row_action(&id, ticket) {
                bo_debug!("Ignoring stale {} answer for {} (ticket {})", action, id, ticket);
                return (state, Vec::new());
            }
            let title = state.item(&id).map(|item| item.title.clone());
            if state.apply_confirmed(&id, action) {
                let title = title.unwrap_or_else(|| id.clone());
                state.set_notice(Some(format!("\"{title}\" {}", action.past_tense())));
            }
            vec![fetch(&mut state)]
        }
        Msg::RowActionFailed {
            ticket,
            id,
            action,
            message,
        } => {
            if !state.finish_row_action(&id, ticket) {
                bo_debug!("Ignoring stale {} failure for {} (ticket {})", action, id, ticket);
                return (state, Vec::new());
            }
            state.set_error(Some(format!("Could not {action}: {message}")));
            Vec::new()
        }
        Msg::BulkActionRequested(action) => bulk_action_requested(&mut state, action),
        Msg::BulkActionSettled {
            ticket,
            action,
            outcome,
        } => {
            if !state.finish_bulk(ticket) {
                bo_debug!("Ignoring stale bulk {} outcome (ticket {})", action, ticket);
                return (state, Vec::new());
            }
            bulk_action_settled(&mut state, action, outcome);
            vec![fetch(&mut state)]
        }
        Msg::ErrorDismissed => {
            if state.error().is_some() {
                state.set_error(None);
            }
            Vec::new()
        }
        Msg::NoticeDismissed => {
            if state.notice().is_some() {
                state.set_notice(None);
            }
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn fetch(state: &mut PageState) -> Effect {
    let generation = state.begin_fetch();
    Effect::FetchList {
        resource: state.resource(),
        generation,
    }
}

fn row_action_requested(state: &mut PageState, id: String, action: ActionKind) -> Vec<Effect> {
    let resource = state.resource();
    if !resource.supports(action) {
        state.set_error(Some(format!("Cannot {action} {resource}")));
        return Vec::new();
    }
    let Some(item) = state.item(&id).cloned() else {
        state.set_error(Some(format!("Item {id} is no longer in the list")));
        return Vec::new();
    };
    // One request per row at a time.
    let Some(ticket) = state.begin_row_action(&id) else {
        return Vec::new();
    };
    vec![Effect::RunRowAction {
        ticket,
        resource,
        action,
        item,
    }]
}

fn bulk_action_requested(state: &mut PageState, action: ActionKind) -> Vec<Effect> {
    let resource = state.resource();
    if state.bulk_phase() == BulkPhase::Running {
        return Vec::new();
    }
    if !resource.supports(action) {
        state.set_error(Some(format!("Cannot {action} {resource}")));
        return Vec::new();
    }
    let targets = state.selected_items();
    if targets.is_empty() {
        state.set_error(Some("No items selected".to_string()));
        return Vec::new();
    }
    let ticket = state.begin_bulk();
    vec![Effect::RunBulkAction {
        ticket,
        resource,
        action,
        targets,
    }]
}

fn bulk_action_settled(state: &mut PageState, action: ActionKind, outcome: BulkOutcome) {
    for item in &outcome.succeeded {
        state.apply_confirmed(&item.id, action);
    }
    // Keep the failed subset selected so it can be re-dispatched.
    state.selection_mut().replace(outcome.failed_ids());

    let summary = outcome.summary(action);
    bo_info!("Bulk {} on {}: {}", action, state.resource(), summary);
    if outcome.is_complete_failure() {
        let first = outcome
            .failed
            .first()
            .map(|failure| failure.error.as_str())
            .unwrap_or_default();
        state.set_error(Some(format!("{summary} ({first})")));
        state.set_notice(None);
    } else {
        state.set_notice(Some(summary));
    }
}
