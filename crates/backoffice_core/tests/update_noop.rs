use backoffice_core::{update, Msg, PageState, Resource};

#[test]
fn update_is_noop() {
    let state = PageState::new(Resource::Annonces);
    let (next, effects) = update(state.clone(), Msg::NoOp);

    assert_eq!(state, next);
    assert!(effects.is_empty());
}

#[test]
fn reselecting_the_same_resource_is_noop() {
    let state = PageState::new(Resource::Dons);
    let (next, effects) = update(state.clone(), Msg::ResourceSelected(Resource::Dons));

    assert_eq!(state, next);
    assert!(effects.is_empty());
}

#[test]
fn dismissing_nothing_keeps_state_clean() {
    let mut state = PageState::new(Resource::Roles);
    assert!(!state.consume_dirty());
    let (mut next, _) = update(state, Msg::NoticeDismissed);
    let dirty_after_notice = next.consume_dirty();
    let (mut next, _) = update(next, Msg::ErrorDismissed);

    assert!(!dirty_after_notice);
    assert!(!next.consume_dirty());
}
