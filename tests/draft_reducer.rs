mod common;

use common::{provider, two_providers};
use settings_engine::draft::{
    Commit, DraftEdit, DraftIntent, DraftReducer, DraftState, Patch, ProviderEdit,
};
use settings_engine::headers::HeaderEntry;
use settings_engine::ids::SequentialIds;
use settings_engine::mvi::Reducer;
use settings_engine::operation::{OperationKind, OperationOutcome};
use settings_engine::selection::Selected;
use std::sync::Arc;

fn reducer() -> DraftReducer {
    DraftReducer::new(Arc::new(SequentialIds::new("row")))
}

fn loaded(reducer: &DraftReducer) -> DraftState {
    reducer.reduce(
        DraftState::default(),
        DraftIntent::Load {
            settings: two_providers(),
        },
    )
}

fn edit(reducer: &DraftReducer, state: DraftState, edit: ProviderEdit) -> DraftState {
    reducer.reduce(state, DraftIntent::Edit(DraftEdit::Provider(edit)))
}

#[test]
fn load_gives_equal_independent_snapshots() {
    let r = reducer();
    let state = loaded(&r);
    assert_eq!(state.baseline(), state.draft());

    let state = edit(&r, state, ProviderEdit::BaseUrl("https://edited".into()));

    assert_eq!(state.draft().current_provider.base_url, "https://edited");
    assert_eq!(state.baseline().current_provider.base_url, "https://a.example.com");
    assert!(state.is_dirty());
}

#[test]
fn discard_restores_baseline_and_is_idempotent() {
    let r = reducer();
    let state = edit(&r, loaded(&r), ProviderEdit::Name("renamed".into()));

    let once = r.reduce(state, DraftIntent::Discard);
    let twice = r.reduce(once.clone(), DraftIntent::Discard);

    assert_eq!(once.draft(), once.baseline());
    assert_eq!(once.draft(), twice.draft());
    assert!(!twice.is_dirty());
}

#[test]
fn discard_on_clean_state_changes_nothing() {
    let r = reducer();
    let state = loaded(&r);
    let after = r.reduce(state.clone(), DraftIntent::Discard);
    assert_eq!(after.baseline(), state.baseline());
    assert_eq!(after.draft(), state.draft());
}

#[test]
fn only_one_blank_header_row() {
    let r = reducer();
    let mut state = loaded(&r);
    for _ in 0..3 {
        state = r.reduce(state, DraftIntent::AddBlankHeader);
    }
    assert_eq!(state.headers().len(), 1);
    assert!(state.headers().has_blank_row());
    // Blank rows never reach the provider's header map.
    assert!(state.draft().current_provider.headers.is_empty());
}

#[test]
fn filled_row_allows_another_blank_row() {
    let r = reducer();
    let state = r.reduce(loaded(&r), DraftIntent::AddBlankHeader);
    let row = state.headers().entries()[0].clone();
    let state = r.reduce(
        state,
        DraftIntent::UpdateHeader {
            entry: HeaderEntry {
                key: "x-trace".into(),
                value: "on".into(),
                ..row
            },
        },
    );
    let state = r.reduce(state, DraftIntent::AddBlankHeader);

    assert_eq!(state.headers().len(), 2);
    assert_eq!(
        state
            .draft()
            .current_provider
            .headers
            .get("x-trace")
            .map(String::as_str),
        Some("on")
    );
}

#[test]
fn header_rows_round_trip_through_the_provider() {
    let r = reducer();
    let mut settings = two_providers();
    settings
        .current_provider
        .headers
        .insert("accept".into(), "json".into());
    settings.available_providers[0] = settings.current_provider.clone();
    let state = r.reduce(DraftState::default(), DraftIntent::Load { settings });

    let row = state.headers().entries()[0].clone();
    let state = r.reduce(state, DraftIntent::RemoveHeader { id: row.id.clone() });
    assert!(state.draft().current_provider.headers.is_empty());
    assert!(state.provider_draft().headers.is_empty());

    let state = r.reduce(state, DraftIntent::Discard);
    assert_eq!(state.headers().len(), 1);
    assert_eq!(state.headers().entries()[0].key, "accept");
    assert_ne!(state.headers().entries()[0].id, row.id);
}

#[test]
fn removing_unknown_header_is_noop() {
    let r = reducer();
    let state = loaded(&r);
    let after = r.reduce(
        state.clone(),
        DraftIntent::RemoveHeader {
            id: "missing".into(),
        },
    );
    assert_eq!(after, state);
}

#[test]
fn renamed_provider_drops_selection() {
    let r = reducer();
    let state = loaded(&r);
    assert_eq!(state.selection().provider.as_deref(), Some("A"));

    let state = edit(&r, state, ProviderEdit::Name("A (edited)".into()));
    assert_eq!(state.selection().provider, Selected::Nothing);

    let state = edit(&r, state, ProviderEdit::Name("A".into()));
    assert_eq!(state.selection().provider.as_deref(), Some("A"));
}

#[test]
fn select_provider_by_name_copies_it_into_the_draft() {
    let r = reducer();
    let state = r.reduce(
        loaded(&r),
        DraftIntent::Edit(DraftEdit::SelectProvider { name: "B".into() }),
    );
    assert_eq!(state.draft().current_provider, provider("b", "B"));
    assert_eq!(state.baseline().current_provider.id, "a");
}

#[test]
fn patch_touches_both_snapshots_but_keeps_other_edits() {
    let r = reducer();
    let state = edit(&r, loaded(&r), ProviderEdit::AuthToken("secret".into()));
    let state = r.reduce(
        state,
        DraftIntent::CommitPatch(Patch::Languages(vec!["en".into(), "fr".into()])),
    );

    assert_eq!(state.baseline().language.languages, vec!["en", "fr"]);
    assert_eq!(state.draft().language.languages, vec!["en", "fr"]);
    assert_eq!(state.draft().current_provider.auth_token, "secret");
    assert_eq!(state.baseline().current_provider.auth_token, "");
}

#[test]
fn rejection_keeps_snapshots_and_records_message() {
    let r = reducer();
    let before = loaded(&r);
    let state = r.reduce(
        before.clone(),
        DraftIntent::OperationRequested {
            operation: OperationKind::DeleteProvider,
        },
    );
    let state = r.reduce(
        state,
        DraftIntent::OperationRejected {
            operation: OperationKind::DeleteProvider,
            message: "nope".into(),
        },
    );

    assert!(!state.is_busy());
    assert_eq!(state.baseline(), before.baseline());
    assert_eq!(state.draft(), before.draft());
    assert_eq!(state.error(OperationKind::DeleteProvider), Some("nope"));
}

#[test]
fn new_request_clears_previous_outcome() {
    let r = reducer();
    let state = r.reduce(
        loaded(&r),
        DraftIntent::LocalFailure {
            operation: OperationKind::AddLanguage,
            message: "Language is required".into(),
        },
    );
    assert!(!state.is_busy());
    assert!(state.error(OperationKind::AddLanguage).is_some());

    let state = r.reduce(
        state,
        DraftIntent::OperationRequested {
            operation: OperationKind::AddLanguage,
        },
    );
    assert_eq!(state.outcome(OperationKind::AddLanguage), None);

    let state = r.reduce(
        state,
        DraftIntent::OperationFulfilled {
            operation: OperationKind::AddLanguage,
            commit: Some(Commit::Patch(Patch::Languages(vec!["en".into()]))),
        },
    );
    assert_eq!(
        state.outcome(OperationKind::AddLanguage),
        Some(&OperationOutcome::Succeeded)
    );
}
