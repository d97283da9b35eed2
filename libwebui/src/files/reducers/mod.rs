//! Pure reducers for the Files app state
//!
//! The root reducer is the only way to produce a new [`State`]:
//! `(&State, &Action) -> State`.
//!
//! # Purity Guarantees
//!
//! - No I/O, no scheduling
//! - The input state is never mutated
//! - Deterministic (same inputs -> equal output)
//! - Slices a transition does not own are shared with the input by `Arc`

pub mod all_entries;
pub mod current_directory;
pub mod search;

use std::sync::Arc;

use super::actions::Action;
use super::state::State;

use self::all_entries::{cache_entries, clear_cached_entries};
use self::current_directory::change_directory;
use self::search::search;

/// Root reducer for the Files app state
///
/// Entries carried by the action are cached first, so every slice reducer
/// can rely on finding them in `all_entries`. The action is then routed to
/// the single reducer owning the affected slice, and the result is merged
/// into a new top-level state.
pub fn root_reducer(current_state: &State, action: &Action) -> State {
    let state = cache_entries(current_state, action);

    match action {
        Action::ChangeDirectory { key, status, .. } => {
            let current_directory = change_directory(&state, key, *status);
            State {
                current_directory: Some(Arc::new(current_directory)),
                ..state
            }
        }

        Action::ClearStaleCachedEntries => clear_cached_entries(&state),

        Action::Search {
            query,
            status,
            options,
        } => {
            let search = search(&state, query.as_deref(), *status, *options);
            State {
                search: Some(Arc::new(search)),
                ..state
            }
        }

        Action::Unknown => {
            tracing::error!(action = ?action, "invalid action, state unchanged");
            state
        }
    }
}
