//! Reducers for the `all_entries` cache slice

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::files::actions::Action;
use crate::files::state::{FileData, State};

/// Cache every entry the action carries
///
/// Runs before any slice reducer so those can look entries up by key.
/// Caching is idempotent: if nothing new is added, `state` comes back with
/// the same `all_entries` allocation.
pub fn cache_entries(state: &State, action: &Action) -> State {
    let entry = match action {
        Action::ChangeDirectory {
            new_directory: Some(entry),
            ..
        } => entry,
        _ => return state.clone(),
    };

    let data = FileData::from(entry);
    if state.all_entries.contains_key(&data.key) {
        return state.clone();
    }

    let mut all_entries = (*state.all_entries).clone();
    all_entries.insert(data.key.clone(), data);
    State {
        all_entries: Arc::new(all_entries),
        ..state.clone()
    }
}

/// Drop cached entries that the current directory does not reference
///
/// The current directory and every one of its path components survive.
pub fn clear_cached_entries(state: &State) -> State {
    let mut keep = BTreeSet::new();
    if let Some(current) = &state.current_directory {
        keep.insert(current.key.as_str());
        keep.extend(current.path_components.iter().map(|c| c.key.as_str()));
    }

    let stale = state
        .all_entries
        .keys()
        .filter(|key| !keep.contains(key.as_str()))
        .count();
    if stale == 0 {
        return state.clone();
    }

    let all_entries = state
        .all_entries
        .iter()
        .filter(|(key, _)| keep.contains(key.as_str()))
        .map(|(key, data)| (key.clone(), data.clone()))
        .collect();

    tracing::debug!(removed = stale, "cleared stale cached entries");
    State {
        all_entries: Arc::new(all_entries),
        ..state.clone()
    }
}
