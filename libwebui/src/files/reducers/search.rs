//! Reducer for the `search` slice

use crate::files::state::{PropStatus, SearchData, SearchOptions, State};

/// Compute the search slice for a search action
///
/// With every field absent the search is cleared. Otherwise the fields that
/// are present overwrite those of the current search. The result is always a
/// fresh value: subscribers compare slices by identity to detect changes.
pub fn search(
    state: &State,
    query: Option<&str>,
    status: Option<PropStatus>,
    options: Option<SearchOptions>,
) -> SearchData {
    if query.is_none() && status.is_none() && options.is_none() {
        return SearchData::default();
    }

    let mut next = state
        .search
        .as_deref()
        .cloned()
        .unwrap_or_default();

    if let Some(query) = query {
        next.query = Some(query.to_string());
    }
    if let Some(status) = status {
        next.status = Some(status);
    }
    if let Some(options) = options {
        next.options = Some(options);
    }
    next
}
