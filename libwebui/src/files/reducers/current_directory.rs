//! Reducer for the `current_directory` slice

use crate::files::state::{CurrentDirectory, FileKey, PropStatus, State};

/// Compute the current directory after a directory change
///
/// Path components come from the cached entry. If the entry is not cached
/// yet the components are left empty; a later change to the same key that
/// carries the entry fills them in. A `Started` change to the directory
/// already displayed keeps its breadcrumbs while the listing reloads.
pub fn change_directory(state: &State, key: &FileKey, status: PropStatus) -> CurrentDirectory {
    let path_components = match state.entry(key) {
        Some(data) => data.entry.path_components(),
        None => match &state.current_directory {
            Some(current) if current.key == *key && status == PropStatus::Started => {
                current.path_components.clone()
            }
            _ => Vec::new(),
        },
    };

    CurrentDirectory {
        key: key.clone(),
        status,
        path_components,
    }
}
