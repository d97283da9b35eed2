//! Files app state management
//!
//! - Actions: what can happen
//! - State: what is true right now
//! - Reducers: pure functions `(State, Action) -> State`

pub mod actions;
pub mod reducers;
pub mod state;

pub use actions::{Action, ActionType};
pub use reducers::root_reducer;
pub use state::{
    CurrentDirectory, Entry, EntryCache, FileData, FileKey, PathComponent, PropStatus,
    SearchData, SearchFileType, SearchLocation, SearchOptions, SearchRecency, State,
};

use crate::store::{Store, StoreAction};

/// The store type used by the Files app
pub type FilesStore = Store<State, Action>;

impl StoreAction for Action {
    fn name(&self) -> &'static str {
        self.action_type().as_str()
    }
}

/// Create an initialized Files app store holding `state`
pub fn create_store(state: State) -> FilesStore {
    Store::with_state(root_reducer, state)
}

/// Create a Files app store that waits for [`Store::init`]
pub fn create_pending_store() -> FilesStore {
    Store::new(root_reducer)
}
