//! Actions for the Files app store
//!
//! All state transitions are triggered by actions. Actions are immutable,
//! serializable descriptions of what should happen; the root reducer (see
//! `reducers/mod.rs`) decides how the state changes.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::state::{Entry, FileKey, PropStatus, SearchOptions};

/// Actions that trigger state transitions
///
/// Serialized with an explicit `type` discriminant so recorded action logs
/// can be replayed. Discriminants this build does not know deserialize to
/// [`Action::Unknown`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Action {
    /// Change the directory displayed in the main panel
    #[serde(rename_all = "camelCase")]
    ChangeDirectory {
        /// Entry of the target directory, when the caller has it at hand.
        /// Cached before the directory slice is computed.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        new_directory: Option<Entry>,
        key: FileKey,
        status: PropStatus,
    },

    /// Drop cached entries nothing in the state refers to anymore
    ClearStaleCachedEntries,

    /// Update the search box state. All fields absent clears the search.
    Search {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        query: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        status: Option<PropStatus>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        options: Option<SearchOptions>,
    },

    /// An action type from a newer or foreign producer
    #[serde(other)]
    Unknown,
}

/// Discriminant of an [`Action`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionType {
    ChangeDirectory,
    ClearStaleCachedEntries,
    Search,
    Unknown,
}

impl ActionType {
    pub fn as_str(self) -> &'static str {
        match self {
            ActionType::ChangeDirectory => "change-directory",
            ActionType::ClearStaleCachedEntries => "clear-stale-cached-entries",
            ActionType::Search => "search",
            ActionType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Action {
    pub fn action_type(&self) -> ActionType {
        match self {
            Action::ChangeDirectory { .. } => ActionType::ChangeDirectory,
            Action::ClearStaleCachedEntries => ActionType::ClearStaleCachedEntries,
            Action::Search { .. } => ActionType::Search,
            Action::Unknown => ActionType::Unknown,
        }
    }

    /// Change to the directory `entry`, caching it on the way
    pub fn change_directory(entry: Entry, status: PropStatus) -> Self {
        Action::ChangeDirectory {
            key: entry.to_url(),
            new_directory: Some(entry),
            status,
        }
    }

    /// Start a search for `query`
    pub fn search(query: impl Into<String>) -> Self {
        Action::Search {
            query: Some(query.into()),
            status: Some(PropStatus::Started),
            options: None,
        }
    }

    /// Clear the search box
    pub fn clear_search() -> Self {
        Action::Search {
            query: None,
            status: None,
            options: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_directory_wire_format() {
        let entry = Entry::directory("filesystem:root", "My files", "/docs");
        let action = Action::change_directory(entry, PropStatus::Success);

        let json = serde_json::to_value(&action).unwrap();
        assert_eq!(json["type"], "change-directory");
        assert_eq!(json["key"], "filesystem:root/docs");
        assert_eq!(json["status"], "SUCCESS");
        assert_eq!(json["newDirectory"]["fullPath"], "/docs");
    }

    #[test]
    fn test_parse_recorded_actions() {
        let action: Action =
            serde_json::from_str(r#"{"type":"search","query":"report","status":"STARTED"}"#)
                .unwrap();
        assert_eq!(
            action,
            Action::Search {
                query: Some("report".to_string()),
                status: Some(PropStatus::Started),
                options: None,
            }
        );

        let action: Action =
            serde_json::from_str(r#"{"type":"clear-stale-cached-entries"}"#).unwrap();
        assert_eq!(action, Action::ClearStaleCachedEntries);
    }

    #[test]
    fn test_unrecognized_type_parses_as_unknown() {
        let action: Action = serde_json::from_str(r#"{"type":"open-volume"}"#).unwrap();
        assert_eq!(action, Action::Unknown);
        assert_eq!(action.action_type(), ActionType::Unknown);
    }

    #[test]
    fn test_action_type_names_match_wire_tags() {
        let actions = [
            Action::change_directory(Entry::directory("r", "R", "/"), PropStatus::Started),
            Action::ClearStaleCachedEntries,
            Action::search("x"),
        ];
        for action in actions {
            let json = serde_json::to_value(&action).unwrap();
            assert_eq!(json["type"], action.action_type().as_str());
        }
    }
}
