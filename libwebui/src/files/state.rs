//! Files app state
//!
//! Immutable snapshot consumed by the UI. Each top-level field is a slice
//! owned by one reducer. Slices sit behind `Arc`, so producing a new `State`
//! copies three pointers and every slice a transition did not touch is shared
//! with the previous snapshot.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Unique key of a file system entry: its URL
pub type FileKey = String;

/// Cache of every entry referenced anywhere in the state, by key
pub type EntryCache = BTreeMap<FileKey, FileData>;

/// Root state of the Files app
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct State {
    /// Populated before any slice reducer runs
    pub all_entries: Arc<EntryCache>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_directory: Option<Arc<CurrentDirectory>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<Arc<SearchData>>,
}

impl State {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached data for `key`
    pub fn entry(&self, key: &str) -> Option<&FileData> {
        self.all_entries.get(key)
    }
}

/// Progress of an asynchronous property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PropStatus {
    Started,
    Success,
    Error,
}

/// A file or directory inside a volume
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    /// URL of the volume root, without a trailing slash
    pub root_url: String,
    /// Display name of the volume root, e.g. "Downloads"
    pub root_label: String,
    /// Absolute path inside the volume, `/` for the root itself
    pub full_path: String,
    pub is_directory: bool,
}

impl Entry {
    pub fn directory(root_url: &str, root_label: &str, full_path: &str) -> Self {
        Self {
            root_url: root_url.trim_end_matches('/').to_string(),
            root_label: root_label.to_string(),
            full_path: normalize_path(full_path),
            is_directory: true,
        }
    }

    pub fn file(root_url: &str, root_label: &str, full_path: &str) -> Self {
        Self {
            is_directory: false,
            ..Self::directory(root_url, root_label, full_path)
        }
    }

    /// The key this entry is cached under
    pub fn to_url(&self) -> FileKey {
        format!("{}{}", self.root_url, self.full_path)
    }

    /// Last path segment, or the volume label for the root
    pub fn name(&self) -> &str {
        match self.full_path.rsplit('/').next() {
            Some(name) if !name.is_empty() => name,
            _ => &self.root_label,
        }
    }

    /// Ancestors from the volume root down to this entry, inclusive
    pub fn path_components(&self) -> Vec<PathComponent> {
        let mut components = vec![PathComponent {
            name: self.root_label.clone(),
            label: self.root_label.clone(),
            key: format!("{}/", self.root_url),
        }];

        let mut path = String::new();
        for segment in self.full_path.split('/').filter(|s| !s.is_empty()) {
            path.push('/');
            path.push_str(segment);
            components.push(PathComponent {
                name: segment.to_string(),
                label: segment.to_string(),
                key: format!("{}{}", self.root_url, path),
            });
        }
        components
    }
}

fn normalize_path(path: &str) -> String {
    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", trimmed)
    }
}

/// Cached metadata of one entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileData {
    pub key: FileKey,
    pub entry: Entry,
    /// Name shown in the UI
    pub label: String,
}

impl From<&Entry> for FileData {
    fn from(entry: &Entry) -> Self {
        Self {
            key: entry.to_url(),
            label: entry.name().to_string(),
            entry: entry.clone(),
        }
    }
}

/// One breadcrumb of the current directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathComponent {
    pub name: String,
    pub label: String,
    pub key: FileKey,
}

/// The directory currently displayed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentDirectory {
    pub key: FileKey,
    pub status: PropStatus,
    /// Empty until the directory's entry is in the cache
    pub path_components: Vec<PathComponent>,
}

/// Search box state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchData {
    pub query: Option<String>,
    pub status: Option<PropStatus>,
    pub options: Option<SearchOptions>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchOptions {
    pub location: SearchLocation,
    pub recency: SearchRecency,
    pub file_type: SearchFileType,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchLocation {
    Everywhere,
    #[default]
    ThisVolume,
    ThisFolder,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchRecency {
    #[default]
    Anytime,
    Today,
    Yesterday,
    LastWeek,
    LastMonth,
    LastYear,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchFileType {
    #[default]
    AllTypes,
    Audio,
    Image,
    Video,
    Documents,
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOWNLOADS: &str = "filesystem:chrome://file-manager/external/Downloads-user";

    #[test]
    fn test_entry_url_and_name() {
        let entry = Entry::directory(DOWNLOADS, "Downloads", "/photos/2022");
        assert_eq!(entry.to_url(), format!("{}/photos/2022", DOWNLOADS));
        assert_eq!(entry.name(), "2022");
    }

    #[test]
    fn test_root_entry_uses_label() {
        let root = Entry::directory(&format!("{}/", DOWNLOADS), "Downloads", "");
        assert_eq!(root.full_path, "/");
        assert_eq!(root.to_url(), format!("{}/", DOWNLOADS));
        assert_eq!(root.name(), "Downloads");
    }

    #[test]
    fn test_path_components_from_root() {
        let entry = Entry::directory(DOWNLOADS, "Downloads", "photos/2022/");
        let components = entry.path_components();

        let names: Vec<_> = components.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Downloads", "photos", "2022"]);
        assert_eq!(components[0].key, format!("{}/", DOWNLOADS));
        assert_eq!(components[2].key, entry.to_url());
    }

    #[test]
    fn test_file_data_from_entry() {
        let entry = Entry::file(DOWNLOADS, "Downloads", "/notes.txt");
        let data = FileData::from(&entry);
        assert_eq!(data.key, entry.to_url());
        assert_eq!(data.label, "notes.txt");
        assert!(!data.entry.is_directory);
    }

    #[test]
    fn test_state_json_uses_camel_case() {
        let state = State {
            search: Some(Arc::new(SearchData {
                query: Some("cat".to_string()),
                status: Some(PropStatus::Started),
                options: None,
            })),
            ..State::default()
        };

        let json = serde_json::to_value(&state).unwrap();
        assert!(json.get("allEntries").is_some());
        assert!(json.get("currentDirectory").is_none());
        assert_eq!(json["search"]["status"], "STARTED");
    }
}
