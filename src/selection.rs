use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Persisted projection of a followed channel. The document on disk is an
/// array of these, sorted by `channel_id` ascending.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectedChannel {
    #[serde(default)]
    pub channel_id: String,
    #[serde(default)]
    pub channel_name: String,
}

/// Reads and rewrites the selection document. Both operations are total: I/O
/// and parse errors are logged and degrade to an empty selection or a failed
/// save, never to a panic or a half-written state visible to the caller.
pub struct SelectionStore {
    path: PathBuf,
}

impl SelectionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Ids of the followed channels. A missing document is an empty
    /// selection, not an error.
    pub fn load(&self) -> HashSet<String> {
        if !self.path.exists() {
            return HashSet::new();
        }
        self.read_entries()
            .into_iter()
            .map(|ch| ch.channel_id)
            .collect()
    }

    /// Validated entries for flows that display the roster. Unlike `load`,
    /// a missing document is reported here.
    pub fn entries(&self) -> Vec<SelectedChannel> {
        if !self.path.exists() {
            println!("Error: {} not found.", self.path.display());
            return Vec::new();
        }
        self.read_entries()
    }

    fn read_entries(&self) -> Vec<SelectedChannel> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(err) => {
                println!("Error reading {}: {err}", self.path.display());
                return Vec::new();
            }
        };
        let raw: Vec<SelectedChannel> = match serde_json::from_str(&data) {
            Ok(raw) => raw,
            Err(err) => {
                println!("Error parsing {}: {err}", self.path.display());
                return Vec::new();
            }
        };
        validate_entries(raw)
    }

    /// Project `selected` through the current name lookup, drop ids the
    /// catalog no longer knows, and rewrite the document sorted by id.
    pub fn save(&self, selected: &HashSet<String>, names: &HashMap<String, String>) {
        let mut ids: Vec<&String> = selected
            .iter()
            .filter(|id| names.contains_key(id.as_str()))
            .collect();
        ids.sort();
        let entries: Vec<SelectedChannel> = ids
            .into_iter()
            .map(|id| SelectedChannel {
                channel_id: id.clone(),
                channel_name: names[id].clone(),
            })
            .collect();
        let data = match serde_json::to_string_pretty(&entries) {
            Ok(data) => data,
            Err(err) => {
                println!("Error serializing selection: {err}");
                return;
            }
        };
        match fs::write(&self.path, data) {
            Ok(()) => println!(
                "Saved {} channels to {}",
                entries.len(),
                self.path.display()
            ),
            Err(err) => println!("Error writing {}: {err}", self.path.display()),
        }
    }
}

/// Drop entries missing a required field and later duplicates of an id,
/// keeping the first occurrence. Each drop is logged with the offending
/// record.
fn validate_entries(raw: Vec<SelectedChannel>) -> Vec<SelectedChannel> {
    let mut seen = HashSet::new();
    let mut valid = Vec::new();
    for entry in raw {
        if entry.channel_id.is_empty() || entry.channel_name.is_empty() {
            println!(
                "Warning: skipping invalid channel entry: {:?} ({:?})",
                entry.channel_id, entry.channel_name
            );
            continue;
        }
        if !seen.insert(entry.channel_id.clone()) {
            println!(
                "Warning: duplicate channel id {}: {}",
                entry.channel_id, entry.channel_name
            );
            continue;
        }
        valid.push(entry);
    }
    valid
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, name: &str) -> SelectedChannel {
        SelectedChannel {
            channel_id: id.into(),
            channel_name: name.into(),
        }
    }

    fn names(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(id, name)| (id.to_string(), name.to_string()))
            .collect()
    }

    #[test]
    fn save_and_reload_round_trips_sorted_by_id() {
        let dir = tempfile::tempdir().unwrap();
        let store = SelectionStore::new(dir.path().join("selected_channels.json"));
        let selected: HashSet<String> = ["B".to_string(), "A".to_string()].into();
        store.save(&selected, &names(&[("A", "Apple"), ("B", "Banana")]));

        let data = fs::read_to_string(store.path()).unwrap();
        let persisted: Vec<SelectedChannel> = serde_json::from_str(&data).unwrap();
        let order: Vec<&str> = persisted
            .iter()
            .map(|ch| ch.channel_id.as_str())
            .collect();
        assert_eq!(order, vec!["A", "B"]);

        assert_eq!(store.load(), selected);
    }

    #[test]
    fn save_drops_ids_unknown_to_the_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let store = SelectionStore::new(dir.path().join("selected_channels.json"));
        let selected: HashSet<String> = ["A".to_string(), "gone".to_string()].into();
        store.save(&selected, &names(&[("A", "Apple")]));

        let expected: HashSet<String> = ["A".to_string()].into();
        assert_eq!(store.load(), expected);
    }

    #[test]
    fn missing_document_loads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = SelectionStore::new(dir.path().join("nope.json"));
        assert!(store.load().is_empty());
        assert!(store.entries().is_empty());
    }

    #[test]
    fn corrupt_document_loads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("selected_channels.json");
        fs::write(&path, "not json").unwrap();
        assert!(SelectionStore::new(path).load().is_empty());
    }

    #[test]
    fn validation_drops_incomplete_and_duplicate_entries() {
        let valid = validate_entries(vec![
            entry("A", "Apple"),
            entry("", "Nameless"),
            entry("B", ""),
            entry("A", "Apple again"),
            entry("C", "Cherry"),
        ]);
        let ids: Vec<&str> = valid.iter().map(|ch| ch.channel_id.as_str()).collect();
        assert_eq!(ids, vec!["A", "C"]);
        assert_eq!(valid[0].channel_name, "Apple");
    }
}
