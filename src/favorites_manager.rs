//! Bounded most-played ranking with synchronous JSON persistence.
//!
//! Entries are kept in first-seen order; ranking sorts by play count with a
//! stable tie-break on that order. The persisted object preserves entry
//! order, which is what keeps tie-breaks durable across restarts.

use std::path::{Path, PathBuf};

use log::{error, warn};
use serde_json::{json, Value};

use crate::store_persistence::{load_store_document, save_store_document};

pub const DEFAULT_FAVORITES_MAX_SIZE: usize = 20;

struct FavoriteEntry {
    path: PathBuf,
    count: u32,
}

/// Owns the play-count store. After any mutating call returns, at most
/// `max_size` entries remain.
pub struct FavoritesManager {
    data_file: PathBuf,
    max_size: usize,
    entries: Vec<FavoriteEntry>,
}

impl FavoritesManager {
    /// Load-or-default: a missing or unreadable store yields an empty
    /// ranking.
    pub fn load(data_file: impl Into<PathBuf>, max_size: usize) -> Self {
        let data_file = data_file.into();
        let entries = load_store_document(&data_file)
            .map(|document| parse_favorites(&document))
            .unwrap_or_default();
        Self {
            data_file,
            max_size,
            entries,
        }
    }

    /// Counts one play for `path`, creating the entry at 1 when absent, then
    /// trims the ranking back to capacity. Adding a play can evict the
    /// lowest-ranked existing entry.
    pub fn record_play(&mut self, path: &Path) {
        match self.entries.iter_mut().find(|entry| entry.path == path) {
            Some(entry) => entry.count += 1,
            None => self.entries.push(FavoriteEntry {
                path: path.to_path_buf(),
                count: 1,
            }),
        }
        self.save();

        if self.trim_to_capacity() {
            self.save();
        }
    }

    /// Drops an entry outright. False when absent. Removal never triggers a
    /// trim.
    pub fn remove(&mut self, path: &Path) -> bool {
        let Some(position) = self.entries.iter().position(|entry| entry.path == path) else {
            return false;
        };
        self.entries.remove(position);
        self.save();
        true
    }

    /// Up to `max_size` entries, play count descending, ties in first-seen
    /// order.
    pub fn top_favorites(&self) -> Vec<(PathBuf, u32)> {
        let mut ranked: Vec<&FavoriteEntry> = self.entries.iter().collect();
        ranked.sort_by(|a, b| b.count.cmp(&a.count));
        ranked.truncate(self.max_size);
        ranked
            .into_iter()
            .map(|entry| (entry.path.clone(), entry.count))
            .collect()
    }

    /// 0 when the path has never been played (or was evicted).
    pub fn play_count(&self, path: &Path) -> u32 {
        self.entries
            .iter()
            .find(|entry| entry.path == path)
            .map(|entry| entry.count)
            .unwrap_or(0)
    }

    /// Retains only the top `max_size` entries by count (stable tie-break),
    /// preserving first-seen order among the survivors. Returns whether
    /// anything was evicted.
    fn trim_to_capacity(&mut self) -> bool {
        if self.entries.len() <= self.max_size {
            return false;
        }

        let mut order: Vec<usize> = (0..self.entries.len()).collect();
        order.sort_by(|&a, &b| self.entries[b].count.cmp(&self.entries[a].count));
        order.truncate(self.max_size);
        let keep: std::collections::HashSet<usize> = order.into_iter().collect();

        let mut index = 0;
        self.entries.retain(|_| {
            let retained = keep.contains(&index);
            index += 1;
            retained
        });
        true
    }

    fn save(&self) {
        let mut favorites = serde_json::Map::new();
        for entry in &self.entries {
            favorites.insert(
                entry.path.to_string_lossy().into_owned(),
                Value::from(entry.count),
            );
        }

        let document = json!({ "favorites": favorites });
        if let Err(err) = save_store_document(&self.data_file, &document) {
            error!(
                "Failed to write favorites store {}: {}",
                self.data_file.display(),
                err
            );
        }
    }
}

fn parse_favorites(document: &Value) -> Vec<FavoriteEntry> {
    let Some(favorites) = document.get("favorites").and_then(Value::as_object) else {
        return Vec::new();
    };

    let mut entries = Vec::new();
    for (path, count) in favorites {
        let Some(count) = count.as_u64().filter(|&count| count > 0) else {
            warn!("Dropping favorites entry {path:?} with invalid count");
            continue;
        };
        entries.push(FavoriteEntry {
            path: PathBuf::from(path),
            count: count.min(u64::from(u32::MAX)) as u32,
        });
    }
    entries
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::{Path, PathBuf};

    use super::{FavoritesManager, DEFAULT_FAVORITES_MAX_SIZE};

    fn store_path(dir: &tempfile::TempDir) -> PathBuf {
        dir.path().join("favorites.json")
    }

    fn record_plays(manager: &mut FavoritesManager, path: &str, times: u32) {
        for _ in 0..times {
            manager.record_play(Path::new(path));
        }
    }

    #[test]
    fn test_record_play_counts_from_one() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut manager = FavoritesManager::load(store_path(&dir), DEFAULT_FAVORITES_MAX_SIZE);

        manager.record_play(Path::new("/m/a.mp3"));
        assert_eq!(manager.play_count(Path::new("/m/a.mp3")), 1);

        manager.record_play(Path::new("/m/a.mp3"));
        assert_eq!(manager.play_count(Path::new("/m/a.mp3")), 2);
        assert_eq!(manager.play_count(Path::new("/m/never.mp3")), 0);
    }

    #[test]
    fn test_exceeding_capacity_evicts_lowest_ranked() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut manager = FavoritesManager::load(store_path(&dir), 2);

        record_plays(&mut manager, "/m/x.mp3", 3);
        record_plays(&mut manager, "/m/y.mp3", 1);
        record_plays(&mut manager, "/m/z.mp3", 2);

        assert_eq!(
            manager.top_favorites(),
            vec![
                (PathBuf::from("/m/x.mp3"), 3),
                (PathBuf::from("/m/z.mp3"), 2),
            ]
        );
        assert_eq!(manager.play_count(Path::new("/m/y.mp3")), 0);
    }

    #[test]
    fn test_ties_rank_in_first_seen_order() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut manager = FavoritesManager::load(store_path(&dir), DEFAULT_FAVORITES_MAX_SIZE);

        record_plays(&mut manager, "/m/first.mp3", 2);
        record_plays(&mut manager, "/m/second.mp3", 2);
        record_plays(&mut manager, "/m/third.mp3", 5);

        assert_eq!(
            manager.top_favorites(),
            vec![
                (PathBuf::from("/m/third.mp3"), 5),
                (PathBuf::from("/m/first.mp3"), 2),
                (PathBuf::from("/m/second.mp3"), 2),
            ]
        );
    }

    #[test]
    fn test_remove_deletes_without_trimming() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut manager = FavoritesManager::load(store_path(&dir), 2);

        record_plays(&mut manager, "/m/a.mp3", 2);
        record_plays(&mut manager, "/m/b.mp3", 1);

        assert!(manager.remove(Path::new("/m/a.mp3")));
        assert!(!manager.remove(Path::new("/m/a.mp3")));
        assert_eq!(manager.play_count(Path::new("/m/b.mp3")), 1);
    }

    #[test]
    fn test_ranking_survives_reload_including_tie_order() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = store_path(&dir);
        {
            let mut manager = FavoritesManager::load(&path, DEFAULT_FAVORITES_MAX_SIZE);
            record_plays(&mut manager, "/m/early.mp3", 4);
            record_plays(&mut manager, "/m/late.mp3", 4);
        }

        let reloaded = FavoritesManager::load(&path, DEFAULT_FAVORITES_MAX_SIZE);
        assert_eq!(
            reloaded.top_favorites(),
            vec![
                (PathBuf::from("/m/early.mp3"), 4),
                (PathBuf::from("/m/late.mp3"), 4),
            ]
        );
    }

    #[test]
    fn test_store_document_shape_matches_wire_format() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = store_path(&dir);
        let mut manager = FavoritesManager::load(&path, DEFAULT_FAVORITES_MAX_SIZE);
        record_plays(&mut manager, "/m/a.mp3", 2);

        let content = fs::read_to_string(&path).expect("store file");
        let document: serde_json::Value = serde_json::from_str(&content).expect("json");
        assert_eq!(document["favorites"]["/m/a.mp3"], 2);
    }

    #[test]
    fn test_malformed_store_loads_as_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = store_path(&dir);
        fs::write(&path, b"[]").expect("fixture");

        let manager = FavoritesManager::load(&path, DEFAULT_FAVORITES_MAX_SIZE);
        assert!(manager.top_favorites().is_empty());
    }

    #[test]
    fn test_invalid_counts_are_dropped_on_load() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = store_path(&dir);
        fs::write(
            &path,
            br#"{"favorites": {"/m/ok.mp3": 3, "/m/zero.mp3": 0, "/m/bad.mp3": "many"}}"#,
        )
        .expect("fixture");

        let manager = FavoritesManager::load(&path, DEFAULT_FAVORITES_MAX_SIZE);
        assert_eq!(
            manager.top_favorites(),
            vec![(PathBuf::from("/m/ok.mp3"), 3)]
        );
    }
}
