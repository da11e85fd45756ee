//! Named, ordered, duplicate-free playlists with synchronous JSON
//! persistence.
//!
//! Playlists hold song paths only; they survive library rescans and may hold
//! dangling paths after a song is deleted from disk.

use std::path::{Path, PathBuf};

use log::{error, warn};
use rand::seq::SliceRandom;
use serde_json::{json, Value};

use crate::store_persistence::{load_store_document, save_store_document};

struct Playlist {
    name: String,
    songs: Vec<PathBuf>,
}

/// Owns the playlist store. Every mutating call rewrites the backing file in
/// full; the in-memory state is authoritative between calls.
pub struct PlaylistManager {
    data_file: PathBuf,
    playlists: Vec<Playlist>,
}

impl PlaylistManager {
    /// Load-or-default: a missing or unreadable store yields no playlists.
    pub fn load(data_file: impl Into<PathBuf>) -> Self {
        let data_file = data_file.into();
        let playlists = load_store_document(&data_file)
            .map(|document| parse_playlists(&document))
            .unwrap_or_default();
        Self {
            data_file,
            playlists,
        }
    }

    /// Creates an empty playlist. False when the name is already taken.
    pub fn create_playlist(&mut self, name: &str) -> bool {
        if self.find(name).is_some() {
            return false;
        }
        self.playlists.push(Playlist {
            name: name.to_string(),
            songs: Vec::new(),
        });
        self.save();
        true
    }

    /// Playlist names in creation order.
    pub fn playlist_names(&self) -> Vec<String> {
        self.playlists
            .iter()
            .map(|playlist| playlist.name.clone())
            .collect()
    }

    /// Songs of one playlist in order; empty when the name is unknown.
    pub fn playlist_songs(&self, name: &str) -> Vec<PathBuf> {
        self.find(name)
            .map(|playlist| playlist.songs.clone())
            .unwrap_or_default()
    }

    /// Appends a song. False when the playlist is unknown or already holds
    /// the path.
    pub fn add_song(&mut self, name: &str, path: &Path) -> bool {
        let Some(playlist) = self.find_mut(name) else {
            return false;
        };
        if playlist.songs.iter().any(|existing| existing == path) {
            return false;
        }
        playlist.songs.push(path.to_path_buf());
        self.save();
        true
    }

    /// Removes a song. False when the playlist or the path is not present.
    pub fn remove_song(&mut self, name: &str, path: &Path) -> bool {
        let Some(playlist) = self.find_mut(name) else {
            return false;
        };
        let Some(position) = playlist.songs.iter().position(|existing| existing == path) else {
            return false;
        };
        playlist.songs.remove(position);
        self.save();
        true
    }

    /// Removes a whole playlist. False when the name is unknown.
    pub fn delete_playlist(&mut self, name: &str) -> bool {
        let Some(position) = self
            .playlists
            .iter()
            .position(|playlist| playlist.name == name)
        else {
            return false;
        };
        self.playlists.remove(position);
        self.save();
        true
    }

    /// Shuffles a playlist in place with a fresh unseeded permutation. False
    /// when the name is unknown.
    pub fn shuffle_playlist(&mut self, name: &str) -> bool {
        let Some(playlist) = self.find_mut(name) else {
            return false;
        };
        playlist.songs.shuffle(&mut rand::rng());
        self.save();
        true
    }

    fn find(&self, name: &str) -> Option<&Playlist> {
        self.playlists.iter().find(|playlist| playlist.name == name)
    }

    fn find_mut(&mut self, name: &str) -> Option<&mut Playlist> {
        self.playlists
            .iter_mut()
            .find(|playlist| playlist.name == name)
    }

    fn save(&self) {
        let mut playlists = serde_json::Map::new();
        for playlist in &self.playlists {
            let songs: Vec<Value> = playlist
                .songs
                .iter()
                .map(|path| Value::String(path.to_string_lossy().into_owned()))
                .collect();
            playlists.insert(playlist.name.clone(), Value::Array(songs));
        }

        let document = json!({ "playlists": playlists });
        if let Err(err) = save_store_document(&self.data_file, &document) {
            error!(
                "Failed to write playlist store {}: {}",
                self.data_file.display(),
                err
            );
        }
    }
}

fn parse_playlists(document: &Value) -> Vec<Playlist> {
    let Some(playlists) = document.get("playlists").and_then(Value::as_object) else {
        return Vec::new();
    };

    playlists
        .iter()
        .map(|(name, songs)| {
            let mut parsed: Vec<PathBuf> = Vec::new();
            for song in songs.as_array().map(Vec::as_slice).unwrap_or_default() {
                let Some(path) = song.as_str() else {
                    warn!("Dropping non-string entry in playlist {name:?}");
                    continue;
                };
                let path = PathBuf::from(path);
                if parsed.contains(&path) {
                    warn!("Dropping duplicate entry in playlist {name:?}");
                    continue;
                }
                parsed.push(path);
            }
            Playlist {
                name: name.clone(),
                songs: parsed,
            }
        })
        .collect()
}
