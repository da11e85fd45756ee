//! Library scanning, the song registry, and the derived album index.
//!
//! The registry is an arena of songs in scan order keyed by file path. The
//! artist → album → song-list index is a pure function of the registry and is
//! rebuilt in full on every registry mutation rather than patched in place.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::media_file_discovery;
use crate::metadata_tags;

pub const UNKNOWN_ARTIST: &str = "Unknown Artist";
pub const UNKNOWN_ALBUM: &str = "Unknown Album";

/// One indexed audio file, keyed by its path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Song {
    pub path: PathBuf,
    pub title: String,
    pub artist: String,
    pub album: String,
    /// Year granularity; `None` when the file carries no parseable date.
    pub release_year: Option<i32>,
}

/// Sort key for [`sort_songs`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    /// Case-insensitive title comparison.
    Name,
    /// Release year, with missing years sorting as the minimum value.
    Date,
}

/// Sorts songs by `key`. Stable in both directions: descending order reverses
/// the comparator, not the output, so equal songs keep their input order.
pub fn sort_songs(mut songs: Vec<Song>, key: SortKey, ascending: bool) -> Vec<Song> {
    match key {
        SortKey::Name => songs.sort_by(|a, b| {
            let ordering = a.title.to_lowercase().cmp(&b.title.to_lowercase());
            if ascending {
                ordering
            } else {
                ordering.reverse()
            }
        }),
        SortKey::Date => songs.sort_by(|a, b| {
            let ordering = a.release_year.cmp(&b.release_year);
            if ascending {
                ordering
            } else {
                ordering.reverse()
            }
        }),
    }
    songs
}

/// Owns the song registry and the derived album index.
pub struct LibraryManager {
    music_directory: PathBuf,
    fold_extension_case: bool,
    songs: Vec<Song>,
    song_positions: HashMap<PathBuf, usize>,
    albums: HashMap<String, HashMap<String, Vec<PathBuf>>>,
}

impl LibraryManager {
    pub fn new(music_directory: impl Into<PathBuf>, fold_extension_case: bool) -> Self {
        Self {
            music_directory: music_directory.into(),
            fold_extension_case,
            songs: Vec::new(),
            song_positions: HashMap::new(),
            albums: HashMap::new(),
        }
    }

    /// Walks the music directory and replaces the whole registry with what it
    /// finds. Files whose tags cannot be read are skipped, not fatal. Returns
    /// the songs found; callers must not rely on their order.
    pub fn scan_library(&mut self) -> Vec<Song> {
        let files = media_file_discovery::collect_audio_files(
            &self.music_directory,
            self.fold_extension_case,
        );

        self.songs.clear();
        self.song_positions.clear();

        for path in files {
            let tags = match metadata_tags::read_track_tags(&path) {
                Ok(tags) => tags,
                Err(err) => {
                    warn!("Skipping {}: {}", path.display(), err);
                    continue;
                }
            };

            let song = Song {
                title: tags
                    .title
                    .unwrap_or_else(|| metadata_tags::base_name(&path)),
                artist: tags.artist.unwrap_or_else(|| UNKNOWN_ARTIST.to_string()),
                album: tags.album.unwrap_or_else(|| UNKNOWN_ALBUM.to_string()),
                release_year: tags.release_year,
                path: path.clone(),
            };
            self.song_positions.insert(path, self.songs.len());
            self.songs.push(song);
        }

        self.rebuild_albums();
        info!(
            "Library scan found {} song(s) under {}",
            self.songs.len(),
            self.music_directory.display()
        );
        self.songs.clone()
    }

    /// Deletes a song from disk and, only once the filesystem delete is
    /// confirmed, drops it from the registry. Returns false when the path is
    /// not in the registry or the delete fails; the registry is untouched in
    /// both cases.
    pub fn delete_song(&mut self, path: &Path) -> bool {
        let Some(position) = self.song_positions.get(path).copied() else {
            return false;
        };

        if let Err(err) = fs::remove_file(path) {
            warn!("Failed to delete {}: {}", path.display(), err);
            return false;
        }

        self.songs.remove(position);
        self.song_positions = self
            .songs
            .iter()
            .enumerate()
            .map(|(index, song)| (song.path.clone(), index))
            .collect();
        self.rebuild_albums();
        true
    }

    /// All registry songs in scan order.
    pub fn all_songs(&self) -> &[Song] {
        &self.songs
    }

    pub fn song(&self, path: &Path) -> Option<&Song> {
        self.song_positions
            .get(path)
            .and_then(|&position| self.songs.get(position))
    }

    /// Known artist names, sorted for stable rendering.
    pub fn artists(&self) -> Vec<String> {
        let mut artists: Vec<String> = self.albums.keys().cloned().collect();
        artists.sort_unstable();
        artists
    }

    /// Album → ordered song paths for one artist; empty when unknown.
    pub fn albums_by_artist(&self, artist: &str) -> HashMap<String, Vec<PathBuf>> {
        self.albums.get(artist).cloned().unwrap_or_default()
    }

    /// Recomputes the album index from the registry. Songs within an album
    /// are ordered ascending by release year, undated songs first, ties in
    /// scan order.
    fn rebuild_albums(&mut self) {
        let mut albums: HashMap<String, HashMap<String, Vec<PathBuf>>> = HashMap::new();
        for song in &self.songs {
            albums
                .entry(song.artist.clone())
                .or_default()
                .entry(song.album.clone())
                .or_default()
                .push(song.path.clone());
        }

        for artist_albums in albums.values_mut() {
            for album_songs in artist_albums.values_mut() {
                album_songs.sort_by_key(|path| {
                    self.song_positions
                        .get(path)
                        .and_then(|&position| self.songs.get(position))
                        .and_then(|song| song.release_year)
                });
            }
        }

        self.albums = albums;
    }
}
