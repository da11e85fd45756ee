//! Core domain logic for a personal music-library manager and playback
//! controller.
//!
//! A desktop UI layer drives this crate: [`library_manager`] scans a
//! directory tree into the song registry and derived album index,
//! [`playlist_manager`] and [`favorites_manager`] own the two persisted
//! stores, and [`audio_player`] runs the playback transport over the
//! [`audio_engine`] seam.

pub mod audio_engine;
pub mod audio_player;
pub mod favorites_manager;
pub mod library_manager;
pub mod media_file_discovery;
pub mod metadata_tags;
pub mod playlist_manager;
pub mod runtime_config;
mod store_persistence;

#[cfg(test)]
pub(crate) mod test_support;

pub use audio_engine::{AudioEngine, EngineError, RodioEngine};
pub use audio_player::{AudioPlayer, PlaybackError};
pub use favorites_manager::FavoritesManager;
pub use library_manager::{sort_songs, LibraryManager, Song, SortKey};
pub use playlist_manager::PlaylistManager;
pub use runtime_config::Config;
