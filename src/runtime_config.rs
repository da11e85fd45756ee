//! Load-or-default application configuration persisted as TOML.

use std::fs;
use std::path::{Path, PathBuf};

use log::warn;

use crate::favorites_manager::DEFAULT_FAVORITES_MAX_SIZE;

/// Application configuration persisted to `tunedeck.toml`.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Config {
    /// Root directory scanned for audio files.
    #[serde(default = "default_music_directory")]
    pub music_directory: PathBuf,
    #[serde(default = "default_playlists_file")]
    pub playlists_file: PathBuf,
    #[serde(default = "default_favorites_file")]
    pub favorites_file: PathBuf,
    /// Capacity of the most-played ranking.
    #[serde(default = "default_favorites_max_size")]
    pub favorites_max_size: usize,
    /// When set, uppercase audio extensions such as `.MP3` are scanned too.
    #[serde(default)]
    pub fold_extension_case: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            music_directory: default_music_directory(),
            playlists_file: default_playlists_file(),
            favorites_file: default_favorites_file(),
            favorites_max_size: default_favorites_max_size(),
            fold_extension_case: false,
        }
    }
}

fn default_music_directory() -> PathBuf {
    dirs::audio_dir().unwrap_or_else(|| PathBuf::from("Music"))
}

fn data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tunedeck")
}

fn default_playlists_file() -> PathBuf {
    data_dir().join("playlists.json")
}

fn default_favorites_file() -> PathBuf {
    data_dir().join("favorites.json")
}

fn default_favorites_max_size() -> usize {
    DEFAULT_FAVORITES_MAX_SIZE
}

/// Default location of the config file.
pub fn config_file_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tunedeck.toml")
}

impl Config {
    /// Reads the config file; a missing or unparseable file yields defaults.
    pub fn load_or_default(path: &Path) -> Self {
        let Ok(content) = fs::read_to_string(path) else {
            return Self::default();
        };
        match toml::from_str(&content) {
            Ok(config) => config,
            Err(err) => {
                warn!("Unparseable config {}: {}", path.display(), err);
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let content = toml::to_string(self).map_err(std::io::Error::other)?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use super::Config;

    #[test]
    fn test_missing_config_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = Config::load_or_default(&dir.path().join("absent.toml"));
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_unparseable_config_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("broken.toml");
        fs::write(&path, b"music_directory = [not toml").expect("fixture");

        assert_eq!(Config::load_or_default(&path), Config::default());
    }

    #[test]
    fn test_partial_config_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("partial.toml");
        fs::write(&path, b"fold_extension_case = true\n").expect("fixture");

        let config = Config::load_or_default(&path);
        assert!(config.fold_extension_case);
        assert_eq!(config.favorites_max_size, Config::default().favorites_max_size);
    }

    #[test]
    fn test_save_and_reload_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");

        let config = Config {
            music_directory: PathBuf::from("/srv/music"),
            favorites_max_size: 5,
            fold_extension_case: true,
            ..Config::default()
        };
        config.save(&path).expect("save");

        assert_eq!(Config::load_or_default(&path), config);
    }
}
