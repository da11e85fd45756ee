//! Recursive discovery of audio files under the configured music directory.

use std::path::{Path, PathBuf};

use log::debug;

/// File extensions the library scan recognizes as audio.
pub const SUPPORTED_AUDIO_EXTENSIONS: [&str; 4] = ["mp3", "flac", "wav", "ogg"];

/// Returns `true` when `path` carries a supported audio extension.
///
/// With `fold_extension_case` set, uppercase spellings such as `.MP3` match
/// too; otherwise only the lowercase extension is accepted.
pub fn is_supported_audio_file(path: &Path, fold_extension_case: bool) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            SUPPORTED_AUDIO_EXTENSIONS.iter().any(|supported| {
                if fold_extension_case {
                    ext.eq_ignore_ascii_case(supported)
                } else {
                    ext == *supported
                }
            })
        })
        .unwrap_or(false)
}

/// Walks `root` and returns every supported audio file below it.
///
/// Unreadable directories and entries are skipped. The result is sorted by
/// path for stable output, but callers must not treat registry order as part
/// of any contract.
pub fn collect_audio_files(root: &Path, fold_extension_case: bool) -> Vec<PathBuf> {
    let mut pending_directories = vec![root.to_path_buf()];
    let mut tracks = Vec::new();

    while let Some(directory) = pending_directories.pop() {
        let entries = match std::fs::read_dir(&directory) {
            Ok(entries) => entries,
            Err(err) => {
                debug!("Failed to read directory {}: {}", directory.display(), err);
                continue;
            }
        };

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    debug!(
                        "Failed to read a directory entry in {}: {}",
                        directory.display(),
                        err
                    );
                    continue;
                }
            };

            let path = entry.path();
            let file_type = match entry.file_type() {
                Ok(file_type) => file_type,
                Err(err) => {
                    debug!("Failed to inspect {}: {}", path.display(), err);
                    continue;
                }
            };

            if file_type.is_dir() {
                pending_directories.push(path);
                continue;
            }

            if file_type.is_file() && is_supported_audio_file(&path, fold_extension_case) {
                tracks.push(path);
            }
        }
    }

    tracks.sort_unstable();
    tracks
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use super::{collect_audio_files, is_supported_audio_file};

    fn touch(path: &Path) {
        fs::write(path, b"x").expect("fixture file should be writable");
    }

    #[test]
    fn test_is_supported_audio_file_accepts_lowercase_extensions() {
        assert!(is_supported_audio_file(Path::new("a.mp3"), false));
        assert!(is_supported_audio_file(Path::new("b.flac"), false));
        assert!(is_supported_audio_file(Path::new("c.wav"), false));
        assert!(is_supported_audio_file(Path::new("d.ogg"), false));
    }

    #[test]
    fn test_is_supported_audio_file_rejects_other_files() {
        assert!(!is_supported_audio_file(Path::new("notes.txt"), false));
        assert!(!is_supported_audio_file(Path::new("cover.jpg"), true));
        assert!(!is_supported_audio_file(Path::new("extensionless"), true));
    }

    #[test]
    fn test_is_supported_audio_file_folds_case_only_when_asked() {
        assert!(!is_supported_audio_file(Path::new("a.MP3"), false));
        assert!(is_supported_audio_file(Path::new("a.MP3"), true));
        assert!(is_supported_audio_file(Path::new("b.Flac"), true));
    }

    #[test]
    fn test_collect_audio_files_recurses_and_filters() {
        let root = tempfile::tempdir().expect("tempdir");
        let nested = root.path().join("album");
        fs::create_dir(&nested).expect("nested dir");

        touch(&root.path().join("one.mp3"));
        touch(&root.path().join("skipped.txt"));
        touch(&nested.join("two.ogg"));

        let found = collect_audio_files(root.path(), false);
        assert_eq!(found.len(), 2);
        assert!(found.contains(&root.path().join("one.mp3")));
        assert!(found.contains(&nested.join("two.ogg")));
    }

    #[test]
    fn test_collect_audio_files_honors_case_folding_flag() {
        let root = tempfile::tempdir().expect("tempdir");
        touch(&root.path().join("loud.MP3"));

        assert!(collect_audio_files(root.path(), false).is_empty());
        assert_eq!(collect_audio_files(root.path(), true).len(), 1);
    }

    #[test]
    fn test_collect_audio_files_on_missing_root_is_empty() {
        let root = tempfile::tempdir().expect("tempdir");
        let missing = root.path().join("nope");
        assert!(collect_audio_files(&missing, false).is_empty());
    }
}
