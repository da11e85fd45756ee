//! Tag and duration readers backed by `lofty`.

use std::path::Path;
use std::time::Duration;

use lofty::error::LoftyError;
use lofty::file::TaggedFileExt;
use lofty::prelude::{Accessor, AudioFile};
use lofty::read_from_path;
use lofty::tag::{ItemKey, Tag};

/// Tag values extracted from a media file. Fields the file does not carry
/// are `None`; defaulting is the caller's concern.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackTags {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub release_year: Option<i32>,
}

fn first_non_empty_value<F>(primary_tag: Option<&Tag>, tags: &[Tag], mut extractor: F) -> Option<String>
where
    F: FnMut(&Tag) -> Option<String>,
{
    if let Some(tag) = primary_tag {
        if let Some(value) = extractor(tag) {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
    }

    for tag in tags {
        if let Some(value) = extractor(tag) {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
    }

    None
}

/// Accepts only an exact 4-digit year; everything else means "no date".
fn parse_release_year(value: &str) -> Option<i32> {
    let trimmed = value.trim();
    if trimmed.len() == 4 && trimmed.bytes().all(|b| b.is_ascii_digit()) {
        trimmed.parse().ok()
    } else {
        None
    }
}

/// File name without its extension, used as the title fallback for untagged
/// files.
pub fn base_name(path: &Path) -> String {
    path.file_stem()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Reads normalized tag values from a media file.
pub fn read_track_tags(path: &Path) -> Result<TrackTags, LoftyError> {
    let tagged_file = read_from_path(path)?;
    let primary_tag = tagged_file.primary_tag();
    let tags = tagged_file.tags();

    let title = first_non_empty_value(primary_tag, tags, |tag| {
        tag.title().map(|value| value.into_owned())
    });
    let artist = first_non_empty_value(primary_tag, tags, |tag| {
        tag.artist().map(|value| value.into_owned())
    });
    let album = first_non_empty_value(primary_tag, tags, |tag| {
        tag.album().map(|value| value.into_owned())
    });
    let date = first_non_empty_value(primary_tag, tags, |tag| {
        tag.get_string(ItemKey::RecordingDate)
            .or_else(|| tag.get_string(ItemKey::OriginalReleaseDate))
            .or_else(|| tag.get_string(ItemKey::Year))
            .map(str::to_string)
    });
    let release_year = date.as_deref().and_then(parse_release_year);

    Ok(TrackTags {
        title,
        artist,
        album,
        release_year,
    })
}

/// Track duration from the container properties; `None` on any read failure.
pub fn read_track_duration(path: &Path) -> Option<Duration> {
    let tagged_file = read_from_path(path).ok()?;
    Some(tagged_file.properties().duration())
}
