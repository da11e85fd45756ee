//! Playback session: transport state machine over an [`AudioEngine`].
//!
//! Owns the current track, the paused flag, and the volume. Sequential
//! navigation runs over a caller-supplied active playlist; the session never
//! stores or mutates that list.

use std::path::{Path, PathBuf};
use std::time::Duration;

use log::warn;
use thiserror::Error;

use crate::audio_engine::{AudioEngine, EngineError};
use crate::metadata_tags;

pub const DEFAULT_VOLUME: f32 = 0.5;
pub const DEFAULT_SKIP_SECONDS: u64 = 5;

/// Transport command failure. Distinguishes "nothing to act on" from an
/// engine fault so callers are not left guessing.
#[derive(Error, Debug)]
pub enum PlaybackError {
    #[error("no track to operate on")]
    NoTrack,
    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Playback session. States: empty (no track), playing, paused.
pub struct AudioPlayer<E> {
    engine: E,
    current_track: Option<PathBuf>,
    paused: bool,
    volume: f32,
}

impl<E: AudioEngine> AudioPlayer<E> {
    pub fn new(mut engine: E) -> Self {
        engine.set_volume(DEFAULT_VOLUME);
        Self {
            engine,
            current_track: None,
            paused: false,
            volume: DEFAULT_VOLUME,
        }
    }

    /// Hands `path` to the engine without starting playback. On engine
    /// failure the session clears to empty and the error is returned.
    pub fn load(&mut self, path: &Path) -> Result<(), PlaybackError> {
        match self.engine.load(path) {
            Ok(()) => {
                self.current_track = Some(path.to_path_buf());
                self.paused = false;
                Ok(())
            }
            Err(err) => {
                warn!("Engine failed to load {}: {}", path.display(), err);
                self.current_track = None;
                self.paused = false;
                Err(err.into())
            }
        }
    }

    /// Starts (or restarts) the loaded track from position 0.
    pub fn play(&mut self) -> Result<(), PlaybackError> {
        if self.current_track.is_none() {
            return Err(PlaybackError::NoTrack);
        }
        self.engine.play()?;
        self.paused = false;
        Ok(())
    }

    /// Suspends playback. Only meaningful while actively playing.
    pub fn pause(&mut self) {
        if self.engine.is_active() {
            self.engine.pause();
            self.paused = true;
        }
    }

    /// Resumes from where [`pause`](Self::pause) left off.
    pub fn unpause(&mut self) {
        if self.paused && self.current_track.is_some() {
            self.engine.resume();
            self.paused = false;
        }
    }

    /// Unconditionally back to empty.
    pub fn stop(&mut self) {
        self.engine.stop();
        self.current_track = None;
        self.paused = false;
    }

    /// Advances to the track after the current one in `active_playlist`,
    /// wrapping at the end, and starts playing it.
    pub fn next(&mut self, active_playlist: &[PathBuf]) -> Result<PathBuf, PlaybackError> {
        self.step(active_playlist, 1)
    }

    /// Steps back to the track before the current one, wrapping at the
    /// start, and starts playing it.
    pub fn prev(&mut self, active_playlist: &[PathBuf]) -> Result<PathBuf, PlaybackError> {
        self.step(active_playlist, -1)
    }

    fn step(
        &mut self,
        active_playlist: &[PathBuf],
        offset: isize,
    ) -> Result<PathBuf, PlaybackError> {
        if active_playlist.is_empty() {
            return Err(PlaybackError::NoTrack);
        }
        let current = self.current_track.as_ref().ok_or(PlaybackError::NoTrack)?;
        let index = active_playlist
            .iter()
            .position(|path| path == current)
            .ok_or(PlaybackError::NoTrack)?;

        let length = active_playlist.len() as isize;
        let target = (index as isize + offset + length) % length;
        let path = active_playlist[target as usize].clone();

        self.load(&path)?;
        self.play()?;
        Ok(path)
    }

    /// Moves the playhead forward. The target is clamped to the track
    /// length: skipping at or past the end stops the session. Only effective
    /// while actively playing.
    pub fn skip_forward(&mut self, seconds: u64) -> Result<(), PlaybackError> {
        if !self.engine.is_active() {
            return Err(PlaybackError::NoTrack);
        }

        let target = self.engine.position() + Duration::from_secs(seconds);
        let length = self.track_length();
        if !length.is_zero() && target >= length {
            self.stop();
            return Ok(());
        }
        self.engine.seek(target).map_err(PlaybackError::from)
    }

    /// Moves the playhead backward, clamping at position 0. Only effective
    /// while actively playing.
    pub fn skip_backward(&mut self, seconds: u64) -> Result<(), PlaybackError> {
        if !self.engine.is_active() {
            return Err(PlaybackError::NoTrack);
        }

        let target = self
            .engine
            .position()
            .saturating_sub(Duration::from_secs(seconds));
        self.engine.seek(target).map_err(PlaybackError::from)
    }

    /// Clamps to `[0, 1]` before forwarding to the engine.
    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
        self.engine.set_volume(self.volume);
    }

    /// The last clamped value, independent of engine confirmation.
    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Playhead position; zero whenever not actively playing.
    pub fn current_position(&self) -> Duration {
        if self.engine.is_active() {
            self.engine.position()
        } else {
            Duration::ZERO
        }
    }

    /// Length of the loaded track via the tag reader; zero when empty or
    /// unreadable.
    pub fn track_length(&self) -> Duration {
        self.current_track
            .as_deref()
            .and_then(metadata_tags::read_track_duration)
            .unwrap_or(Duration::ZERO)
    }

    pub fn current_track(&self) -> Option<&Path> {
        self.current_track.as_deref()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }
}
