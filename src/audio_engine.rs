//! The audio-engine seam and its `rodio` production implementation.
//!
//! The playback session talks to this trait only; tests drive it with a
//! scripted fake, the application with [`RodioEngine`].

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use log::warn;
use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink};
use thiserror::Error;

/// Engine-side failure, reported upward instead of being swallowed.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("audio output unavailable: {0}")]
    Output(String),
    #[error("failed to load {path}: {reason}")]
    Load { path: String, reason: String },
    #[error("seek failed: {0}")]
    Seek(String),
}

/// One active track: load it, start it from the top, suspend/resume it, move
/// the playhead. Exactly the surface the playback session needs.
pub trait AudioEngine {
    /// Prepares `path` for playback without starting it. Replaces whatever
    /// was loaded before.
    fn load(&mut self, path: &Path) -> Result<(), EngineError>;
    /// Starts (or restarts) the loaded track from position 0.
    fn play(&mut self) -> Result<(), EngineError>;
    fn pause(&mut self);
    fn resume(&mut self);
    /// Drops the loaded track.
    fn stop(&mut self);
    fn seek(&mut self, position: Duration) -> Result<(), EngineError>;
    fn set_volume(&mut self, volume: f32);
    /// Playhead position; zero when nothing is loaded.
    fn position(&self) -> Duration;
    /// True while a loaded track is audibly progressing.
    fn is_active(&self) -> bool;
}

/// Production engine owning the rodio output stream and the per-track sink.
pub struct RodioEngine {
    // Keep the stream alive for the lifetime of the engine.
    stream: OutputStream,
    sink: Option<Sink>,
    volume: f32,
}

impl RodioEngine {
    pub fn new() -> Result<Self, EngineError> {
        let stream = OutputStreamBuilder::open_default_stream()
            .map_err(|err| EngineError::Output(err.to_string()))?;
        Ok(Self {
            stream,
            sink: None,
            volume: 1.0,
        })
    }
}

impl AudioEngine for RodioEngine {
    fn load(&mut self, path: &Path) -> Result<(), EngineError> {
        self.stop();

        let file = File::open(path).map_err(|err| EngineError::Load {
            path: path.display().to_string(),
            reason: err.to_string(),
        })?;
        let decoder = Decoder::new(BufReader::new(file)).map_err(|err| EngineError::Load {
            path: path.display().to_string(),
            reason: err.to_string(),
        })?;

        let sink = Sink::connect_new(self.stream.mixer());
        sink.append(decoder);
        sink.pause();
        sink.set_volume(self.volume);
        self.sink = Some(sink);
        Ok(())
    }

    fn play(&mut self) -> Result<(), EngineError> {
        if let Some(sink) = &self.sink {
            if let Err(err) = sink.try_seek(Duration::ZERO) {
                // Some decoders cannot rewind; resume from the current
                // position rather than failing the whole command.
                warn!("Restart seek failed: {err}");
            }
            sink.play();
        }
        Ok(())
    }

    fn pause(&mut self) {
        if let Some(sink) = &self.sink {
            sink.pause();
        }
    }

    fn resume(&mut self) {
        if let Some(sink) = &self.sink {
            sink.play();
        }
    }

    fn stop(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
    }

    fn seek(&mut self, position: Duration) -> Result<(), EngineError> {
        match &self.sink {
            Some(sink) => sink
                .try_seek(position)
                .map_err(|err| EngineError::Seek(err.to_string())),
            None => Ok(()),
        }
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
        if let Some(sink) = &self.sink {
            sink.set_volume(volume);
        }
    }

    fn position(&self) -> Duration {
        self.sink
            .as_ref()
            .map(|sink| sink.get_pos())
            .unwrap_or_default()
    }

    fn is_active(&self) -> bool {
        self.sink
            .as_ref()
            .is_some_and(|sink| !sink.empty() && !sink.is_paused())
    }
}
