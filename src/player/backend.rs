use super::probe_duration;
use anyhow::{Result, anyhow};
use std::{path::Path, time::Duration};

/// The media engine behind a playback session.
///
/// A backend holds at most one track. `load` must release whatever was
/// loaded before opening the new file, and leaves the new track paused at
/// the start.
pub trait MediaBackend: Send {
    fn load(&mut self, path: &Path) -> Result<()>;
    fn play(&mut self);
    fn pause(&mut self);
    /// Release the current track. Safe to call with nothing loaded.
    fn stop(&mut self);
    fn seek(&mut self, pos: Duration) -> Result<()>;
    fn set_volume(&mut self, level: f32);
    /// Length of the loaded track, when the decoder knows it
    fn duration(&self) -> Option<Duration>;
    fn position(&self) -> Duration;
    /// True once a loaded track has played through to the end
    fn track_ended(&self) -> bool;
}

/// Backend without an audio device. Tracks "load" if they can be opened and
/// never finish on their own.
#[derive(Default)]
pub struct SilentBackend {
    loaded: bool,
    duration: Option<Duration>,
    position: Duration,
}

impl SilentBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MediaBackend for SilentBackend {
    fn load(&mut self, path: &Path) -> Result<()> {
        self.stop();
        std::fs::File::open(path)?;

        self.loaded = true;
        self.duration = probe_duration(path);
        Ok(())
    }

    fn play(&mut self) {}

    fn pause(&mut self) {}

    fn stop(&mut self) {
        self.loaded = false;
        self.duration = None;
        self.position = Duration::ZERO;
    }

    fn seek(&mut self, pos: Duration) -> Result<()> {
        if !self.loaded {
            return Err(anyhow!("Nothing loaded"));
        }
        self.position = pos;
        Ok(())
    }

    fn set_volume(&mut self, _level: f32) {}

    fn duration(&self) -> Option<Duration> {
        self.duration
    }

    fn position(&self) -> Duration {
        self.position
    }

    fn track_ended(&self) -> bool {
        false
    }
}
