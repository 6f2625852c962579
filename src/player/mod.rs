mod backend;
mod backend_rodio;
mod handle;
mod session;
mod track;

use crate::domain::SongRecord;

pub use backend::{MediaBackend, SilentBackend};
pub use backend_rodio::RodioBackend;
pub use handle::{PlaybackStatus, PlayerHandle};
pub use session::PlaybackSession;
pub use track::{LoadedTrack, probe_duration};

pub const DEFAULT_VOLUME: f32 = 0.7;

/// Lifecycle of a playback session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No sequence has been started yet
    Empty,
    /// A track is loaded at the current position but not playing
    Loaded,
    Playing,
    Paused,
    /// Terminal. Reached by `stop` or by running out of playable tracks.
    Stopped,
}

impl SessionState {
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            SessionState::Loaded | SessionState::Playing | SessionState::Paused
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    /// One step with wraparound
    pub(crate) fn step(self, pos: usize, len: usize) -> usize {
        match self {
            Direction::Forward => (pos + 1) % len,
            Direction::Backward => (pos + len - 1) % len,
        }
    }
}

/// Song metadata source used by the session as it advances
pub trait SongLookup: Send + Sync {
    fn lookup(&self, id: i64) -> Option<SongRecord>;
}
