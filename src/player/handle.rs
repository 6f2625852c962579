use super::{MediaBackend, PlaybackSession, SessionState, SongLookup};
use crate::{REFRESH_RATE, domain::SongRecord};
use log::debug;
use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    thread::{self, JoinHandle},
    time::Duration,
};

/// Point-in-time view of the session for display
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackStatus {
    pub state: SessionState,
    pub position: Option<usize>,
    pub length: usize,
    pub song: Option<SongRecord>,
    pub elapsed: Duration,
    pub duration: Option<Duration>,
    pub volume: f32,
}

/// Owner of the process-wide playback session.
///
/// Every clone refers to the same session and every operation runs under its
/// lock, so transitions from different callers never interleave.
#[derive(Clone)]
pub struct PlayerHandle {
    session: Arc<Mutex<PlaybackSession>>,
}

impl PlayerHandle {
    pub fn new(backend: Box<dyn MediaBackend>, lookup: Arc<dyn SongLookup>, volume: f32) -> Self {
        PlayerHandle {
            session: Arc::new(Mutex::new(PlaybackSession::new(backend, lookup, volume))),
        }
    }

    pub fn lock(&self) -> MutexGuard<'_, PlaybackSession> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Poll the session for finished tracks until every handle is dropped
    pub fn spawn_monitor(&self) -> std::io::Result<JoinHandle<()>> {
        let weak = Arc::downgrade(&self.session);

        thread::Builder::new()
            .name("melodex-monitor".into())
            .spawn(move || {
                while let Some(session) = weak.upgrade() {
                    session
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .poll();
                    drop(session);
                    thread::sleep(REFRESH_RATE);
                }
                debug!("Playback monitor exiting");
            })
    }
}

// =====================
//    COMMAND HANDLER
// =====================
impl PlayerHandle {
    pub fn start(&self, ids: Vec<i64>, start_index: usize, shuffle: bool) -> bool {
        self.lock().start(ids, start_index, shuffle)
    }

    pub fn play(&self) {
        self.lock().play()
    }

    pub fn pause(&self) {
        self.lock().pause()
    }

    pub fn toggle_playback(&self) {
        self.lock().toggle()
    }

    pub fn next(&self) -> bool {
        self.lock().next()
    }

    pub fn previous(&self) -> bool {
        self.lock().previous()
    }

    pub fn seek(&self, secs: f64) -> bool {
        self.lock().seek(secs)
    }

    pub fn set_volume(&self, level: f32) {
        self.lock().set_volume(level)
    }

    pub fn stop(&self) {
        self.lock().stop()
    }

    pub fn poll(&self) {
        self.lock().poll()
    }
}

// ===============
//    ACCESSORS
// ===============
impl PlayerHandle {
    pub fn state(&self) -> SessionState {
        self.lock().state()
    }

    pub fn volume(&self) -> f32 {
        self.lock().volume()
    }

    pub fn current_id(&self) -> Option<i64> {
        self.lock().current_id()
    }

    pub fn status(&self) -> PlaybackStatus {
        let session = self.lock();
        PlaybackStatus {
            state: session.state(),
            position: session.position(),
            length: session.sequence().len(),
            song: session.current_song().cloned(),
            elapsed: session.elapsed(),
            duration: session.duration(),
            volume: session.volume(),
        }
    }
}
