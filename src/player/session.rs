use super::{Direction, LoadedTrack, MediaBackend, SessionState, SongLookup};
use crate::domain::SongRecord;
use log::{debug, info, warn};
use rand::seq::SliceRandom;
use std::{sync::Arc, time::Duration};

/// A single traversal over an ordered (optionally shuffled) list of song ids.
///
/// The sequence is fixed once started. Unplayable entries (missing catalog
/// row, missing file, backend refuses the file) are skipped in the direction
/// of travel, and the session ends once every entry has been tried.
pub struct PlaybackSession {
    backend: Box<dyn MediaBackend>,
    lookup: Arc<dyn SongLookup>,

    sequence: Vec<i64>,
    position: usize,
    current: Option<LoadedTrack>,
    state: SessionState,
    volume: f32,
}

impl PlaybackSession {
    pub fn new(backend: Box<dyn MediaBackend>, lookup: Arc<dyn SongLookup>, volume: f32) -> Self {
        PlaybackSession {
            backend,
            lookup,
            sequence: Vec::new(),
            position: 0,
            current: None,
            state: SessionState::Empty,
            volume: sanitize_volume(volume).unwrap_or(super::DEFAULT_VOLUME),
        }
    }
}

// =================
//   SESSION SETUP
// =================
impl PlaybackSession {
    /// Begin a new traversal, releasing whatever was loaded before.
    ///
    /// An empty list is ignored. `start_index` is honoured only when it is a
    /// valid index into `ids`, otherwise traversal begins at 0. Returns true
    /// when a track ended up loaded.
    pub fn start(&mut self, mut ids: Vec<i64>, start_index: usize, shuffle: bool) -> bool {
        if ids.is_empty() {
            debug!("Ignoring start with an empty sequence");
            return false;
        }

        self.release();

        let start = if start_index < ids.len() { start_index } else { 0 };
        if shuffle {
            ids.shuffle(&mut rand::rng());
        }

        self.sequence = ids;
        self.position = start;

        if !self.find_playable(start, Direction::Forward, true) {
            warn!("No playable songs in sequence");
            self.end();
            return false;
        }

        self.state = SessionState::Loaded;
        info!(
            "Session started with {} songs at position {}",
            self.sequence.len(),
            self.position
        );
        true
    }

    /// Release the media resource and terminate. Safe to call repeatedly.
    pub fn stop(&mut self) {
        if self.state.is_active() {
            info!("Session stopped");
        }
        self.end();
    }

    fn release(&mut self) {
        self.backend.stop();
        self.current = None;
    }

    fn end(&mut self) {
        self.release();
        self.sequence.clear();
        self.position = 0;
        self.state = SessionState::Stopped;
    }
}

// =============
//   TRANSPORT
// =============
impl PlaybackSession {
    pub fn play(&mut self) {
        if matches!(self.state, SessionState::Loaded | SessionState::Paused) {
            self.backend.play();
            self.state = SessionState::Playing;
        }
    }

    pub fn pause(&mut self) {
        if self.state == SessionState::Playing {
            self.backend.pause();
            self.state = SessionState::Paused;
        }
    }

    pub fn toggle(&mut self) {
        match self.state {
            SessionState::Playing => self.pause(),
            _ => self.play(),
        }
    }

    pub fn next(&mut self) -> bool {
        self.step(Direction::Forward)
    }

    pub fn previous(&mut self) -> bool {
        self.step(Direction::Backward)
    }

    fn step(&mut self, direction: Direction) -> bool {
        if !self.state.is_active() {
            return false;
        }

        let was_playing = self.state == SessionState::Playing;
        if !self.find_playable(self.position, direction, false) {
            warn!("Every song in the sequence was skipped, ending session");
            self.end();
            return false;
        }

        self.state = SessionState::Loaded;
        if was_playing {
            self.play();
        }
        true
    }

    /// Called when the backend reports the current track has finished.
    /// Moves forward without wrapping; the session ends after the last entry.
    pub fn on_track_end(&mut self) {
        if self.state != SessionState::Playing {
            return;
        }

        for pos in self.position + 1..self.sequence.len() {
            if self.try_load(pos) {
                self.position = pos;
                self.state = SessionState::Loaded;
                self.play();
                return;
            }
        }

        info!("Reached end of sequence");
        self.end();
    }

    /// Check the backend and advance if the current track has run out
    pub fn poll(&mut self) {
        if self.state == SessionState::Playing && self.backend.track_ended() {
            self.on_track_end();
        }
    }
}

// ================
//   TRACK LOADING
// ================
impl PlaybackSession {
    /// Walk the sequence from `from` in `direction` until a track loads,
    /// trying each entry at most once.
    fn find_playable(&mut self, from: usize, direction: Direction, include_from: bool) -> bool {
        let len = self.sequence.len();
        let mut pos = match include_from {
            true => from,
            false => direction.step(from, len),
        };

        for _ in 0..len {
            if self.try_load(pos) {
                self.position = pos;
                return true;
            }
            pos = direction.step(pos, len);
        }

        false
    }

    fn try_load(&mut self, pos: usize) -> bool {
        let id = self.sequence[pos];

        let Some(song) = self.lookup.lookup(id) else {
            warn!("Song {id} is not in the catalog, skipping");
            return false;
        };

        let track = match LoadedTrack::try_from(song) {
            Ok(track) => track,
            Err(e) => {
                warn!("Skipping song {id}: {e}");
                return false;
            }
        };

        self.release();
        if let Err(e) = self.backend.load(track.get_path()) {
            warn!("Could not load {}: {e}", track.get_path().display());
            return false;
        }

        self.backend.set_volume(self.volume);
        debug!("Loaded {}", track.get_path().display());
        self.current = Some(track);
        true
    }
}

// ==================
//   SEEK & VOLUME
// ==================
impl PlaybackSession {
    /// Jump to `secs` within the current track, clamped to `[0, duration]`.
    /// Returns false when nothing is loaded or the offset cannot be applied.
    pub fn seek(&mut self, secs: f64) -> bool {
        if !self.state.is_active() {
            return false;
        }
        let Some(track) = &self.current else {
            return false;
        };

        let secs = if secs.is_nan() || secs < 0.0 { 0.0 } else { secs };

        let target = match self.backend.duration().or(track.get_duration()) {
            Some(duration) => Duration::from_secs_f64(secs.min(duration.as_secs_f64())),
            None => match Duration::try_from_secs_f64(secs) {
                Ok(d) => d,
                Err(_) => return false,
            },
        };

        match self.backend.seek(target) {
            Ok(()) => true,
            Err(e) => {
                warn!("Seek to {:.1}s failed: {e}", target.as_secs_f64());
                false
            }
        }
    }

    /// Clamp to `[0.0, 1.0]` and keep the level for every later track and
    /// session. NaN is ignored.
    pub fn set_volume(&mut self, level: f32) {
        let Some(level) = sanitize_volume(level) else {
            return;
        };

        self.volume = level;
        if self.current.is_some() {
            self.backend.set_volume(level);
        }
    }
}

fn sanitize_volume(level: f32) -> Option<f32> {
    (!level.is_nan()).then(|| level.clamp(0.0, 1.0))
}

// =============
//   ACCESSORS
// =============
impl PlaybackSession {
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Index into the sequence, `None` unless a session is active
    pub fn position(&self) -> Option<usize> {
        self.state.is_active().then_some(self.position)
    }

    pub fn current_id(&self) -> Option<i64> {
        self.current.as_ref().map(LoadedTrack::get_id)
    }

    pub fn current_song(&self) -> Option<&SongRecord> {
        self.current.as_ref().map(LoadedTrack::get_song)
    }

    pub fn sequence(&self) -> &[i64] {
        &self.sequence
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn elapsed(&self) -> Duration {
        match self.current {
            Some(_) => self.backend.position(),
            None => Duration::ZERO,
        }
    }

    pub fn duration(&self) -> Option<Duration> {
        let track = self.current.as_ref()?;
        self.backend.duration().or(track.get_duration())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Result, anyhow};
    use std::{
        collections::HashMap,
        path::{Path, PathBuf},
        sync::Mutex,
    };
    use tempfile::TempDir;

    #[derive(Default)]
    struct Probe {
        loaded: Option<PathBuf>,
        playing: bool,
        volume: Option<f32>,
        ended: bool,
        seeks: Vec<Duration>,
    }

    struct FakeBackend {
        probe: Arc<Mutex<Probe>>,
        duration: Option<Duration>,
    }

    impl MediaBackend for FakeBackend {
        fn load(&mut self, path: &Path) -> Result<()> {
            let mut p = self.probe.lock().unwrap();
            if p.loaded.is_some() {
                return Err(anyhow!("previous track was not released"));
            }
            p.loaded = Some(path.to_path_buf());
            p.ended = false;
            Ok(())
        }

        fn play(&mut self) {
            self.probe.lock().unwrap().playing = true;
        }

        fn pause(&mut self) {
            self.probe.lock().unwrap().playing = false;
        }

        fn stop(&mut self) {
            let mut p = self.probe.lock().unwrap();
            p.loaded = None;
            p.playing = false;
        }

        fn seek(&mut self, pos: Duration) -> Result<()> {
            self.probe.lock().unwrap().seeks.push(pos);
            Ok(())
        }

        fn set_volume(&mut self, level: f32) {
            self.probe.lock().unwrap().volume = Some(level);
        }

        fn duration(&self) -> Option<Duration> {
            self.duration
        }

        fn position(&self) -> Duration {
            Duration::ZERO
        }

        fn track_ended(&self) -> bool {
            self.probe.lock().unwrap().ended
        }
    }

    impl SongLookup for HashMap<i64, SongRecord> {
        fn lookup(&self, id: i64) -> Option<SongRecord> {
            self.get(&id).cloned()
        }
    }

    struct Fixture {
        _dir: TempDir,
        session: PlaybackSession,
        probe: Arc<Mutex<Probe>>,
    }

    /// Songs 1..=count, with files created for every id not in `missing`
    fn fixture(count: i64, missing: &[i64], duration: Option<Duration>) -> Fixture {
        let dir = TempDir::new().unwrap();
        let mut songs = HashMap::new();

        for id in 1..=count {
            let path = dir.path().join(format!("{id}.mp3"));
            if !missing.contains(&id) {
                std::fs::write(&path, b"not really audio").unwrap();
            }
            songs.insert(
                id,
                SongRecord {
                    id,
                    title: format!("Song {id}"),
                    artist: "Artist".into(),
                    language: "English".into(),
                    genre: "Pop".into(),
                    rating: 0.0,
                    file_name: path.to_string_lossy().into_owned(),
                },
            );
        }

        let probe = Arc::new(Mutex::new(Probe::default()));
        let backend = FakeBackend {
            probe: Arc::clone(&probe),
            duration,
        };

        Fixture {
            _dir: dir,
            session: PlaybackSession::new(Box::new(backend), Arc::new(songs), 0.5),
            probe,
        }
    }

    #[test]
    fn transport_is_a_noop_before_start() {
        let mut f = fixture(2, &[], None);

        f.session.play();
        f.session.toggle();
        assert_eq!(f.session.state(), SessionState::Empty);
        assert!(!f.session.next());
        assert!(!f.session.seek(5.0));
        assert_eq!(f.session.position(), None);
        assert!(!f.probe.lock().unwrap().playing);
    }

    #[test]
    fn play_pause_toggle_cycle() {
        let mut f = fixture(2, &[], None);
        assert!(f.session.start(vec![1, 2], 0, false));
        assert_eq!(f.session.state(), SessionState::Loaded);

        f.session.play();
        assert_eq!(f.session.state(), SessionState::Playing);
        f.session.toggle();
        assert_eq!(f.session.state(), SessionState::Paused);
        assert!(!f.probe.lock().unwrap().playing);
        f.session.toggle();
        assert_eq!(f.session.state(), SessionState::Playing);
        assert!(f.probe.lock().unwrap().playing);
    }

    #[test]
    fn next_keeps_playing_state() {
        let mut f = fixture(3, &[], None);
        f.session.start(vec![1, 2, 3], 0, false);

        assert!(f.session.next());
        assert_eq!(f.session.state(), SessionState::Loaded);

        f.session.play();
        assert!(f.session.next());
        assert_eq!(f.session.state(), SessionState::Playing);
        assert_eq!(f.session.current_id(), Some(3));
        assert!(f.probe.lock().unwrap().playing);
    }

    #[test]
    fn seek_clamps_to_duration() {
        let mut f = fixture(1, &[], Some(Duration::from_secs(200)));
        f.session.start(vec![1], 0, false);

        assert!(f.session.seek(-3.0));
        assert!(f.session.seek(f64::NAN));
        assert!(f.session.seek(90.5));
        assert!(f.session.seek(1_000.0));
        assert!(f.session.seek(f64::INFINITY));

        assert_eq!(
            f.probe.lock().unwrap().seeks,
            vec![
                Duration::ZERO,
                Duration::ZERO,
                Duration::from_secs_f64(90.5),
                Duration::from_secs(200),
                Duration::from_secs(200),
            ]
        );
    }

    #[test]
    fn seek_without_known_duration_rejects_infinity() {
        let mut f = fixture(1, &[], None);
        f.session.start(vec![1], 0, false);

        assert!(f.session.seek(12.0));
        assert!(!f.session.seek(f64::INFINITY));
        assert_eq!(f.probe.lock().unwrap().seeks, vec![Duration::from_secs(12)]);
    }

    #[test]
    fn volume_is_clamped_and_applied_to_new_tracks() {
        let mut f = fixture(2, &[], None);
        assert_eq!(f.session.volume(), 0.5);

        f.session.set_volume(1.7);
        assert_eq!(f.session.volume(), 1.0);
        f.session.set_volume(f32::NAN);
        assert_eq!(f.session.volume(), 1.0);
        f.session.set_volume(-0.2);
        assert_eq!(f.session.volume(), 0.0);

        f.session.set_volume(0.25);
        f.session.start(vec![1, 2], 0, false);
        assert_eq!(f.probe.lock().unwrap().volume, Some(0.25));
    }

    #[test]
    fn track_end_advances_then_stops_without_wrapping() {
        let mut f = fixture(3, &[2], None);
        f.session.start(vec![1, 2, 3], 0, false);
        f.session.play();

        f.probe.lock().unwrap().ended = true;
        f.session.poll();
        assert_eq!(f.session.current_id(), Some(3));
        assert_eq!(f.session.state(), SessionState::Playing);

        f.probe.lock().unwrap().ended = true;
        f.session.poll();
        assert_eq!(f.session.state(), SessionState::Stopped);
        assert_eq!(f.session.current_id(), None);
        assert!(f.probe.lock().unwrap().loaded.is_none());
    }

    #[test]
    fn paused_session_ignores_track_end() {
        let mut f = fixture(2, &[], None);
        f.session.start(vec![1, 2], 0, false);
        f.session.play();
        f.session.pause();

        f.probe.lock().unwrap().ended = true;
        f.session.poll();
        assert_eq!(f.session.state(), SessionState::Paused);
        assert_eq!(f.session.current_id(), Some(1));
    }

    #[test]
    fn stop_is_idempotent() {
        let mut f = fixture(1, &[], None);
        f.session.stop();
        assert_eq!(f.session.state(), SessionState::Stopped);

        f.session.start(vec![1], 0, false);
        f.session.stop();
        f.session.stop();
        assert_eq!(f.session.state(), SessionState::Stopped);
        assert!(f.session.sequence().is_empty());
        assert!(f.probe.lock().unwrap().loaded.is_none());
    }
}
