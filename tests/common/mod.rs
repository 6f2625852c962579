#![allow(dead_code)]

use anyhow::{Result, anyhow};
use melodex::{
    Database, Library,
    domain::NewSong,
    player::{MediaBackend, PlayerHandle},
};
use std::{
    collections::HashSet,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
    time::Duration,
};
use tempfile::TempDir;

/// What the fake backend has been asked to do
#[derive(Default)]
pub struct BackendLog {
    pub loaded: Option<PathBuf>,
    pub loads: Vec<PathBuf>,
    pub playing: bool,
    pub volume: Option<f32>,
    pub seeks: Vec<Duration>,
    pub ended: bool,
    /// Files the backend refuses to decode
    pub refuse: HashSet<PathBuf>,
}

pub struct FakeBackend {
    log: Arc<Mutex<BackendLog>>,
    duration: Option<Duration>,
}

impl FakeBackend {
    pub fn new(duration: Option<Duration>) -> (Self, Arc<Mutex<BackendLog>>) {
        let log = Arc::new(Mutex::new(BackendLog::default()));
        let backend = FakeBackend {
            log: Arc::clone(&log),
            duration,
        };
        (backend, log)
    }
}

impl MediaBackend for FakeBackend {
    fn load(&mut self, path: &Path) -> Result<()> {
        let mut log = self.log.lock().unwrap();
        if log.loaded.is_some() {
            return Err(anyhow!("two tracks held at once"));
        }
        if log.refuse.contains(path) {
            return Err(anyhow!("cannot decode {}", path.display()));
        }
        log.loaded = Some(path.to_path_buf());
        log.loads.push(path.to_path_buf());
        log.ended = false;
        Ok(())
    }

    fn play(&mut self) {
        self.log.lock().unwrap().playing = true;
    }

    fn pause(&mut self) {
        self.log.lock().unwrap().playing = false;
    }

    fn stop(&mut self) {
        let mut log = self.log.lock().unwrap();
        log.loaded = None;
        log.playing = false;
    }

    fn seek(&mut self, pos: Duration) -> Result<()> {
        self.log.lock().unwrap().seeks.push(pos);
        Ok(())
    }

    fn set_volume(&mut self, level: f32) {
        self.log.lock().unwrap().volume = Some(level);
    }

    fn duration(&self) -> Option<Duration> {
        self.duration
    }

    fn position(&self) -> Duration {
        Duration::ZERO
    }

    fn track_ended(&self) -> bool {
        self.log.lock().unwrap().ended
    }
}

/// A library whose audio root is a temp dir holding one file per playable song
pub struct Catalog {
    pub dir: TempDir,
    pub library: Library,
}

impl Catalog {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let library = Library::new(Database::open_in_memory().unwrap(), dir.path());
        Catalog { dir, library }
    }

    /// Add a song stored at the default path, creating its file
    pub fn add_playable(&self, title: &str, artist: &str) -> i64 {
        let id = self.add_missing(title, artist);
        std::fs::write(self.path_of(title), b"fake audio").unwrap();
        id
    }

    /// Add a song whose file never exists
    pub fn add_missing(&self, title: &str, artist: &str) -> i64 {
        self.library
            .add_song(NewSong::new(title, artist, "English", "Pop", 3.0))
            .unwrap()
    }

    pub fn path_of(&self, title: &str) -> PathBuf {
        self.dir.path().join(format!("{title}.mp3"))
    }

    pub fn player(&self, duration: Option<Duration>) -> (PlayerHandle, Arc<Mutex<BackendLog>>) {
        let (backend, log) = FakeBackend::new(duration);
        let player = PlayerHandle::new(Box::new(backend), Arc::new(self.library.clone()), 0.7);
        (player, log)
    }
}
