use crate::domain::SongRecord;
use anyhow::{Result, anyhow};
use lofty::file::AudioFile;
use std::{
    path::{Path, PathBuf},
    time::Duration,
};

/// A catalog song whose media file has been found on disk
#[derive(Debug, Clone)]
pub struct LoadedTrack {
    song: SongRecord,
    path: PathBuf,
    duration: Option<Duration>,
}

impl TryFrom<SongRecord> for LoadedTrack {
    type Error = anyhow::Error;

    fn try_from(song: SongRecord) -> Result<Self, Self::Error> {
        let path = song.resolved_path()?;
        if !path.is_file() {
            return Err(anyhow!("Audio file does not exist: {}", path.display()));
        }

        let duration = probe_duration(&path);
        Ok(LoadedTrack {
            song,
            path,
            duration,
        })
    }
}

impl LoadedTrack {
    pub fn get_id(&self) -> i64 {
        self.song.id
    }

    pub fn get_song(&self) -> &SongRecord {
        &self.song
    }

    pub fn get_path(&self) -> &Path {
        &self.path
    }

    pub fn get_duration(&self) -> Option<Duration> {
        self.duration
    }
}

/// Read the track length from the file's tags/properties. `None` for files
/// lofty cannot parse.
pub fn probe_duration(path: &Path) -> Option<Duration> {
    let tagged = lofty::read_from_path(path).ok()?;
    let duration = tagged.properties().duration();

    (!duration.is_zero()).then_some(duration)
}
