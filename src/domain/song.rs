use super::SongInfo;
use std::path::PathBuf;

/// Input for a catalog insert. Text fields are canonicalized by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSong {
    pub title: String,
    pub artist: String,
    pub language: String,
    pub genre: String,
    pub rating: f64,
    /// Blank means "use the default `<audio_root>/<title>.mp3` path"
    pub file_name: String,
}

impl NewSong {
    pub fn new(
        title: impl Into<String>,
        artist: impl Into<String>,
        language: impl Into<String>,
        genre: impl Into<String>,
        rating: f64,
    ) -> Self {
        NewSong {
            title: title.into(),
            artist: artist.into(),
            language: language.into(),
            genre: genre.into(),
            rating,
            file_name: String::new(),
        }
    }

    pub fn with_file(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = file_name.into();
        self
    }
}

/// Full replacement of a song's mutable fields. The file path is fixed at
/// creation and therefore absent here.
#[derive(Debug, Clone, PartialEq)]
pub struct SongUpdate {
    pub title: String,
    pub artist: String,
    pub language: String,
    pub genre: String,
    pub rating: f64,
}

impl From<NewSong> for SongUpdate {
    fn from(song: NewSong) -> Self {
        SongUpdate {
            title: song.title,
            artist: song.artist,
            language: song.language,
            genre: song.genre,
            rating: song.rating,
        }
    }
}

/// A song joined across all four tables
#[derive(Debug, Clone, PartialEq)]
pub struct SongRecord {
    pub id: i64,
    pub title: String,
    pub artist: String,
    pub language: String,
    pub genre: String,
    pub rating: f64,
    pub file_name: String,
}

impl SongRecord {
    /// Absolute form of the stored path. Relative paths resolve against the
    /// working directory.
    pub fn resolved_path(&self) -> std::io::Result<PathBuf> {
        std::path::absolute(&self.file_name)
    }
}

/// One row of a title search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub id: i64,
    pub title: String,
    pub artist: String,
}

impl SongInfo for SongRecord {
    fn get_id(&self) -> i64 {
        self.id
    }

    fn get_title(&self) -> &str {
        &self.title
    }

    fn get_artist(&self) -> &str {
        &self.artist
    }
}

impl SongInfo for SearchHit {
    fn get_id(&self) -> i64 {
        self.id
    }

    fn get_title(&self) -> &str {
        &self.title
    }

    fn get_artist(&self) -> &str {
        &self.artist
    }
}
