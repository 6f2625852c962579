use super::{DEFAULT_EXTENSION, VOLUME_KEY};
use crate::{
    database::Database,
    domain::{Dimension, NewSong, SearchHit, SongRecord, SongUpdate},
    error::CatalogResult,
    player::SongLookup,
};
use log::{error, info, warn};
use rand::Rng;
use std::{
    path::PathBuf,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

/// Shared entry point to the catalog.
///
/// Cloning is cheap; every clone talks to the same database. Each call is a
/// short unit of work under the database lock.
#[derive(Clone)]
pub struct Library {
    db: Arc<Mutex<Database>>,
    audio_root: PathBuf,
}

impl Library {
    pub fn new(db: Database, audio_root: impl Into<PathBuf>) -> Self {
        Library {
            db: Arc::new(Mutex::new(db)),
            audio_root: audio_root.into(),
        }
    }

    pub(super) fn db(&self) -> MutexGuard<'_, Database> {
        self.db.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// `<audio_root>/<title>.mp3`
    pub fn default_path(&self, title: &str) -> String {
        self.audio_root
            .join(format!("{}.{DEFAULT_EXTENSION}", title.trim()))
            .to_string_lossy()
            .into_owned()
    }
}

// ======================
//   CATALOG MUTATIONS
// ======================
impl Library {
    /// Add a song. A blank `file_name` falls back to [`Library::default_path`].
    pub fn add_song(&self, mut song: NewSong) -> CatalogResult<i64> {
        if song.file_name.trim().is_empty() {
            song.file_name = self.default_path(&song.title);
        }

        self.db().add_song(&song).inspect_err(|e| {
            error!("Failed to add song \"{}\": {e}", song.title);
        })
    }

    pub fn update_song(&self, id: i64, song: &SongUpdate) -> CatalogResult<()> {
        self.db()
            .update_song_by_id(id, song)
            .inspect_err(|e| error!("Failed to update song {id}: {e}"))
    }

    pub fn delete_song(&self, id: i64) -> CatalogResult<()> {
        self.db()
            .delete_song_by_id(id)
            .inspect_err(|e| error!("Failed to delete song {id}: {e}"))
    }
}

// ===========
//   QUERIES
// ===========
impl Library {
    pub fn find_ids_by_title(&self, title: &str) -> CatalogResult<Vec<i64>> {
        self.db().find_ids_by_title(title)
    }

    pub fn find_ids_by_category(&self, dim: Dimension, value: &str) -> CatalogResult<Vec<i64>> {
        self.db().find_ids_by_category(dim, value)
    }

    pub fn search(&self, query: &str) -> CatalogResult<Vec<SearchHit>> {
        self.db().search_by_title_like(query)
    }

    pub fn resolve_song(&self, id: i64) -> CatalogResult<Option<SongRecord>> {
        self.db().resolve_song(id)
    }

    pub fn list_dimension_values(&self, dim: Dimension) -> CatalogResult<Vec<String>> {
        self.db().list_dimension_values(dim)
    }

    pub fn list_all_song_ids(&self) -> CatalogResult<Vec<i64>> {
        self.db().list_all_song_ids()
    }

    pub fn count_dimension_rows(&self, dim: Dimension) -> CatalogResult<usize> {
        self.db().count_dimension_rows(dim)
    }

    /// The whole catalog plus a random starting index, for quick play.
    /// `None` when the catalog is empty.
    pub fn quick_play_selection(&self) -> CatalogResult<Option<(Vec<i64>, usize)>> {
        let ids = self.list_all_song_ids()?;
        if ids.is_empty() {
            return Ok(None);
        }

        let start = rand::rng().random_range(0..ids.len());
        Ok(Some((ids, start)))
    }
}

// =================
//   SESSION STATE
// =================
impl Library {
    pub fn load_volume(&self) -> Option<f32> {
        match self.db().get_session_state(VOLUME_KEY) {
            Ok(value) => value.and_then(|v| v.parse::<f32>().ok()),
            Err(e) => {
                warn!("Could not read saved volume: {e}");
                None
            }
        }
    }

    pub fn save_volume(&self, volume: f32) -> CatalogResult<()> {
        self.db().save_session_state(VOLUME_KEY, &volume.to_string())?;
        info!("Saved volume {volume:.2}");
        Ok(())
    }
}

impl SongLookup for Library {
    fn lookup(&self, id: i64) -> Option<SongRecord> {
        self.resolve_song(id).unwrap_or_else(|e| {
            warn!("Could not resolve song {id}: {e}");
            None
        })
    }
}
