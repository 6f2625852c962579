use crate::{
    domain::{Dimension, NewSong, SongUpdate, format_text},
    error::{CatalogError, CatalogResult},
};
use log::debug;
use queries::*;
use rusqlite::{Connection, OptionalExtension, params};
use std::{fs, path::Path};

mod finder;
pub mod queries;
mod tables;

pub const DATABASE_FILENAME: &str = "melodex.db";

pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) the catalog at `path`. The schema is created if absent.
    pub fn open<P: AsRef<Path>>(path: P) -> CatalogResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;

        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> CatalogResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> CatalogResult<Self> {
        conn.pragma_update(None, "foreign_keys", "ON")?;

        let mut db = Database { conn };
        db.create_tables()?;

        Ok(db)
    }

    fn create_tables(&mut self) -> CatalogResult<()> {
        let tx = self.conn.transaction()?;
        tx.execute_batch(tables::CREATE_TABLES)?;
        tx.commit()?;

        Ok(())
    }

    // ===================
    //   SONG OPERATIONS
    // ===================

    /// Insert a song, creating any dimension rows it needs.
    ///
    /// The dimension upserts and the insert share one transaction, so a
    /// failure anywhere leaves the catalog untouched.
    pub fn add_song(&mut self, song: &NewSong) -> CatalogResult<i64> {
        let fields = CanonicalFields::new(
            &song.title,
            &song.artist,
            &song.language,
            &song.genre,
            song.rating,
        )?;

        if song.file_name.trim().is_empty() {
            return Err(CatalogError::validation("file name must not be empty"));
        }

        let tx = self.conn.transaction()?;
        let [artist_id, language_id, genre_id] = fields.resolve_ids(&tx)?;

        tx.execute(
            INSERT_SONG,
            params![
                &fields.title,
                artist_id,
                language_id,
                genre_id,
                fields.rating,
                song.file_name.trim(),
            ],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;

        debug!("Added song {id}: {}", fields.title);
        Ok(id)
    }

    /// Replace title, dimensions and rating of an existing song. The stored
    /// file path is never touched.
    pub fn update_song_by_id(&mut self, id: i64, song: &SongUpdate) -> CatalogResult<()> {
        let fields = CanonicalFields::new(
            &song.title,
            &song.artist,
            &song.language,
            &song.genre,
            song.rating,
        )?;

        let tx = self.conn.transaction()?;
        let [artist_id, language_id, genre_id] = fields.resolve_ids(&tx)?;

        let affected = tx.execute(
            UPDATE_SONG,
            params![
                &fields.title,
                artist_id,
                language_id,
                genre_id,
                fields.rating,
                id
            ],
        )?;

        // Dropping the transaction rolls back any dimension rows created above
        if affected == 0 {
            return Err(CatalogError::not_found("song", id));
        }
        tx.commit()?;

        debug!("Updated song {id}");
        Ok(())
    }

    /// Delete a song and any dimension rows it leaves unreferenced.
    ///
    /// Runs as a single transaction: read the song's dimension ids, delete
    /// the song, then conditionally delete each dimension row.
    pub fn delete_song_by_id(&mut self, id: i64) -> CatalogResult<()> {
        let tx = self.conn.transaction()?;

        let refs: Option<[i64; 3]> = tx
            .query_row(GET_SONG_DIMENSIONS, [id], |row| {
                Ok([row.get(0)?, row.get(1)?, row.get(2)?])
            })
            .optional()?;

        let Some(dimension_ids) = refs else {
            return Err(CatalogError::not_found("song", id));
        };

        if tx.execute(DELETE_SONG, [id])? == 0 {
            return Err(CatalogError::not_found("song", id));
        }

        for (dim, dim_id) in Dimension::ALL.into_iter().zip(dimension_ids) {
            if tx.execute(delete_orphan(dim), [dim_id])? > 0 {
                debug!("Removed orphaned {dim} {dim_id}");
            }
        }
        tx.commit()?;

        debug!("Deleted song {id}");
        Ok(())
    }

    /// Exact (case-sensitive) lookup of `name` in the dimension table,
    /// inserting it when absent. Callers pass canonical names.
    pub fn get_or_create_id(&mut self, dim: Dimension, name: &str) -> CatalogResult<i64> {
        get_or_create_id(&self.conn, dim, name)
    }

    // =================
    //   SESSION STATE
    // =================

    pub fn save_session_state(&mut self, key: &str, value: &str) -> CatalogResult<()> {
        self.conn.execute(SET_SESSION_STATE, params![key, value])?;
        Ok(())
    }

    pub fn get_session_state(&mut self, key: &str) -> CatalogResult<Option<String>> {
        let value = self
            .conn
            .query_row(GET_SESSION_STATE, params![key], |row| {
                row.get::<_, String>(0)
            })
            .optional()?;

        Ok(value)
    }
}

fn get_or_create_id(conn: &Connection, dim: Dimension, name: &str) -> CatalogResult<i64> {
    let id = conn.query_row(upsert_dimension(dim), [name], |row| row.get(0))?;
    Ok(id)
}

/// Title and dimension names after canonicalization, plus a checked rating
struct CanonicalFields {
    title: String,
    names: [String; 3],
    rating: f64,
}

impl CanonicalFields {
    fn new(title: &str, artist: &str, language: &str, genre: &str, rating: f64) -> CatalogResult<Self> {
        if !rating.is_finite() {
            return Err(CatalogError::validation(format!("rating {rating} is not a number")));
        }

        let title = format_text(title);
        if title.is_empty() {
            return Err(CatalogError::validation("title must not be empty"));
        }

        let names = [format_text(artist), format_text(language), format_text(genre)];
        for (dim, name) in Dimension::ALL.iter().zip(&names) {
            if name.is_empty() {
                return Err(CatalogError::validation(format!("{dim} must not be empty")));
            }
        }

        Ok(CanonicalFields {
            title,
            names,
            rating,
        })
    }

    /// Artist, language and genre ids, in that order
    fn resolve_ids(&self, conn: &Connection) -> CatalogResult<[i64; 3]> {
        let mut ids = [0; 3];
        for ((dim, name), slot) in Dimension::ALL.into_iter().zip(&self.names).zip(&mut ids) {
            *slot = get_or_create_id(conn, dim, name)?;
        }
        Ok(ids)
    }
}
