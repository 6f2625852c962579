use crate::domain::Dimension;

pub const INSERT_SONG: &str = "
    INSERT INTO songs (
        title,
        artist_id,
        language_id,
        genre_id,
        rating,
        file_name
    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
";

pub const UPDATE_SONG: &str = "
    UPDATE songs SET
        title = ?1,
        artist_id = ?2,
        language_id = ?3,
        genre_id = ?4,
        rating = ?5
    WHERE id = ?6
";

pub const GET_SONG_DIMENSIONS: &str = "
    SELECT artist_id, language_id, genre_id
    FROM songs
    WHERE id = ?
";

pub const DELETE_SONG: &str = "
    DELETE FROM songs WHERE id = ?
";

pub const FIND_IDS_BY_TITLE: &str = "
    SELECT id FROM songs
    WHERE title = ?
    ORDER BY id
";

pub const GET_ALL_IDS: &str = "
    SELECT id FROM songs
";

pub const SEARCH_CANDIDATES: &str = "
    SELECT s.id, s.title, a.name AS artist
    FROM songs s
    JOIN artists a ON s.artist_id = a.id
";

pub const RESOLVE_SONG: &str = "
    SELECT
        s.id,
        s.title,
        s.rating,
        s.file_name,
        a.name AS artist,
        l.name AS language,
        g.name AS genre
    FROM songs s
    JOIN artists a ON s.artist_id = a.id
    JOIN languages l ON s.language_id = l.id
    JOIN genres g ON s.genre_id = g.id
    WHERE s.id = ?
";

pub const GET_SESSION_STATE: &str = "
    SELECT value FROM session_state WHERE key = ?
";

pub const SET_SESSION_STATE: &str = "
    INSERT OR REPLACE INTO session_state (key, value) VALUES (?, ?)
";

// =====================
//   DIMENSION QUERIES
// =====================

// The no-op update makes RETURNING yield the existing id on conflict
const UPSERT_ARTIST: &str = "
    INSERT INTO artists (name) VALUES (?1)
    ON CONFLICT(name) DO UPDATE SET name = excluded.name
    RETURNING id
";

const UPSERT_LANGUAGE: &str = "
    INSERT INTO languages (name) VALUES (?1)
    ON CONFLICT(name) DO UPDATE SET name = excluded.name
    RETURNING id
";

const UPSERT_GENRE: &str = "
    INSERT INTO genres (name) VALUES (?1)
    ON CONFLICT(name) DO UPDATE SET name = excluded.name
    RETURNING id
";

const DELETE_ORPHAN_ARTIST: &str = "
    DELETE FROM artists
    WHERE id = ?1
        AND NOT EXISTS (SELECT 1 FROM songs WHERE artist_id = ?1)
";

const DELETE_ORPHAN_LANGUAGE: &str = "
    DELETE FROM languages
    WHERE id = ?1
        AND NOT EXISTS (SELECT 1 FROM songs WHERE language_id = ?1)
";

const DELETE_ORPHAN_GENRE: &str = "
    DELETE FROM genres
    WHERE id = ?1
        AND NOT EXISTS (SELECT 1 FROM songs WHERE genre_id = ?1)
";

const ARTIST_NAMES: &str = "
    SELECT name FROM artists ORDER BY name ASC
";

const LANGUAGE_NAMES: &str = "
    SELECT name FROM languages ORDER BY name ASC
";

const GENRE_NAMES: &str = "
    SELECT name FROM genres ORDER BY name ASC
";

const COUNT_ARTISTS: &str = "SELECT COUNT(*) FROM artists";
const COUNT_LANGUAGES: &str = "SELECT COUNT(*) FROM languages";
const COUNT_GENRES: &str = "SELECT COUNT(*) FROM genres";

const SONGS_BY_ARTIST: &str = "
    SELECT s.id FROM songs s
    JOIN artists a ON s.artist_id = a.id
    JOIN languages l ON s.language_id = l.id
    JOIN genres g ON s.genre_id = g.id
    WHERE a.name = ?
    ORDER BY s.id
";

const SONGS_BY_LANGUAGE: &str = "
    SELECT s.id FROM songs s
    JOIN artists a ON s.artist_id = a.id
    JOIN languages l ON s.language_id = l.id
    JOIN genres g ON s.genre_id = g.id
    WHERE l.name = ?
    ORDER BY s.id
";

const SONGS_BY_GENRE: &str = "
    SELECT s.id FROM songs s
    JOIN artists a ON s.artist_id = a.id
    JOIN languages l ON s.language_id = l.id
    JOIN genres g ON s.genre_id = g.id
    WHERE g.name = ?
    ORDER BY s.id
";

pub fn upsert_dimension(dim: Dimension) -> &'static str {
    match dim {
        Dimension::Artist => UPSERT_ARTIST,
        Dimension::Language => UPSERT_LANGUAGE,
        Dimension::Genre => UPSERT_GENRE,
    }
}

pub fn delete_orphan(dim: Dimension) -> &'static str {
    match dim {
        Dimension::Artist => DELETE_ORPHAN_ARTIST,
        Dimension::Language => DELETE_ORPHAN_LANGUAGE,
        Dimension::Genre => DELETE_ORPHAN_GENRE,
    }
}

pub fn dimension_names(dim: Dimension) -> &'static str {
    match dim {
        Dimension::Artist => ARTIST_NAMES,
        Dimension::Language => LANGUAGE_NAMES,
        Dimension::Genre => GENRE_NAMES,
    }
}

pub fn count_dimension(dim: Dimension) -> &'static str {
    match dim {
        Dimension::Artist => COUNT_ARTISTS,
        Dimension::Language => COUNT_LANGUAGES,
        Dimension::Genre => COUNT_GENRES,
    }
}

pub fn songs_by_dimension(dim: Dimension) -> &'static str {
    match dim {
        Dimension::Artist => SONGS_BY_ARTIST,
        Dimension::Language => SONGS_BY_LANGUAGE,
        Dimension::Genre => SONGS_BY_GENRE,
    }
}
