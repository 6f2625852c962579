pub const CREATE_TABLES: &str = r"
    CREATE TABLE IF NOT EXISTS artists(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT UNIQUE NOT NULL
    );

    CREATE TABLE IF NOT EXISTS languages(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT UNIQUE NOT NULL
    );

    CREATE TABLE IF NOT EXISTS genres(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT UNIQUE NOT NULL
    );

    CREATE TABLE IF NOT EXISTS songs(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        artist_id INTEGER NOT NULL,
        language_id INTEGER NOT NULL,
        genre_id INTEGER NOT NULL,
        rating REAL NOT NULL DEFAULT 0.0,
        file_name TEXT NOT NULL,
        FOREIGN KEY(artist_id) REFERENCES artists(id),
        FOREIGN KEY(language_id) REFERENCES languages(id),
        FOREIGN KEY(genre_id) REFERENCES genres(id)
    );

    CREATE INDEX IF NOT EXISTS idx_songs_artist ON songs(artist_id);
    CREATE INDEX IF NOT EXISTS idx_songs_language ON songs(language_id);
    CREATE INDEX IF NOT EXISTS idx_songs_genre ON songs(genre_id);

    CREATE TABLE IF NOT EXISTS session_state(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );
";
