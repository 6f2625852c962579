mod action;

pub use action::{next_line, parse_line};

use crate::domain::{Dimension, NewSong, SongUpdate};
use std::path::PathBuf;

pub const HELP: &str = "\
CATALOG
  add <title> | <artist> | <language> | <genre> | <rating> [| <path>]
  update <id> | <title> | <artist> | <language> | <genre> | <rating>
  delete <id>
  import <file.csv>
  show <id>

QUERIES
  find <title>                  exact title lookup
  search <text>                 ranked title search
  category <dimension> <value>  songs by artist, language or genre
  list <dimension>              every artist, language or genre

PLAYBACK
  play [all | <ids..> | <dimension> <value>]
  shuffle [all | <ids..> | <dimension> <value>]
  quick                         shuffle the whole catalog
  pause, resume, toggle, stop
  next, prev
  seek <secs | m:ss>
  vol <0-100>
  status

  help, quit";

/// Songs handed to a new playback session
#[derive(Debug, Clone, PartialEq)]
pub enum PlaySource {
    All,
    Ids(Vec<i64>),
    Category(Dimension, String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // Catalog
    Add(NewSong),
    Update(i64, SongUpdate),
    Delete(i64),
    Import(PathBuf),
    Show(i64),

    // Queries
    FindTitle(String),
    Search(String),
    Category(Dimension, String),
    ListDimension(Dimension),

    // Player Controls
    Start { source: PlaySource, shuffle: bool },
    QuickPlay,
    Resume,
    Pause,
    TogglePause,
    Stop,
    PlayNext,
    PlayPrev,
    Seek(f64),
    Volume(f32),
    Status,

    Help,
    Quit,
}
