use anyhow::{Result, anyhow};
use std::{
    path::{Path, PathBuf},
    time::Duration,
};

pub mod app_core;
pub mod database;
pub mod domain;
pub mod error;
pub mod library;
pub mod player;
pub mod settings;
pub mod shell;

pub use database::Database;
pub use error::{CatalogError, CatalogResult};
pub use library::Library;
pub use player::PlayerHandle;
pub use settings::Settings;

pub const CONFIG_DIRECTORY: &str = "Melodex";

// ~30fps
pub const REFRESH_RATE: Duration = Duration::from_millis(33);

/// `m:ss`, as shown on the status line
pub fn get_readable_duration(duration: Duration) -> String {
    let mut secs = duration.as_secs();
    let mins = secs / 60;
    secs %= 60;

    format!("{mins}:{secs:02}")
}

/// Replace a leading `~` with the user's home directory
pub fn expand_tilde<P: AsRef<Path>>(path: P) -> Result<PathBuf> {
    let path = path.as_ref();

    let Ok(rest) = path.strip_prefix("~") else {
        return Ok(path.to_path_buf());
    };

    let home = dirs::home_dir().ok_or_else(|| anyhow!("Could not determine home directory!"))?;
    Ok(home.join(rest))
}
