use crate::{CONFIG_DIRECTORY, database::DATABASE_FILENAME, expand_tilde, player::DEFAULT_VOLUME};
use anyhow::{Result, anyhow};
use log::LevelFilter;
use serde::Deserialize;
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "config.toml";
const DEFAULT_AUDIO_ROOT: &str = "data/audiofiles";

/// Raw contents of `config.toml`. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SettingsImport {
    database_path: Option<String>,
    audio_root: Option<String>,
    default_volume: Option<f32>,
    log_level: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub database_path: PathBuf,
    /// Directory holding `<title>.mp3` files for songs added without a path
    pub audio_root: PathBuf,
    /// Used until a volume has been saved to the database
    pub default_volume: f32,
    pub log_level: LevelFilter,
}

impl Default for Settings {
    fn default() -> Self {
        let database_path = dirs::config_dir()
            .map(|dir| dir.join(CONFIG_DIRECTORY).join(DATABASE_FILENAME))
            .unwrap_or_else(|| PathBuf::from(DATABASE_FILENAME));

        Settings {
            database_path,
            audio_root: PathBuf::from(DEFAULT_AUDIO_ROOT),
            default_volume: DEFAULT_VOLUME,
            log_level: LevelFilter::Info,
        }
    }
}

impl Settings {
    /// Read `<config dir>/Melodex/config.toml`, or use defaults when the file
    /// does not exist
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) if path.exists() => Self::load_from_file(path),
            _ => Ok(Settings::default()),
        }
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file_str = std::fs::read_to_string(path.as_ref())?;
        let import = toml::from_str::<SettingsImport>(&file_str)?;
        Self::try_from(&import)
    }

    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIRECTORY).join(CONFIG_FILE))
    }
}

impl TryFrom<&SettingsImport> for Settings {
    type Error = anyhow::Error;

    fn try_from(import: &SettingsImport) -> Result<Self> {
        let mut settings = Settings::default();

        if let Some(path) = &import.database_path {
            settings.database_path = expand_tilde(path)?;
        }
        if let Some(path) = &import.audio_root {
            settings.audio_root = expand_tilde(path)?;
        }
        if let Some(volume) = import.default_volume {
            if !(0.0..=1.0).contains(&volume) {
                return Err(anyhow!("default_volume must be between 0.0 and 1.0, got {volume}"));
            }
            settings.default_volume = volume;
        }
        if let Some(level) = &import.log_level {
            settings.log_level = level
                .parse::<LevelFilter>()
                .map_err(|_| anyhow!("Unknown log_level \"{level}\""))?;
        }

        Ok(settings)
    }
}
