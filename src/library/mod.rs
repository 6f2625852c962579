mod import;
mod library;

pub use import::ImportReport;
pub use library::Library;

pub(crate) const DEFAULT_EXTENSION: &str = "mp3";
pub(crate) const VOLUME_KEY: &str = "volume";
