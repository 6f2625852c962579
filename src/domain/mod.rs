mod canonical;
mod dimension;
mod song;

pub use canonical::format_text;
pub use dimension::Dimension;
pub use song::{NewSong, SearchHit, SongRecord, SongUpdate};

pub trait SongInfo {
    fn get_id(&self) -> i64;
    fn get_title(&self) -> &str;
    fn get_artist(&self) -> &str;

    fn display_line(&self) -> String {
        format!("[{}] {} - {}", self.get_id(), self.get_title(), self.get_artist())
    }
}
