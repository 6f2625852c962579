mod app;
pub use app::Melodex;
