//! TUI screens

mod library;
mod player;
mod study;

pub use library::LibraryScreen;
pub use player::PlayerScreen;
pub use study::StudyScreen;
