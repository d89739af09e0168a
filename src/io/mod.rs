pub mod board_io;
pub mod state;
pub mod watcher;
