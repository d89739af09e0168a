pub mod board;
pub mod config;
pub mod filter;
pub mod task;

pub use board::*;
pub use config::*;
pub use filter::*;
pub use task::*;
