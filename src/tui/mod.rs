mod app;
mod input;
mod render;
mod theme;

pub use app::run;
