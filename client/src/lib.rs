mod app;
mod assets;
mod controls;
mod dom;
mod export;
mod logging;
mod palette;
mod render;
mod state;
mod upload;

pub use app::run;
