mod app;
mod config;
mod console;
mod effects;
mod logging;
mod persistence;
mod picker;
mod ui;

pub use app::run_app;
