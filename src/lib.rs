pub mod api;
pub mod app;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod testing;

pub use app::{app, AppState};
