// Public API - what other modules can use
pub use handlers::{get_player, report_match, save_player};
pub use models::PlayerRecord;

// Internal modules
mod handlers;
pub mod history;
pub mod models;
mod processor;
pub mod repository;
pub mod service;
pub mod types;
