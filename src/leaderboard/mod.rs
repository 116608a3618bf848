// Public API - what other modules can use
pub use handlers::{overall_leaderboard, weekly_leaderboard};
pub use models::{OverallEntry, WeeklyEntry};

// Internal modules
mod handlers;
pub mod models;
pub mod service;

/// Maximum number of entries returned by either leaderboard.
pub const LEADERBOARD_SIZE: i64 = 10;
/// Width of the weekly leaderboard window in days.
pub const WEEKLY_WINDOW_DAYS: i64 = 7;
