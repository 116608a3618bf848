pub mod setup;

// Re-export main utilities for use by test files
#[allow(unused_imports)]
pub use setup::{
    match_entry, player_with_match, ranked_player, read_json, read_text, TestApp, TestAppBuilder,
    TEST_API_KEY,
};
