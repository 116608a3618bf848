// Public API - what other modules can use
pub use middleware::{require_api_key, API_KEY_HEADER};

// Internal modules
mod middleware;
