//! HTTP request handlers organized by functionality

pub mod api;

// Re-export handler functions
pub use api::{ApiError, HealthResponse, api_health, api_search};
