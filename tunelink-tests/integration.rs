//! Integration tests for Tunelink
//!
//! These tests verify the lookup pipeline across crates: the HTTP boundary
//! with mock providers, and the real provider clients against local
//! stand-ins for Deezer, song.link and DuckDuckGo.

#[path = "integration/support.rs"]
mod support;

#[path = "integration/search_endpoint.rs"]
mod search_endpoint;

#[path = "integration/provider_clients.rs"]
mod provider_clients;
