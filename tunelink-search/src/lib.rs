//! Tunelink Search - Song lookup across music platforms

#![deny(missing_docs)]
#![deny(clippy::missing_errors_doc)]
#![deny(clippy::missing_panics_doc)]
#![warn(clippy::too_many_lines)]
//!
//! Finds a song on Deezer, resolves it across platforms through song.link,
//! scrapes DuckDuckGo as a fallback, and normalizes everything into one
//! web-link plus deep-link entry per platform.

pub mod assemble;
pub mod config;
pub mod errors;
pub mod extract;
pub mod normalize;
pub mod providers;
pub mod query;
pub mod service;
pub mod types;

// Re-export main types
pub use config::SearchConfig;
pub use errors::{LookupError, MISSING_QUERY_MESSAGE};
pub use providers::LinkProvider;
pub use query::SearchQuery;
pub use service::SongSearchService;
pub use types::{
    LinkResponse, Platform, PlatformEntry, PlatformLinkSet, PlatformUriSet, ProviderPayload,
    ProviderResult, SongLinkPayload,
};

/// Convenience type alias for Results with LookupError.
pub type Result<T> = std::result::Result<T, LookupError>;
