//! API clients for external services
//!
//! - TMDB: movie/TV metadata, search, and external-id resolution
//! - Lookup: the local stream-lookup service (variants + captions)

pub mod lookup;
pub mod tmdb;

pub use lookup::LookupClient;
pub use tmdb::TmdbClient;
