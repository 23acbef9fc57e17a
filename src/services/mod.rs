//! External service interactions
//!
//! - The names API client, live or backed by fixtures
//! - The query cache that runs fetches on background threads
//! - Per-endpoint query hooks built on top of it

pub mod api;
pub mod fixtures;
pub mod queries;
pub mod query_cache;

pub use api::{build_api, NamesApi};
pub use queries::Queries;
pub use query_cache::QueryState;
