//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `http` - axum webhook application
//! - `postgres` - JSONB document store
//! - `storage` - in-memory document store

pub mod http;
pub mod postgres;
pub mod storage;

pub use http::app_router;
pub use postgres::PostgresDocumentStore;
pub use storage::InMemoryDocumentStore;
