//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! This module provides adapters for PostgreSQL-backed persistence:
//! - `PostgresDocumentStore` - JSONB-backed document collections

mod document_store;

pub use document_store::PostgresDocumentStore;
