//! Storage Adapters
//!
//! Process-local implementation of the DocumentStore port.
//!
//! ## Available Adapters
//!
//! - **InMemoryDocumentStore** - Keeps collections in memory (testing/development)
//!
//! The PostgreSQL-backed store lives in `adapters::postgres`.
//!
//! ## Usage
//!
//! ```ignore
//! use adapters::storage::InMemoryDocumentStore;
//!
//! let store = InMemoryDocumentStore::new();
//! ```

mod in_memory_document_store;

pub use in_memory_document_store::InMemoryDocumentStore;
