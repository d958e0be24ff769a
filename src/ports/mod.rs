//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `DocumentStore` - Collections of courses, subjects, students and requests

mod document_store;

pub use document_store::{
    to_fields, Document, DocumentStore, Fields, Filter, FilterOp, OrderBy, Query, SortDirection,
    StoreError, WriteBatch, WriteOp,
};
