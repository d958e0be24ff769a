//! Document store port.
//!
//! Defines the contract the query handlers use to read and write the
//! schema-less exemption collections. Implementations translate these
//! queries onto a concrete engine.
//!
//! # Design
//!
//! - **Filtered reads**: equality / inequality filters, one order-by, projection, limit
//! - **Aggregates**: row counts under the same filters
//! - **Atomic batches**: creates, updates and deletes applied all-or-nothing

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::domain::exemption::Collection;
use crate::domain::foundation::DocumentId;

/// Field map of a stored document.
pub type Fields = Map<String, Value>;

/// Errors that can occur during document store operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    #[error("Document store unavailable: {0}")]
    Unavailable(String),

    #[error("Document {id} not found in {collection}")]
    NotFound {
        collection: Collection,
        id: DocumentId,
    },

    #[error("Document {id} already exists in {collection}")]
    AlreadyExists {
        collection: Collection,
        id: DocumentId,
    },

    #[error("Failed to (de)serialize document: {0}")]
    Serialization(String),

    #[error("Document store error: {0}")]
    Backend(String),
}

/// Serializes an entity into a stored field map.
pub fn to_fields<T: Serialize>(value: &T) -> Result<Fields, StoreError> {
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(StoreError::Serialization(format!(
            "expected an object, got {}",
            other
        ))),
        Err(e) => Err(StoreError::Serialization(e.to_string())),
    }
}

/// A stored document: its identifier and (possibly projected) fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: DocumentId,
    pub fields: Fields,
}

impl Document {
    pub fn new(id: DocumentId, fields: Fields) -> Self {
        Self { id, fields }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.fields.get(field).and_then(Value::as_str)
    }

    /// Deserializes the fields into an entity.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, StoreError> {
        serde_json::from_value(Value::Object(self.fields.clone()))
            .map_err(|e| StoreError::Serialization(format!("document {}: {}", self.id, e)))
    }
}

/// Comparison applied by a filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Equal,
    NotEqual,
}

/// A single-field filter.
///
/// Documents that lack the field never match, for either operator.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub field: String,
    pub op: FilterOp,
    pub value: Value,
}

impl Filter {
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            op: FilterOp::Equal,
            value: value.into(),
        }
    }

    pub fn ne(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            op: FilterOp::NotEqual,
            value: value.into(),
        }
    }

    /// Evaluates the filter against a field map.
    pub fn matches(&self, fields: &Fields) -> bool {
        match (fields.get(&self.field), self.op) {
            (None, _) | (Some(Value::Null), _) => false,
            (Some(actual), FilterOp::Equal) => *actual == self.value,
            (Some(actual), FilterOp::NotEqual) => *actual != self.value,
        }
    }
}

/// Sort direction of an order-by clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Single-field ordering.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    pub field: String,
    pub direction: SortDirection,
}

/// Filtered, ordered, projected and limited lookup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub filters: Vec<Filter>,
    pub order_by: Option<OrderBy>,
    /// `None` returns every field; `Some(vec![])` returns identifiers only.
    pub select: Option<Vec<String>>,
    pub limit: Option<usize>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn order_by(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.order_by = Some(OrderBy {
            field: field.into(),
            direction,
        });
        self
    }

    pub fn select(mut self, fields: &[&str]) -> Self {
        self.select = Some(fields.iter().map(|f| f.to_string()).collect());
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Applies the projection to a full field map.
    pub fn project(&self, fields: &Fields) -> Fields {
        match &self.select {
            None => fields.clone(),
            Some(selected) => fields
                .iter()
                .filter(|(k, _)| selected.iter().any(|s| s == *k))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        }
    }
}

/// One queued write.
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOp {
    Create {
        collection: Collection,
        id: DocumentId,
        fields: Fields,
    },
    /// Merges `fields` into an existing document.
    Update {
        collection: Collection,
        id: DocumentId,
        fields: Fields,
    },
    Delete {
        collection: Collection,
        id: DocumentId,
    },
}

/// Writes committed atomically by [`DocumentStore::commit`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WriteBatch {
    ops: Vec<WriteOp>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a create and returns the identifier the document will get.
    pub fn create(&mut self, collection: Collection, fields: Fields) -> DocumentId {
        let id = DocumentId::generate();
        self.ops.push(WriteOp::Create {
            collection,
            id: id.clone(),
            fields,
        });
        id
    }

    pub fn update(&mut self, collection: Collection, id: DocumentId, fields: Fields) {
        self.ops.push(WriteOp::Update {
            collection,
            id,
            fields,
        });
    }

    pub fn delete(&mut self, collection: Collection, id: DocumentId) {
        self.ops.push(WriteOp::Delete { collection, id });
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn into_ops(self) -> Vec<WriteOp> {
        self.ops
    }
}

/// Port for the document store holding courses, subjects, students and
/// exemption requests.
///
/// Implementations must be safe to share across concurrent requests.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Runs a query against a collection.
    ///
    /// # Errors
    ///
    /// - `Unavailable` when the backend cannot be reached
    /// - `Backend` on any other engine failure
    async fn query(&self, collection: Collection, query: &Query)
        -> Result<Vec<Document>, StoreError>;

    /// Counts the documents matching every filter.
    async fn count(&self, collection: Collection, filters: &[Filter]) -> Result<u64, StoreError>;

    /// Creates a single document and returns its generated identifier.
    async fn create(&self, collection: Collection, fields: Fields)
        -> Result<DocumentId, StoreError>;

    /// Applies every queued write, or none of them.
    ///
    /// # Errors
    ///
    /// - `NotFound` when an update or delete targets a missing document
    /// - `AlreadyExists` when a create reuses an identifier
    async fn commit(&self, batch: WriteBatch) -> Result<(), StoreError>;
}
