//! In-Memory Document Store Adapter
//!
//! Keeps every collection in process memory. Useful for testing and
//! development; contents are lost on restart.

use async_trait::async_trait;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering as AtomicOrdering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::exemption::Collection;
use crate::domain::foundation::DocumentId;
use crate::ports::{
    Document, DocumentStore, Fields, Filter, Query, SortDirection, StoreError, WriteBatch, WriteOp,
};

type Collections = HashMap<Collection, Vec<Document>>;

/// In-memory document store.
///
/// Documents keep insertion order, which is also the order of ties under
/// an order-by.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDocumentStore {
    collections: Arc<RwLock<Collections>>,
    unavailable: Arc<AtomicBool>,
    commits: Arc<AtomicUsize>,
}

impl InMemoryDocumentStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent operation fail with `StoreError::Unavailable`
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, AtomicOrdering::SeqCst);
    }

    /// Number of batches committed so far
    pub fn commit_count(&self) -> usize {
        self.commits.load(AtomicOrdering::SeqCst)
    }

    /// Snapshot of a collection, in insertion order
    pub async fn documents(&self, collection: Collection) -> Vec<Document> {
        self.collections
            .read()
            .await
            .get(&collection)
            .cloned()
            .unwrap_or_default()
    }

    /// Insert a document directly, bypassing batches (test fixtures)
    pub async fn insert(&self, collection: Collection, fields: Fields) -> DocumentId {
        let id = DocumentId::generate();
        self.collections
            .write()
            .await
            .entry(collection)
            .or_default()
            .push(Document::new(id.clone(), fields));
        id
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(AtomicOrdering::SeqCst) {
            return Err(StoreError::Unavailable(
                "in-memory store marked unavailable".to_string(),
            ));
        }
        Ok(())
    }
}

fn matches_all(filters: &[Filter], fields: &Fields) -> bool {
    filters.iter().all(|f| f.matches(fields))
}

/// Rank of a JSON type when values of different types are ordered.
fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => {
            let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

fn apply(collections: &mut Collections, op: WriteOp) -> Result<(), StoreError> {
    match op {
        WriteOp::Create {
            collection,
            id,
            fields,
        } => {
            let docs = collections.entry(collection).or_default();
            if docs.iter().any(|d| d.id == id) {
                return Err(StoreError::AlreadyExists { collection, id });
            }
            docs.push(Document::new(id, fields));
        }
        WriteOp::Update {
            collection,
            id,
            fields,
        } => {
            let doc = collections
                .get_mut(&collection)
                .and_then(|docs| docs.iter_mut().find(|d| d.id == id))
                .ok_or_else(|| StoreError::NotFound {
                    collection,
                    id: id.clone(),
                })?;
            doc.fields.extend(fields);
        }
        WriteOp::Delete { collection, id } => {
            let docs = collections.get_mut(&collection);
            let position = docs
                .as_ref()
                .and_then(|docs| docs.iter().position(|d| d.id == id));
            match (docs, position) {
                (Some(docs), Some(position)) => {
                    docs.remove(position);
                }
                _ => return Err(StoreError::NotFound { collection, id }),
            }
        }
    }
    Ok(())
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn query(
        &self,
        collection: Collection,
        query: &Query,
    ) -> Result<Vec<Document>, StoreError> {
        self.check_available()?;
        let collections = self.collections.read().await;
        let mut matched: Vec<&Document> = collections
            .get(&collection)
            .map(|docs| {
                docs.iter()
                    .filter(|d| matches_all(&query.filters, &d.fields))
                    .collect()
            })
            .unwrap_or_default();

        if let Some(order) = &query.order_by {
            // Documents without the ordering field are not returned
            matched.retain(|d| d.fields.contains_key(&order.field));
            matched.sort_by(|a, b| {
                let ord = compare_values(&a.fields[&order.field], &b.fields[&order.field]);
                match order.direction {
                    SortDirection::Ascending => ord,
                    SortDirection::Descending => ord.reverse(),
                }
            });
        }

        let limit = query.limit.unwrap_or(usize::MAX);
        Ok(matched
            .into_iter()
            .take(limit)
            .map(|d| Document::new(d.id.clone(), query.project(&d.fields)))
            .collect())
    }

    async fn count(&self, collection: Collection, filters: &[Filter]) -> Result<u64, StoreError> {
        self.check_available()?;
        let collections = self.collections.read().await;
        let count = collections
            .get(&collection)
            .map(|docs| docs.iter().filter(|d| matches_all(filters, &d.fields)).count())
            .unwrap_or(0);
        Ok(count as u64)
    }

    async fn create(
        &self,
        collection: Collection,
        fields: Fields,
    ) -> Result<DocumentId, StoreError> {
        self.check_available()?;
        Ok(self.insert(collection, fields).await)
    }

    async fn commit(&self, batch: WriteBatch) -> Result<(), StoreError> {
        self.check_available()?;
        let mut collections = self.collections.write().await;

        // Apply to a scratch copy so a failing op leaves the store untouched
        let mut scratch = collections.clone();
        for op in batch.into_ops() {
            apply(&mut scratch, op)?;
        }
        *collections = scratch;
        self.commits.fetch_add(1, AtomicOrdering::SeqCst);
        Ok(())
    }
}
