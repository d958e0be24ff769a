//! PostgreSQL implementation of DocumentStore.
//!
//! Every collection lives in the single `documents` table as JSONB rows
//! keyed by `(collection, id)`. Filters and ordering are evaluated on the
//! JSONB fields; projection is applied after fetching.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::postgres::{PgPoolOptions, Postgres};
use sqlx::types::Json;
use sqlx::{PgPool, QueryBuilder, Row};

use crate::config::StoreConfig;
use crate::domain::exemption::Collection;
use crate::domain::foundation::DocumentId;
use crate::ports::{
    Document, DocumentStore, Fields, Filter, FilterOp, Query, SortDirection, StoreError,
    WriteBatch, WriteOp,
};

/// Postgres error code for unique constraint violations.
const UNIQUE_VIOLATION: &str = "23505";

/// PostgreSQL implementation of DocumentStore.
#[derive(Clone)]
pub struct PostgresDocumentStore {
    pool: PgPool,
}

impl PostgresDocumentStore {
    /// Creates a new PostgresDocumentStore.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a connection pool from configuration.
    pub async fn connect(config: &StoreConfig) -> Result<Self, StoreError> {
        let url = config
            .database_url()
            .ok_or_else(|| StoreError::Unavailable("database URL not configured".to_string()))?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout())
            .connect(url)
            .await
            .map_err(map_sqlx_error)?;

        Ok(Self::new(pool))
    }

    /// Runs the embedded schema migrations.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(format!("Failed to run migrations: {}", e)))
    }
}

fn map_sqlx_error(err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Io(_) | sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
            StoreError::Unavailable(err.to_string())
        }
        other => StoreError::Backend(other.to_string()),
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.code().as_deref() == Some(UNIQUE_VIOLATION))
}

/// Appends `AND …` clauses for each filter. A field that is absent or JSON
/// null never matches.
fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, filters: &[Filter]) {
    for filter in filters {
        qb.push(" AND jsonb_typeof(data -> ")
            .push_bind(filter.field.clone())
            .push(") IS DISTINCT FROM 'null'")
            .push(" AND (data -> ")
            .push_bind(filter.field.clone())
            .push(") IS NOT NULL");

        let op = match filter.op {
            FilterOp::Equal => " = ",
            FilterOp::NotEqual => " <> ",
        };
        qb.push(" AND data -> ")
            .push_bind(filter.field.clone())
            .push(op)
            .push_bind(Json(filter.value.clone()));
    }
}

fn row_to_document(row: &sqlx::postgres::PgRow) -> Result<Document, StoreError> {
    let id: String = row.try_get("id").map_err(map_sqlx_error)?;
    let Json(data): Json<Value> = row.try_get("data").map_err(map_sqlx_error)?;
    match data {
        Value::Object(fields) => Ok(Document::new(DocumentId::from_raw(id), fields)),
        other => Err(StoreError::Serialization(format!(
            "document {} is not an object: {}",
            id, other
        ))),
    }
}

#[async_trait]
impl DocumentStore for PostgresDocumentStore {
    async fn query(
        &self,
        collection: Collection,
        query: &Query,
    ) -> Result<Vec<Document>, StoreError> {
        let mut qb = QueryBuilder::<Postgres>::new(
            "SELECT id, data FROM documents WHERE collection = ",
        );
        qb.push_bind(collection.name());
        push_filters(&mut qb, &query.filters);

        match &query.order_by {
            Some(order) => {
                qb.push(" AND (data -> ")
                    .push_bind(order.field.clone())
                    .push(") IS NOT NULL");
                let direction = match order.direction {
                    SortDirection::Ascending => " ASC",
                    SortDirection::Descending => " DESC",
                };
                qb.push(" ORDER BY data -> ")
                    .push_bind(order.field.clone())
                    .push(direction)
                    .push(", seq ASC");
            }
            None => {
                qb.push(" ORDER BY seq ASC");
            }
        }

        if let Some(limit) = query.limit {
            qb.push(" LIMIT ").push_bind(limit as i64);
        }

        let rows = qb
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        rows.iter()
            .map(|row| {
                let doc = row_to_document(row)?;
                Ok(Document::new(doc.id, query.project(&doc.fields)))
            })
            .collect()
    }

    async fn count(&self, collection: Collection, filters: &[Filter]) -> Result<u64, StoreError> {
        let mut qb =
            QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM documents WHERE collection = ");
        qb.push_bind(collection.name());
        push_filters(&mut qb, filters);

        let count: i64 = qb
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(count.max(0) as u64)
    }

    async fn create(
        &self,
        collection: Collection,
        fields: Fields,
    ) -> Result<DocumentId, StoreError> {
        let id = DocumentId::generate();
        sqlx::query("INSERT INTO documents (collection, id, data) VALUES ($1, $2, $3)")
            .bind(collection.name())
            .bind(id.as_str())
            .bind(Json(Value::Object(fields)))
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(id)
    }

    async fn commit(&self, batch: WriteBatch) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        for op in batch.into_ops() {
            match op {
                WriteOp::Create {
                    collection,
                    id,
                    fields,
                } => {
                    let result =
                        sqlx::query("INSERT INTO documents (collection, id, data) VALUES ($1, $2, $3)")
                            .bind(collection.name())
                            .bind(id.as_str())
                            .bind(Json(Value::Object(fields)))
                            .execute(&mut *tx)
                            .await;
                    match result {
                        Ok(_) => {}
                        Err(e) if is_unique_violation(&e) => {
                            return Err(StoreError::AlreadyExists { collection, id });
                        }
                        Err(e) => return Err(map_sqlx_error(e)),
                    }
                }
                WriteOp::Update {
                    collection,
                    id,
                    fields,
                } => {
                    let result = sqlx::query(
                        "UPDATE documents SET data = data || $3 WHERE collection = $1 AND id = $2",
                    )
                    .bind(collection.name())
                    .bind(id.as_str())
                    .bind(Json(Value::Object(fields)))
                    .execute(&mut *tx)
                    .await
                    .map_err(map_sqlx_error)?;

                    if result.rows_affected() == 0 {
                        return Err(StoreError::NotFound { collection, id });
                    }
                }
                WriteOp::Delete { collection, id } => {
                    let result =
                        sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
                            .bind(collection.name())
                            .bind(id.as_str())
                            .execute(&mut *tx)
                            .await
                            .map_err(map_sqlx_error)?;

                    if result.rows_affected() == 0 {
                        return Err(StoreError::NotFound { collection, id });
                    }
                }
            }
        }

        // Dropping `tx` on an early return rolls the batch back
        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(())
    }
}
