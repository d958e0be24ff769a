//! SeedDatabaseHandler - Resets the store to the reference dataset.
//!
//! Every collection keeps exactly one sentinel row. Courses and subjects are
//! replaced wholesale by the reference dataset when their live row count
//! differs from it; students and requests are wiped. All writes of one run
//! go into a single batch, committed only when something was scheduled.

use std::sync::Arc;

use tracing::info;

use crate::domain::conversation::Reply;
use crate::domain::exemption::{
    Collection, Course, ExemptionRequest, ReferenceData, Student, Subject,
};
use crate::ports::{to_fields, DocumentStore, Fields, Filter, Query, StoreError, WriteBatch};

use super::error::HandlerError;

pub const DATABASE_RESTORED: &str = "Success! Database restored.";

/// Outcome of one reconciliation run.
#[derive(Debug, Clone)]
pub struct SeedDatabaseResult {
    pub reply: Reply,
    pub has_schedule: bool,
    pub scheduled_writes: usize,
}

/// Handler for the database reset intent.
pub struct SeedDatabaseHandler {
    store: Arc<dyn DocumentStore>,
    reference: Arc<ReferenceData>,
}

impl SeedDatabaseHandler {
    /// Reconciles against the catalogue compiled into the binary.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self::with_reference_data(store, ReferenceData::embedded().clone())
    }

    pub fn with_reference_data(store: Arc<dyn DocumentStore>, reference: ReferenceData) -> Self {
        Self {
            store,
            reference: Arc::new(reference),
        }
    }

    pub async fn handle(&self) -> Result<SeedDatabaseResult, HandlerError> {
        let mut batch = WriteBatch::new();

        for collection in Collection::ALL {
            self.schedule_sentinel(collection, &mut batch).await?;
            if collection.is_reference() {
                self.schedule_reference_reload(collection, &mut batch).await?;
            } else {
                self.schedule_wipe(collection, &mut batch).await?;
            }
        }

        let has_schedule = !batch.is_empty();
        let scheduled_writes = batch.len();
        if has_schedule {
            self.store.commit(batch).await?;
        }
        info!(has_schedule, scheduled_writes, "Database reconciliation finished");

        Ok(SeedDatabaseResult {
            reply: Reply::text(DATABASE_RESTORED),
            has_schedule,
            scheduled_writes,
        })
    }

    /// Keeps exactly one sentinel row: creates a missing one, deletes extras.
    async fn schedule_sentinel(
        &self,
        collection: Collection,
        batch: &mut WriteBatch,
    ) -> Result<(), StoreError> {
        let ids_only = Query::new()
            .filter(Filter::eq(collection.key_field(), collection.sentinel_key()))
            .select(&[]);
        let sentinels = self.store.query(collection, &ids_only).await?;
        if sentinels.is_empty() {
            batch.create(collection, sentinel_fields(collection)?);
            return Ok(());
        }

        if sentinels.len() > 1 {
            info!(
                collection = %collection,
                sentinels = sentinels.len(),
                "Removing duplicate sentinel rows"
            );
        }
        for extra in sentinels.into_iter().skip(1) {
            batch.delete(collection, extra.id);
        }
        Ok(())
    }

    async fn schedule_reference_reload(
        &self,
        collection: Collection,
        batch: &mut WriteBatch,
    ) -> Result<(), StoreError> {
        let rows = self.reference_rows(collection)?;
        let live = self
            .store
            .count(collection, &[non_sentinel(collection)])
            .await?;
        if live == rows.len() as u64 {
            return Ok(());
        }

        info!(
            collection = %collection,
            live,
            expected = rows.len(),
            "Reloading reference collection"
        );
        self.schedule_wipe(collection, batch).await?;
        for fields in rows {
            batch.create(collection, fields);
        }
        Ok(())
    }

    async fn schedule_wipe(
        &self,
        collection: Collection,
        batch: &mut WriteBatch,
    ) -> Result<(), StoreError> {
        let ids_only = Query::new().filter(non_sentinel(collection)).select(&[]);
        for doc in self.store.query(collection, &ids_only).await? {
            batch.delete(collection, doc.id);
        }
        Ok(())
    }

    fn reference_rows(&self, collection: Collection) -> Result<Vec<Fields>, StoreError> {
        match collection {
            Collection::Courses => self.reference.courses.iter().map(to_fields).collect(),
            Collection::Subjects => self.reference.subjects.iter().map(to_fields).collect(),
            Collection::Students | Collection::Requests => Ok(Vec::new()),
        }
    }
}

fn non_sentinel(collection: Collection) -> Filter {
    Filter::ne(collection.key_field(), collection.sentinel_key())
}

fn sentinel_fields(collection: Collection) -> Result<Fields, StoreError> {
    match collection {
        Collection::Students => to_fields(&Student::sentinel()),
        Collection::Courses => to_fields(&Course::sentinel()),
        Collection::Subjects => to_fields(&Subject::sentinel()),
        Collection::Requests => to_fields(&ExemptionRequest::sentinel()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::InMemoryDocumentStore;
    use crate::application::handlers::exemption::fixtures;

    fn small_reference() -> ReferenceData {
        ReferenceData {
            courses: vec![Course::new("BCC", "Computer Science")],
            subjects: fixtures::subjects("BCC", 4),
        }
    }

    fn handler(store: &InMemoryDocumentStore) -> SeedDatabaseHandler {
        SeedDatabaseHandler::with_reference_data(Arc::new(store.clone()), small_reference())
    }

    async fn count(store: &InMemoryDocumentStore, collection: Collection) -> usize {
        store.documents(collection).await.len()
    }

    #[tokio::test]
    async fn empty_store_gets_sentinels_and_reference_data() {
        let store = InMemoryDocumentStore::new();

        let result = handler(&store).handle().await.unwrap();

        assert!(result.has_schedule);
        assert_eq!(result.scheduled_writes, 4 + 1 + 4);
        assert_eq!(result.reply.joined(), DATABASE_RESTORED);
        assert_eq!(count(&store, Collection::Students).await, 1);
        assert_eq!(count(&store, Collection::Courses).await, 2);
        assert_eq!(count(&store, Collection::Subjects).await, 5);
        assert_eq!(count(&store, Collection::Requests).await, 1);
        assert_eq!(store.commit_count(), 1);
    }

    #[tokio::test]
    async fn second_run_schedules_nothing() {
        let store = InMemoryDocumentStore::new();
        handler(&store).handle().await.unwrap();

        let second = handler(&store).handle().await.unwrap();

        assert!(!second.has_schedule);
        assert_eq!(second.scheduled_writes, 0);
        assert_eq!(second.reply.joined(), DATABASE_RESTORED);
        assert_eq!(store.commit_count(), 1);
    }

    #[tokio::test]
    async fn transactional_rows_are_wiped_but_sentinels_stay() {
        let store = InMemoryDocumentStore::new();
        handler(&store).handle().await.unwrap();
        fixtures::insert_request(&store, "A1", "2023-01-01T00:00:00.000000Z", "ABERTA").await;
        fixtures::insert_request(&store, "B2", "2023-01-02T00:00:00.000000Z", "DEFERIDA").await;

        let result = handler(&store).handle().await.unwrap();

        assert_eq!(result.scheduled_writes, 2);
        let requests = store.documents(Collection::Requests).await;
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].get_str("MATRICULA"), Some("MATRICULA_MOCK"));
    }

    #[tokio::test]
    async fn drifted_reference_collection_is_reloaded() {
        let store = InMemoryDocumentStore::new();
        handler(&store).handle().await.unwrap();
        let extra = Course::new("EST", "Statistics");
        store
            .insert(Collection::Courses, to_fields(&extra).unwrap())
            .await;

        let result = handler(&store).handle().await.unwrap();

        // two deletes, one create
        assert_eq!(result.scheduled_writes, 3);
        let codes: Vec<_> = store
            .documents(Collection::Courses)
            .await
            .iter()
            .filter_map(|d| d.get_str("ID_CURSO").map(str::to_string))
            .collect();
        assert_eq!(codes, vec!["CURSO_MOCK", "BCC"]);
    }

    #[tokio::test]
    async fn duplicate_sentinels_collapse_to_one() {
        let store = InMemoryDocumentStore::new();
        handler(&store).handle().await.unwrap();
        store
            .insert(Collection::Courses, to_fields(&Course::sentinel()).unwrap())
            .await;
        store
            .insert(Collection::Courses, to_fields(&Course::sentinel()).unwrap())
            .await;

        let result = handler(&store).handle().await.unwrap();

        assert_eq!(result.scheduled_writes, 2);
        let sentinels = store
            .documents(Collection::Courses)
            .await
            .into_iter()
            .filter(|d| d.get_str("ID_CURSO") == Some("CURSO_MOCK"))
            .count();
        assert_eq!(sentinels, 1);
        assert_eq!(count(&store, Collection::Courses).await, 2);
    }

    #[tokio::test]
    async fn store_failure_commits_nothing() {
        let store = InMemoryDocumentStore::new();
        store.set_unavailable(true);

        let result = handler(&store).handle().await;

        assert!(matches!(result, Err(HandlerError::Store(_))));
        assert_eq!(store.commit_count(), 0);
    }

    #[test]
    fn embedded_catalogue_is_the_default() {
        let handler = SeedDatabaseHandler::new(Arc::new(InMemoryDocumentStore::new()));
        assert_eq!(handler.reference.subjects.len(), 79);
    }
}
