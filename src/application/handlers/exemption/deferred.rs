//! Store writes the reply does not wait for.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::ports::{DocumentStore, WriteBatch};

/// Commits batches on a background task.
///
/// The reply goes out before the write lands, so readers may briefly see
/// the previous state. Failures are logged and otherwise dropped.
#[derive(Clone)]
pub struct DeferredWriter {
    store: Arc<dyn DocumentStore>,
}

impl DeferredWriter {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Spawns the commit. Callers normally drop the returned handle.
    pub fn commit(&self, label: &'static str, batch: WriteBatch) -> JoinHandle<()> {
        let store = Arc::clone(&self.store);
        tokio::spawn(async move {
            let writes = batch.len();
            match store.commit(batch).await {
                Ok(()) => debug!(write = label, writes, "Deferred write applied"),
                Err(e) => warn!(write = label, error = %e, "Deferred write failed"),
            }
        })
    }
}
