//! Chunked concurrent bulk work
//!
//! Items run in chunks; every item in a chunk starts at once and the next
//! chunk waits for the whole chunk. Each item gets the bulk retry policy;
//! a cancelled item is never retried.

use crate::api::client::CatalogClient;
use crate::api::error::CatalogError;
use crate::api::models::{Entity, reference};
use crate::api::resilience::{BulkConfig, RetryPolicy};
use log::{debug, info, warn};
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::entity::save_creation;

/// Live success/failure counters, readable while the bulk run is going
#[derive(Debug, Default)]
pub struct BulkProgress {
    succeeded: AtomicUsize,
    failed: AtomicUsize,
}

impl BulkProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn succeeded(&self) -> usize {
        self.succeeded.load(Ordering::Relaxed)
    }

    pub fn failed(&self) -> usize {
        self.failed.load(Ordering::Relaxed)
    }

    pub fn done(&self) -> usize {
        self.succeeded() + self.failed()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BulkFailure {
    /// Position of the item in the input
    pub index: usize,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BulkOutcome<T> {
    pub succeeded: Vec<T>,
    pub failures: Vec<BulkFailure>,
}

impl<T> Default for BulkOutcome<T> {
    fn default() -> Self {
        Self {
            succeeded: Vec::new(),
            failures: Vec::new(),
        }
    }
}

impl<T> BulkOutcome<T> {
    pub fn is_complete_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failures.len()
    }
}

/// Run `operation` over every item in chunks of `config.chunk_size`
pub async fn run_bulk<I, T, F, Fut>(
    items: Vec<I>,
    config: &BulkConfig,
    progress: Option<&BulkProgress>,
    operation: F,
) -> BulkOutcome<T>
where
    I: Clone,
    F: Fn(I) -> Fut,
    Fut: Future<Output = Result<T, CatalogError>>,
{
    let policy = RetryPolicy::new(config.item_retry.clone());
    let chunk_size = config.chunk_size.max(1);
    let mut outcome = BulkOutcome::default();

    for (chunk_index, chunk) in items.chunks(chunk_size).enumerate() {
        debug!("Bulk chunk {} ({} items)", chunk_index, chunk.len());

        let results = futures::future::join_all(chunk.iter().map(|item| {
            policy.execute_if(|| operation(item.clone()), |e| !e.is_cancelled())
        }))
        .await;

        for (offset, result) in results.into_iter().enumerate() {
            match result {
                Ok(value) => {
                    outcome.succeeded.push(value);
                    if let Some(progress) = progress {
                        progress.succeeded.fetch_add(1, Ordering::Relaxed);
                    }
                }
                Err(e) => {
                    let index = chunk_index * chunk_size + offset;
                    warn!("Bulk item {} failed: {}", index, e);
                    outcome.failures.push(BulkFailure {
                        index,
                        message: e.to_string(),
                    });
                    if let Some(progress) = progress {
                        progress.failed.fetch_add(1, Ordering::Relaxed);
                    }
                }
            }
        }
    }

    info!(
        "Bulk run finished: {} succeeded, {} failed",
        outcome.succeeded.len(),
        outcome.failures.len()
    );
    outcome
}

/// Delete entities one request per id
pub async fn delete_entities(
    client: &CatalogClient,
    entity_type: &str,
    ids: &[i64],
    config: &BulkConfig,
    progress: Option<&BulkProgress>,
) -> BulkOutcome<i64> {
    run_bulk(ids.to_vec(), config, progress, |id| async move {
        client.delete_entities(entity_type, &[id]).await?;
        Ok::<_, CatalogError>(id)
    })
    .await
}

/// Create entities from drafts, returning the stored versions
pub async fn create_entities(
    client: &CatalogClient,
    entity_type: &str,
    drafts: Vec<Entity>,
    config: &BulkConfig,
    progress: Option<&BulkProgress>,
) -> BulkOutcome<Entity> {
    run_bulk(drafts, config, progress, |draft| async move {
        save_creation(client, entity_type, &draft).await
    })
    .await
}

/// Point a to-one relation of each entity at `target_id`
pub async fn move_entities(
    client: &CatalogClient,
    entity_type: &str,
    ids: &[i64],
    field: &str,
    target_id: i64,
    config: &BulkConfig,
    progress: Option<&BulkProgress>,
) -> BulkOutcome<i64> {
    run_bulk(ids.to_vec(), config, progress, |id| async move {
        let mut update = Entity::new();
        update.insert("id".to_string(), id.into());
        update.insert(field.to_string(), reference(target_id));
        client.write_entity(entity_type, &update).await?;
        Ok::<_, CatalogError>(id)
    })
    .await
}
