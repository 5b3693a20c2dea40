//! Cancellable tab fetches
//!
//! Every load of a tab gets a new generation and aborts the fetches of the
//! previous one. A result is applied only if it belongs to the tab's
//! current generation, so the last filter set wins regardless of the order
//! responses arrive in.

use super::store::TabStore;
use super::tab::{EntityTab, Msg};
use crate::api::error::CatalogError;
use crate::api::models::Entity;
use crate::api::source::EntitySource;
use futures::FutureExt;
use futures::future::{AbortHandle, BoxFuture};
use log::{debug, warn};
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug)]
pub enum LoadOutcome {
    Data {
        key: u64,
        generation: u64,
        result: Result<Vec<Entity>, CatalogError>,
    },
    Count {
        key: u64,
        generation: u64,
        result: Result<u64, CatalogError>,
    },
}

impl LoadOutcome {
    pub fn key(&self) -> u64 {
        match self {
            LoadOutcome::Data { key, .. } | LoadOutcome::Count { key, .. } => *key,
        }
    }

    fn generation(&self) -> u64 {
        match self {
            LoadOutcome::Data { generation, .. } | LoadOutcome::Count { generation, .. } => *generation,
        }
    }
}

pub struct TabLoader {
    source: Arc<dyn EntitySource>,
    generations: HashMap<u64, u64>,
    in_flight: HashMap<u64, Vec<AbortHandle>>,
}

impl TabLoader {
    pub fn new(source: Arc<dyn EntitySource>) -> Self {
        Self {
            source,
            generations: HashMap::new(),
            in_flight: HashMap::new(),
        }
    }

    /// Abort whatever is still running for a tab
    pub fn cancel(&mut self, key: u64) {
        if let Some(handles) = self.in_flight.remove(&key) {
            debug!("Aborting {} in-flight fetches for tab {}", handles.len(), key);
            for handle in handles {
                handle.abort();
            }
        }
    }

    /// Forget a closed tab; its pending results will be dropped
    pub fn forget(&mut self, key: u64) {
        self.cancel(key);
        self.generations.remove(&key);
    }

    /// Start fetching a tab's rows, and its count if it has none. The
    /// returned futures own everything they need and can be spawned.
    pub fn start(&mut self, tab: &EntityTab) -> Vec<BoxFuture<'static, LoadOutcome>> {
        let key = tab.key;
        self.cancel(key);

        let generation = self.generations.get(&key).map_or(1, |g| g + 1);
        self.generations.insert(key, generation);

        let mut handles = Vec::new();
        let mut fetches = Vec::new();

        let (handle, registration) = AbortHandle::new_pair();
        handles.push(handle);
        let source = Arc::clone(&self.source);
        let filter = tab.filter.clone();
        fetches.push(
            async move {
                let result = source.get_entries(&filter, Some(registration)).await;
                LoadOutcome::Data { key, generation, result }
            }
            .boxed(),
        );

        if tab.count.is_none() {
            let (handle, registration) = AbortHandle::new_pair();
            handles.push(handle);
            let source = Arc::clone(&self.source);
            let filter = tab.filter.clone();
            fetches.push(
                async move {
                    let result = source.get_count(&filter, Some(registration)).await;
                    LoadOutcome::Count { key, generation, result }
                }
                .boxed(),
            );
        }

        self.in_flight.insert(key, handles);
        fetches
    }

    /// Whether an outcome belongs to the tab's current load
    pub fn is_current(&self, outcome: &LoadOutcome) -> bool {
        self.generations.get(&outcome.key()) == Some(&outcome.generation())
    }

    /// Apply a finished fetch to the store. Stale and cancelled results are
    /// dropped; count failures are only logged. Returns whether the store
    /// changed.
    pub fn apply(&mut self, store: &mut TabStore, outcome: LoadOutcome) -> bool {
        if !self.is_current(&outcome) {
            debug!("Dropping stale result for tab {}", outcome.key());
            return false;
        }

        let key = outcome.key();
        let msg = match outcome {
            LoadOutcome::Data { result: Err(e), .. } | LoadOutcome::Count { result: Err(e), .. }
                if e.is_cancelled() =>
            {
                return false;
            }
            LoadOutcome::Data { result: Ok(data), .. } => Msg::SetData(data),
            LoadOutcome::Data { result: Err(e), .. } => Msg::SetError(e.to_string()),
            LoadOutcome::Count { result: Ok(count), .. } => Msg::SetCount(count),
            LoadOutcome::Count { result: Err(e), .. } => {
                warn!("Count for tab {} failed: {}", key, e);
                return false;
            }
        };

        store.update(key, msg).is_some()
    }
}
