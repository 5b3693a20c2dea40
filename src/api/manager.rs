use super::client::CatalogClient;
use log::{debug, info, warn};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

/// Open catalog clients keyed by connection slot, with a periodic session
/// refresh so idle sessions do not expire.
#[derive(Clone, Default)]
pub struct ClientManager {
    clients: Arc<RwLock<BTreeMap<u32, CatalogClient>>>,
}

impl ClientManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, slot: u32, client: CatalogClient) {
        info!("Opening connection {} ({}@{})", slot, client.username(), client.server());
        self.clients.write().await.insert(slot, client);
    }

    pub async fn get(&self, slot: u32) -> Option<CatalogClient> {
        self.clients.read().await.get(&slot).cloned()
    }

    pub async fn remove(&self, slot: u32) -> Option<CatalogClient> {
        self.clients.write().await.remove(&slot)
    }

    pub async fn slots(&self) -> Vec<u32> {
        self.clients.read().await.keys().copied().collect()
    }

    /// Refresh every logged-in session. Failures are logged and otherwise
    /// ignored; returns how many refreshes succeeded.
    pub async fn refresh_all(&self) -> usize {
        let clients: Vec<(u32, CatalogClient)> = self
            .clients
            .read()
            .await
            .iter()
            .filter(|(_, client)| client.is_logged_in())
            .map(|(slot, client)| (*slot, client.clone()))
            .collect();

        let results = futures::future::join_all(
            clients.iter().map(|(_, client)| client.refresh()),
        )
        .await;

        let mut refreshed = 0;
        for ((slot, _), result) in clients.iter().zip(results) {
            match result {
                Ok(()) => refreshed += 1,
                Err(e) => warn!("Session refresh for connection {} failed: {}", slot, e),
            }
        }
        debug!("Refreshed {}/{} sessions", refreshed, clients.len());
        refreshed
    }

    /// Refresh all sessions every `interval` until the handle is aborted.
    /// The first refresh happens one interval after spawning.
    pub fn spawn_keeper(&self, interval: Duration) -> JoinHandle<()> {
        let manager = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                manager.refresh_all().await;
            }
        })
    }
}
