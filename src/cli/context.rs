use crate::api::{CatalogClient, ClientConfig, ClientManager};
use crate::config::{Config, ConnectionRepository, FileStore};
use anyhow::{Context, Result};
use log::debug;
use tokio::task::JoinHandle;

/// Settings and saved connections shared by all commands
pub struct CliContext {
    pub config: Config,
    pub connections: ConnectionRepository<FileStore>,
    slot: Option<u32>,
}

impl CliContext {
    pub fn load(slot: Option<u32>) -> Result<Self> {
        let config = Config::load()?;
        let store = FileStore::open(Config::get_connections_path()?)?;
        Ok(Self::new(config, ConnectionRepository::new(store), slot))
    }

    pub fn new(config: Config, connections: ConnectionRepository<FileStore>, slot: Option<u32>) -> Self {
        Self {
            config,
            connections,
            slot,
        }
    }

    pub fn client_config(&self) -> ClientConfig {
        self.config.settings.client_config()
    }

    /// The requested slot, or the last used one
    pub fn slot(&self) -> Result<u32> {
        self.slot
            .or_else(|| self.connections.last_connection())
            .context("No connection selected. Log in first or pass --connection.")
    }

    /// A logged-in client for the selected slot
    pub fn client(&self) -> Result<(u32, CatalogClient)> {
        let slot = self.slot()?;
        let stored = self
            .connections
            .get(slot)
            .with_context(|| format!("Connection {} does not exist", slot))?;
        let connection = stored.connection().with_context(|| {
            format!(
                "Connection {} ({}@{}) is logged out. Log in again.",
                slot, stored.username, stored.server
            )
        })?;

        let client = CatalogClient::from_connection(&connection, &self.client_config())?;
        Ok((slot, client))
    }

    /// Keep the selected session alive while a command runs. Returns `None`
    /// when there is no logged-in connection to refresh.
    pub async fn start_keeper(&self) -> Option<JoinHandle<()>> {
        let (slot, client) = self.client().ok()?;
        let manager = ClientManager::new();
        manager.insert(slot, client).await;

        let interval = self.config.settings.refresh_interval();
        debug!("Refreshing connection {} every {:?}", slot, interval);
        Some(manager.spawn_keeper(interval))
    }
}
