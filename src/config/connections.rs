//! Saved connections by slot
//!
//! Keys: `connection|<slot>|server`, `connection|<slot>|username`,
//! `connection|<slot>|sessionId` and `lastConnection`. One slot per
//! (server, username); logging out clears only the session id.

use super::storage::KeyValueStore;
use crate::api::models::Connection;
use anyhow::Result;
use log::{debug, info};
use std::collections::BTreeSet;

const PREFIX: &str = "connection";
const LAST_CONNECTION: &str = "lastConnection";

fn key(slot: u32, field: &str) -> String {
    format!("{PREFIX}|{slot}|{field}")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredConnection {
    pub slot: u32,
    pub server: String,
    pub username: String,
    pub session_id: Option<String>,
}

impl StoredConnection {
    /// The usable connection, if the slot still holds a session
    pub fn connection(&self) -> Option<Connection> {
        self.session_id.as_ref().map(|session_id| Connection {
            server: self.server.clone(),
            session_id: session_id.clone(),
            username: self.username.clone(),
        })
    }
}

pub struct ConnectionRepository<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> ConnectionRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    fn slots(&self) -> BTreeSet<u32> {
        self.store
            .keys()
            .iter()
            .filter_map(|key| {
                let mut parts = key.split('|');
                match (parts.next(), parts.next()) {
                    (Some(PREFIX), Some(slot)) => slot.parse().ok(),
                    _ => None,
                }
            })
            .collect()
    }

    pub fn get(&self, slot: u32) -> Option<StoredConnection> {
        Some(StoredConnection {
            slot,
            server: self.store.get(&key(slot, "server"))?,
            username: self.store.get(&key(slot, "username"))?,
            session_id: self
                .store
                .get(&key(slot, "sessionId"))
                .filter(|session_id| !session_id.is_empty()),
        })
    }

    pub fn list(&self) -> Vec<StoredConnection> {
        self.slots().into_iter().filter_map(|slot| self.get(slot)).collect()
    }

    pub fn find(&self, server: &str, username: &str) -> Option<u32> {
        self.list()
            .into_iter()
            .find(|stored| stored.server == server && stored.username == username)
            .map(|stored| stored.slot)
    }

    /// Store a connection, reusing the slot of the same server and user.
    /// The slot becomes the last connection.
    pub fn save(&mut self, connection: &Connection) -> Result<u32> {
        let slot = match self.find(&connection.server, &connection.username) {
            Some(slot) => slot,
            None => self.slots().last().map_or(1, |slot| slot + 1),
        };

        debug!("Saving connection {} to slot {}", connection.username, slot);
        self.store.set(&key(slot, "server"), &connection.server)?;
        self.store.set(&key(slot, "username"), &connection.username)?;
        self.store.set(&key(slot, "sessionId"), &connection.session_id)?;
        self.set_last_connection(slot)?;
        Ok(slot)
    }

    /// Clear the session of a slot, keeping server and username
    pub fn invalidate(&mut self, slot: u32) -> Result<()> {
        info!("Invalidating session of connection {}", slot);
        self.store.remove(&key(slot, "sessionId"))
    }

    /// Forget a slot entirely
    pub fn remove(&mut self, slot: u32) -> Result<()> {
        for field in ["server", "username", "sessionId"] {
            self.store.remove(&key(slot, field))?;
        }
        if self.last_connection() == Some(slot) {
            self.store.remove(LAST_CONNECTION)?;
        }
        Ok(())
    }

    pub fn last_connection(&self) -> Option<u32> {
        self.store.get(LAST_CONNECTION)?.parse().ok()
    }

    pub fn set_last_connection(&mut self, slot: u32) -> Result<()> {
        self.store.set(LAST_CONNECTION, &slot.to_string())
    }
}
