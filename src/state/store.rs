use super::tab::{Command, EntityTab, Msg};
use crate::api::TableFilter;
use log::debug;
use std::collections::BTreeMap;

/// Open tabs of one connection, in opening order
#[derive(Debug, Default)]
pub struct TabStore {
    tabs: Vec<EntityTab>,
    focused: Option<u64>,
    next_key: u64,
}

impl TabStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a tab for `filter`, or focus the tab already showing an equal
    /// filter. Returns the tab key and whether a new tab was created.
    pub fn open(&mut self, filter: TableFilter) -> (u64, bool) {
        if let Some(existing) = self.tabs.iter().find(|tab| tab.filter == filter) {
            let key = existing.key;
            debug!("Focusing existing tab {} for {}", key, filter.table);
            self.focused = Some(key);
            return (key, false);
        }

        let key = self.next_key;
        self.next_key += 1;
        debug!("Opening tab {} for {}", key, filter.table);
        self.tabs.push(EntityTab::new(key, filter));
        self.focused = Some(key);
        (key, true)
    }

    /// Close a tab; focus moves to its neighbour
    pub fn close(&mut self, key: u64) -> Option<EntityTab> {
        let index = self.tabs.iter().position(|tab| tab.key == key)?;
        let tab = self.tabs.remove(index);

        if self.focused == Some(key) {
            self.focused = self
                .tabs
                .get(index)
                .or_else(|| index.checked_sub(1).and_then(|i| self.tabs.get(i)))
                .map(|tab| tab.key);
        }
        Some(tab)
    }

    pub fn focus(&mut self, key: u64) -> bool {
        if self.get(key).is_some() {
            self.focused = Some(key);
            true
        } else {
            false
        }
    }

    pub fn focused(&self) -> Option<&EntityTab> {
        self.focused.and_then(|key| self.get(key))
    }

    pub fn get(&self, key: u64) -> Option<&EntityTab> {
        self.tabs.iter().find(|tab| tab.key == key)
    }

    pub fn tabs(&self) -> &[EntityTab] {
        &self.tabs
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    /// Apply a message to one tab; `None` if the tab is gone
    pub fn update(&mut self, key: u64, msg: Msg) -> Option<Command> {
        self.tabs
            .iter_mut()
            .find(|tab| tab.key == key)
            .map(|tab| tab.update(msg))
    }
}

/// Per-connection tab stores, keyed by connection slot
#[derive(Debug, Default)]
pub struct AppState {
    connections: BTreeMap<u32, TabStore>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// The store for a slot, created on first use
    pub fn store(&mut self, slot: u32) -> &mut TabStore {
        self.connections.entry(slot).or_default()
    }

    pub fn get(&self, slot: u32) -> Option<&TabStore> {
        self.connections.get(&slot)
    }

    pub fn remove(&mut self, slot: u32) -> Option<TabStore> {
        self.connections.remove(&slot)
    }

    pub fn slots(&self) -> impl Iterator<Item = u32> + '_ {
        self.connections.keys().copied()
    }
}
