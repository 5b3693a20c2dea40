//! One open table of one entity type
//!
//! The tab holds the last fetched page and three pending-change layers over
//! it: ids marked for deletion, drafts awaiting creation and per-id field
//! overlays. The fetched rows are never edited in place; `display_row`
//! merges an overlay on read.

use crate::api::TableFilter;
use crate::api::models::{Entity, entity_id, field_values_equal};
use log::{debug, warn};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet, HashSet};

pub const NO_ENTRIES: &str = "No entries.";
pub const LOADING: &str = "Loading...";

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    EditFilter(TableFilter),
    /// Same field and direction again clears the sort
    Sort { field: String, asc: bool },
    Refresh,
    SetData(Vec<Entity>),
    SetError(String),
    SetCount(u64),
    MarkDelete(i64),
    CancelDeletes(Vec<i64>),
    SyncDeletes(Vec<i64>),
    AddCreation,
    CancelCreations(Vec<usize>),
    EditCreation { index: usize, field: String, value: Value },
    SyncCreation { index: usize, entity: Entity },
    EditEntity { id: i64, field: String, value: Value },
    CancelModifications(i64),
    SyncModification(Entity),
    ToggleShowAllColumns,
}

/// What the owner of the tab has to do after an update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    None,
    /// The rows (and possibly the count) are gone and must be fetched
    Reload,
}

#[derive(Debug, Clone)]
pub struct EntityTab {
    pub key: u64,
    pub filter: TableFilter,
    pub data: Option<Vec<Entity>>,
    pub err_msg: Option<String>,
    /// Total rows for the filter, ignoring paging
    pub count: Option<u64>,
    pub deletions: BTreeSet<i64>,
    pub creations: Vec<Entity>,
    pub modifications: BTreeMap<i64, Entity>,
    pub show_all_columns: bool,
}

impl EntityTab {
    pub fn new(key: u64, filter: TableFilter) -> Self {
        Self {
            key,
            filter,
            data: None,
            err_msg: None,
            count: None,
            deletions: BTreeSet::new(),
            creations: Vec::new(),
            modifications: BTreeMap::new(),
            show_all_columns: false,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.data.is_none() && self.err_msg.is_none()
    }

    /// Text to show instead of rows, if rows cannot be shown
    pub fn placeholder(&self) -> Option<&str> {
        match (&self.data, &self.err_msg) {
            (_, Some(err)) => Some(err),
            (None, None) => Some(LOADING),
            (Some(data), None) if data.is_empty() => Some(NO_ENTRIES),
            _ => None,
        }
    }

    fn clear_results(&mut self) {
        self.data = None;
        self.err_msg = None;
    }

    fn find_row(&self, id: i64) -> Option<&Entity> {
        self.data
            .as_ref()?
            .iter()
            .find(|entity| entity_id(entity) == Some(id))
    }

    /// A fetched row with its pending modification applied
    pub fn display_row(&self, entity: &Entity) -> Entity {
        let mut merged = entity.clone();
        if let Some(overlay) = entity_id(entity).and_then(|id| self.modifications.get(&id)) {
            for (field, value) in overlay {
                merged.insert(field.clone(), value.clone());
            }
        }
        merged
    }

    pub fn display_rows(&self) -> Option<Vec<Entity>> {
        self.data
            .as_ref()
            .map(|data| data.iter().map(|entity| self.display_row(entity)).collect())
    }

    pub fn has_pending_changes(&self) -> bool {
        !self.deletions.is_empty() || !self.creations.is_empty() || !self.modifications.is_empty()
    }

    fn edit_filter(&mut self, filter: TableFilter) {
        if filter.table != self.filter.table {
            self.deletions.clear();
            self.creations.clear();
            self.modifications.clear();
        }
        if filter.table != self.filter.table || filter.where_input() != self.filter.where_input() {
            self.count = None;
        }
        self.filter = filter;
        self.clear_results();
    }

    fn sort(&mut self, field: String, asc: bool) {
        let same = self.filter.sort_field.as_deref() == Some(field.as_str())
            && self.filter.sort_asc == Some(asc);

        if same {
            self.filter.sort_field = None;
            self.filter.sort_asc = None;
        } else {
            self.filter.sort_field = Some(field);
            self.filter.sort_asc = Some(asc);
        }
        self.clear_results();
    }

    fn edit_entity(&mut self, id: i64, field: String, value: Value) {
        if let Some(data) = &self.data {
            let present: HashSet<i64> = data.iter().filter_map(entity_id).collect();
            self.modifications.retain(|id, _| present.contains(id));
        }

        let reverts = match (&self.data, self.find_row(id)) {
            (Some(_), Some(original)) => {
                field_values_equal(original.get(&field).unwrap_or(&Value::Null), &value)
            }
            (Some(_), None) => {
                warn!("Ignoring edit of {} on {} {}: not in the current page", field, self.filter.table, id);
                return;
            }
            (None, _) => false,
        };

        if reverts {
            if let Some(overlay) = self.modifications.get_mut(&id) {
                overlay.remove(&field);
                if overlay.is_empty() {
                    self.modifications.remove(&id);
                }
            }
        } else {
            self.modifications.entry(id).or_default().insert(field, value);
        }
    }

    /// Apply a message and report whether a reload is needed
    pub fn update(&mut self, msg: Msg) -> Command {
        match msg {
            Msg::EditFilter(filter) => {
                self.edit_filter(filter);
                Command::Reload
            }
            Msg::Sort { field, asc } => {
                self.sort(field, asc);
                Command::Reload
            }
            Msg::Refresh => {
                self.clear_results();
                self.count = None;
                Command::Reload
            }
            Msg::SetData(data) => {
                self.data = Some(data);
                self.err_msg = None;
                Command::None
            }
            Msg::SetError(message) => {
                self.err_msg = Some(message);
                self.data = None;
                Command::None
            }
            Msg::SetCount(count) => {
                self.count = Some(count);
                Command::None
            }
            Msg::MarkDelete(id) => {
                self.deletions.insert(id);
                Command::None
            }
            Msg::CancelDeletes(ids) => {
                for id in ids {
                    self.deletions.remove(&id);
                }
                Command::None
            }
            Msg::SyncDeletes(ids) => {
                let removed: HashSet<i64> = ids.into_iter().collect();
                if let Some(data) = &mut self.data {
                    data.retain(|entity| !entity_id(entity).is_some_and(|id| removed.contains(&id)));
                }
                self.deletions.retain(|id| !removed.contains(id));
                for id in &removed {
                    self.modifications.remove(id);
                }
                if let Some(count) = &mut self.count {
                    *count = count.saturating_sub(removed.len() as u64);
                }
                Command::None
            }
            Msg::AddCreation => {
                self.creations.push(Entity::new());
                Command::None
            }
            Msg::CancelCreations(mut indices) => {
                indices.sort_unstable();
                indices.dedup();
                for index in indices.into_iter().rev() {
                    if index < self.creations.len() {
                        self.creations.remove(index);
                    }
                }
                Command::None
            }
            Msg::EditCreation { index, field, value } => {
                match self.creations.get_mut(index) {
                    Some(draft) => {
                        draft.insert(field, value);
                    }
                    None => warn!("No draft {} to edit on {}", index, self.filter.table),
                }
                Command::None
            }
            Msg::SyncCreation { index, entity } => {
                if index >= self.creations.len() {
                    warn!("No draft {} to sync on {}", index, self.filter.table);
                    return Command::None;
                }
                self.creations.remove(index);
                if let Some(data) = &mut self.data {
                    data.insert(0, entity);
                }
                if let Some(count) = &mut self.count {
                    *count += 1;
                }
                Command::None
            }
            Msg::EditEntity { id, field, value } => {
                self.edit_entity(id, field, value);
                Command::None
            }
            Msg::CancelModifications(id) => {
                self.modifications.remove(&id);
                Command::None
            }
            Msg::SyncModification(entity) => {
                match entity_id(&entity) {
                    Some(id) => {
                        self.modifications.remove(&id);
                        if let Some(row) = self
                            .data
                            .as_mut()
                            .and_then(|data| data.iter_mut().find(|row| entity_id(row) == Some(id)))
                        {
                            *row = entity;
                        } else {
                            debug!("Saved {} {} is not on the current page", self.filter.table, id);
                        }
                    }
                    None => warn!("Ignoring saved {} without an id", self.filter.table),
                }
                Command::None
            }
            Msg::ToggleShowAllColumns => {
                self.show_all_columns = !self.show_all_columns;
                Command::None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entity(value: Value) -> Entity {
        value.as_object().cloned().unwrap()
    }

    fn loaded_tab() -> EntityTab {
        let mut tab = EntityTab::new(1, TableFilter::new("Dataset").with_limit(50));
        tab.update(Msg::SetData(vec![
            entity(json!({"id": 1, "name": "a", "investigation": {"id": 10}})),
            entity(json!({"id": 2, "name": "b", "investigation": {"id": 10}})),
        ]));
        tab
    }

    fn edit(tab: &mut EntityTab, id: i64, field: &str, value: Value) {
        tab.update(Msg::EditEntity { id, field: field.to_string(), value });
    }

    #[test]
    fn test_data_and_error_are_exclusive() {
        let mut tab = loaded_tab();
        tab.update(Msg::SetError("400: bad".to_string()));
        assert!(tab.data.is_none());
        assert_eq!(tab.placeholder(), Some("400: bad"));

        tab.update(Msg::SetData(Vec::new()));
        assert!(tab.err_msg.is_none());
        assert_eq!(tab.placeholder(), Some(NO_ENTRIES));
    }

    #[test]
    fn test_edit_filter_forces_reload() {
        let mut tab = loaded_tab();
        tab.update(Msg::SetCount(2));

        let command = tab.update(Msg::EditFilter(tab.filter.clone().with_where("name = 'a'")));
        assert_eq!(command, Command::Reload);
        assert!(tab.is_loading());
        assert_eq!(tab.placeholder(), Some(LOADING));
        assert_eq!(tab.count, None);
    }

    #[test]
    fn test_page_change_keeps_count() {
        let mut tab = loaded_tab();
        tab.update(Msg::SetCount(120));
        tab.update(Msg::EditFilter(tab.filter.next_page()));
        assert_eq!(tab.count, Some(120));
        assert!(tab.is_loading());
    }

    #[test]
    fn test_table_change_drops_pending_changes() {
        let mut tab = loaded_tab();
        tab.update(Msg::MarkDelete(1));
        tab.update(Msg::AddCreation);
        tab.update(Msg::EditFilter(TableFilter::new("Datafile")));
        assert!(!tab.has_pending_changes());
    }

    #[test]
    fn test_sort_three_way() {
        let mut tab = loaded_tab();
        let sort = |tab: &mut EntityTab, asc| {
            tab.update(Msg::Sort { field: "name".to_string(), asc })
        };

        assert_eq!(sort(&mut tab, true), Command::Reload);
        assert_eq!(tab.filter.sort_field.as_deref(), Some("name"));
        assert_eq!(tab.filter.sort_asc, Some(true));

        sort(&mut tab, false);
        assert_eq!(tab.filter.sort_asc, Some(false));

        sort(&mut tab, false);
        assert_eq!(tab.filter.sort_field, None);
        assert_eq!(tab.filter.sort_asc, None);
        assert!(tab.is_loading());
    }

    #[test]
    fn test_refresh_keeps_filter() {
        let mut tab = loaded_tab();
        tab.update(Msg::SetCount(2));
        let filter = tab.filter.clone();
        assert_eq!(tab.update(Msg::Refresh), Command::Reload);
        assert_eq!(tab.filter, filter);
        assert!(tab.is_loading());
        assert_eq!(tab.count, None);
    }

    #[test]
    fn test_mark_then_cancel_delete_restores_set() {
        let mut tab = loaded_tab();
        tab.update(Msg::MarkDelete(2));
        let before = tab.deletions.clone();

        tab.update(Msg::MarkDelete(1));
        tab.update(Msg::CancelDeletes(vec![1]));
        assert_eq!(tab.deletions, before);
    }

    #[test]
    fn test_sync_deletes() {
        let mut tab = loaded_tab();
        tab.update(Msg::SetCount(2));
        tab.update(Msg::MarkDelete(1));
        tab.update(Msg::MarkDelete(2));
        tab.update(Msg::SyncDeletes(vec![1]));

        let data = tab.data.as_ref().unwrap();
        assert_eq!(data.len(), 1);
        assert_eq!(entity_id(&data[0]), Some(2));
        assert_eq!(tab.deletions.iter().copied().collect::<Vec<_>>(), vec![2]);
        assert_eq!(tab.count, Some(1));
    }

    #[test]
    fn test_edit_entity_is_idempotent() {
        let mut once = loaded_tab();
        edit(&mut once, 1, "name", json!("z"));

        let mut twice = loaded_tab();
        edit(&mut twice, 1, "name", json!("z"));
        edit(&mut twice, 1, "name", json!("z"));

        assert_eq!(once.modifications, twice.modifications);
        assert_eq!(once.modifications[&1]["name"], "z");
    }

    #[test]
    fn test_edit_back_to_original_removes_override() {
        let mut tab = loaded_tab();
        edit(&mut tab, 1, "name", json!("z"));
        edit(&mut tab, 1, "description", json!("new"));
        edit(&mut tab, 1, "name", json!("a"));
        assert!(tab.modifications[&1].get("name").is_none());
        assert!(tab.modifications[&1].get("description").is_some());

        edit(&mut tab, 1, "description", Value::Null);
        assert!(!tab.modifications.contains_key(&1));
    }

    #[test]
    fn test_related_reference_compares_by_id() {
        let mut tab = loaded_tab();
        edit(&mut tab, 2, "investigation", json!({"id": 11}));
        assert!(tab.modifications.contains_key(&2));

        edit(&mut tab, 2, "investigation", json!({"id": 10, "name": "inv"}));
        assert!(!tab.modifications.contains_key(&2));
    }

    #[test]
    fn test_overlay_never_touches_base_rows() {
        let mut tab = loaded_tab();
        edit(&mut tab, 1, "name", json!("z"));

        let rows = tab.display_rows().unwrap();
        assert_eq!(rows[0]["name"], "z");
        assert_eq!(tab.data.as_ref().unwrap()[0]["name"], "a");
    }

    #[test]
    fn test_orphaned_modifications_dropped_on_next_edit() {
        let mut tab = loaded_tab();
        edit(&mut tab, 1, "name", json!("z"));
        tab.update(Msg::SetData(vec![entity(json!({"id": 2, "name": "b"}))]));
        assert!(tab.modifications.contains_key(&1));

        edit(&mut tab, 2, "name", json!("y"));
        assert!(!tab.modifications.contains_key(&1));
        assert!(tab.modifications.contains_key(&2));
    }

    #[test]
    fn test_cancel_and_sync_modification() {
        let mut tab = loaded_tab();
        edit(&mut tab, 1, "name", json!("z"));
        tab.update(Msg::CancelModifications(1));
        assert!(tab.modifications.is_empty());

        edit(&mut tab, 2, "name", json!("y"));
        tab.update(Msg::SyncModification(entity(json!({"id": 2, "name": "y"}))));
        assert!(tab.modifications.is_empty());
        assert_eq!(tab.data.as_ref().unwrap()[1]["name"], "y");
    }

    #[test]
    fn test_creation_lifecycle() {
        let mut tab = loaded_tab();
        tab.update(Msg::AddCreation);
        tab.update(Msg::AddCreation);
        tab.update(Msg::EditCreation { index: 1, field: "name".to_string(), value: json!("X") });
        assert_eq!(tab.creations[1]["name"], "X");

        tab.update(Msg::SyncCreation { index: 1, entity: entity(json!({"id": 7, "name": "X"})) });
        assert_eq!(tab.creations.len(), 1);
        let data = tab.data.as_ref().unwrap();
        assert_eq!(data.len(), 3);
        assert_eq!(entity_id(&data[0]), Some(7));

        tab.update(Msg::CancelCreations(vec![0, 0, 5]));
        assert!(tab.creations.is_empty());
    }

    #[test]
    fn test_sync_creation_while_loading_only_drops_draft() {
        let mut tab = EntityTab::new(1, TableFilter::new("Facility"));
        tab.update(Msg::AddCreation);
        tab.update(Msg::SyncCreation { index: 0, entity: entity(json!({"id": 7})) });
        assert!(tab.creations.is_empty());
        assert!(tab.data.is_none());
    }

    #[test]
    fn test_sync_creation_without_matching_draft_is_ignored() {
        let mut tab = loaded_tab();
        tab.update(Msg::SetCount(2));
        tab.update(Msg::AddCreation);

        tab.update(Msg::SyncCreation { index: 3, entity: entity(json!({"id": 7})) });
        assert_eq!(tab.creations.len(), 1);
        assert_eq!(tab.data.as_ref().unwrap().len(), 2);
        assert_eq!(tab.count, Some(2));
    }

    #[test]
    fn test_toggle_show_all_columns() {
        let mut tab = loaded_tab();
        tab.update(Msg::ToggleShowAllColumns);
        assert!(tab.show_all_columns);
        tab.update(Msg::ToggleShowAllColumns);
        assert!(!tab.show_all_columns);
    }
}
