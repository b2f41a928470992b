//! Tracking of which items of an index still need indexing.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Indexing state of a tracked item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    /// The item changed since it was last indexed.
    Pending,
    /// The indexed form is current.
    Indexed,
}

/// Per-index record of known items and their indexing state.
#[derive(Debug, Clone, Default)]
pub struct Tracker {
    items: BTreeMap<String, ItemStatus>,
}

impl Tracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking new items. Already tracked items become pending.
    pub fn track_items_inserted<I, S>(&mut self, item_ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for id in item_ids {
            self.items.insert(id.into(), ItemStatus::Pending);
        }
    }

    /// Mark tracked items as needing reindexing. Unknown ids are tracked too.
    pub fn track_items_updated<I, S>(&mut self, item_ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.track_items_inserted(item_ids);
    }

    /// Mark every tracked item as needing reindexing.
    pub fn track_all_items_updated(&mut self) {
        for status in self.items.values_mut() {
            *status = ItemStatus::Pending;
        }
    }

    /// Mark items as indexed. Untracked ids are ignored.
    pub fn track_items_indexed<'a, I>(&mut self, item_ids: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        for id in item_ids {
            if let Some(status) = self.items.get_mut(id) {
                *status = ItemStatus::Indexed;
            }
        }
    }

    /// Stop tracking items.
    pub fn track_items_deleted<'a, I>(&mut self, item_ids: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        for id in item_ids {
            self.items.remove(id);
        }
    }

    /// Stop tracking every item of a datasource, or all items.
    pub fn track_all_items_deleted(&mut self, datasource_id: Option<&str>) {
        match datasource_id {
            Some(datasource_id) => {
                let prefix = format!("{datasource_id}/");
                self.items.retain(|id, _| !id.starts_with(&prefix));
            }
            None => self.items.clear(),
        }
    }

    pub fn status(&self, item_id: &str) -> Option<ItemStatus> {
        self.items.get(item_id).copied()
    }

    pub fn total_items_count(&self) -> usize {
        self.items.len()
    }

    pub fn indexed_items_count(&self) -> usize {
        self.items
            .values()
            .filter(|status| **status == ItemStatus::Indexed)
            .count()
    }

    /// Ids of pending items in id order, at most `limit` if given.
    pub fn remaining_items(&self, limit: Option<usize>) -> Vec<String> {
        self.items
            .iter()
            .filter(|(_, status)| **status == ItemStatus::Pending)
            .map(|(id, _)| id.clone())
            .take(limit.unwrap_or(usize::MAX))
            .collect()
    }
}
