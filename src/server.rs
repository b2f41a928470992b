//! Servers and index handles.
//!
//! A [`Server`] wraps one [`Backend`]. Indexes are created on a server and
//! handed out as cheap, cloneable [`Index`] handles that carry their
//! definition and item [`Tracker`], and create queries.

use std::fmt;
use std::sync::Arc;

use log::info;
use parking_lot::{Mutex, RwLock};

use crate::backend::Backend;
use crate::document::item::Item;
use crate::error::{PhalanxError, Result};
use crate::query::Query;
use crate::schema::IndexDefinition;
use crate::tracker::Tracker;

struct ServerInner {
    id: String,
    backend: Arc<dyn Backend>,
}

/// A configured backend.
#[derive(Clone)]
pub struct Server {
    inner: Arc<ServerInner>,
}

impl Server {
    pub fn new<S: Into<String>>(id: S, backend: Arc<dyn Backend>) -> Self {
        Server {
            inner: Arc::new(ServerInner {
                id: id.into(),
                backend,
            }),
        }
    }

    pub fn id(&self) -> &str {
        &self.inner.id
    }

    pub fn backend(&self) -> &dyn Backend {
        self.inner.backend.as_ref()
    }

    pub fn supports_feature(&self, feature: &str) -> bool {
        self.inner.backend.supports_feature(feature)
    }

    /// Register an index on the backend and return its handle.
    pub fn create_index(&self, definition: IndexDefinition) -> Result<Index> {
        definition.validate()?;
        self.backend().add_index(&definition)?;
        info!("Created index '{}' on server '{}'", definition.id, self.id());
        Ok(Index {
            inner: Arc::new(IndexInner {
                id: definition.id.clone(),
                server: self.clone(),
                definition: RwLock::new(definition),
                tracker: Mutex::new(Tracker::new()),
            }),
        })
    }

    /// Remove an index and all its items from the backend.
    pub fn delete_index(&self, index: &Index) -> Result<()> {
        self.backend().remove_index(index.id())
    }
}

impl fmt::Debug for Server {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Server")
            .field("id", &self.inner.id)
            .field("backend", &self.inner.backend.name())
            .finish()
    }
}

struct IndexInner {
    id: String,
    server: Server,
    definition: RwLock<IndexDefinition>,
    tracker: Mutex<Tracker>,
}

/// Handle to an index on a server.
#[derive(Clone)]
pub struct Index {
    inner: Arc<IndexInner>,
}

impl Index {
    pub fn id(&self) -> &str {
        &self.inner.id
    }

    pub fn server(&self) -> &Server {
        &self.inner.server
    }

    /// A copy of the current definition.
    pub fn definition(&self) -> IndexDefinition {
        self.inner.definition.read().clone()
    }

    /// Start a new query on this index.
    pub fn query(&self) -> Query {
        Query::new(self.clone())
    }

    /// Replace the definition. The id cannot change.
    pub fn update_definition(&self, definition: IndexDefinition) -> Result<()> {
        if definition.id != self.inner.id {
            return Err(PhalanxError::invalid_config(format!(
                "Cannot rename index '{}' to '{}'",
                self.inner.id, definition.id
            )));
        }
        definition.validate()?;
        self.server().backend().update_index(&definition)?;
        *self.inner.definition.write() = definition;
        Ok(())
    }

    /// Index items and record them as indexed.
    ///
    /// On partial failure only the successful items are recorded before the
    /// error is returned. Rejected ids are not tracked.
    pub fn index_items(&self, items: &[Item]) -> Result<usize> {
        let ids = items.iter().map(|item| item.id.as_str());
        match self.server().backend().index_items(self.id(), items) {
            Ok(count) => {
                self.track_indexed(ids);
                Ok(count)
            }
            Err(PhalanxError::PartialIndexingFailure { indexed, failed }) => {
                self.track_indexed(ids.filter(|id| !failed.iter().any(|f| f.as_str() == *id)));
                Err(PhalanxError::PartialIndexingFailure { indexed, failed })
            }
            Err(e) => {
                self.inner.tracker.lock().track_items_updated(ids);
                Err(e)
            }
        }
    }

    fn track_indexed<'a, I>(&self, ids: I)
    where
        I: IntoIterator<Item = &'a str> + Clone,
    {
        let mut tracker = self.inner.tracker.lock();
        tracker.track_items_updated(ids.clone());
        tracker.track_items_indexed(ids);
    }

    /// Delete items from the backend and stop tracking them.
    pub fn delete_items(&self, item_ids: &[String]) -> Result<()> {
        self.server().backend().delete_items(self.id(), item_ids)?;
        self.inner
            .tracker
            .lock()
            .track_items_deleted(item_ids.iter().map(String::as_str));
        Ok(())
    }

    /// Remove every item from the backend. Tracked items become pending so
    /// they are picked up again by the next indexing run.
    pub fn clear(&self) -> Result<()> {
        self.server().backend().delete_all_index_items(self.id(), None)?;
        self.inner.tracker.lock().track_all_items_updated();
        Ok(())
    }

    /// Remove the items of one datasource from the backend and the tracker.
    pub fn clear_datasource(&self, datasource_id: &str) -> Result<()> {
        self.server()
            .backend()
            .delete_all_index_items(self.id(), Some(datasource_id))?;
        self.inner
            .tracker
            .lock()
            .track_all_items_deleted(Some(datasource_id));
        Ok(())
    }

    /// Start tracking items that exist but have not been indexed yet.
    pub fn track_items_inserted(&self, item_ids: &[String]) {
        self.inner.tracker.lock().track_items_inserted(item_ids.iter().cloned());
    }

    pub fn total_items_count(&self) -> usize {
        self.inner.tracker.lock().total_items_count()
    }

    pub fn indexed_items_count(&self) -> usize {
        self.inner.tracker.lock().indexed_items_count()
    }

    /// Ids of items waiting to be indexed.
    pub fn remaining_items(&self, limit: Option<usize>) -> Vec<String> {
        self.inner.tracker.lock().remaining_items(limit)
    }
}

impl fmt::Debug for Index {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Index")
            .field("id", &self.inner.id)
            .field("server", &self.inner.server.id())
            .finish()
    }
}
