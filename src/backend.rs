//! The contract between search indexes and the engines that store them.
//!
//! A [`Backend`] stores the items of any number of indexes and executes
//! queries against them. Optional capabilities are negotiated by name through
//! [`Backend::supports_feature`]; queries needing a missing feature fail with
//! [`PhalanxError::UnsupportedFeature`](crate::error::PhalanxError::UnsupportedFeature)
//! before reaching the backend.

pub mod memory;

pub use memory::InMemoryBackend;

use crate::document::item::Item;
use crate::error::Result;
use crate::query::{Query, ResultSet};
use crate::schema::IndexDefinition;

/// Feature name: the backend computes facets.
pub const FEATURE_FACETS: &str = "search_api_facets";

/// Feature name: the backend supports facets with the OR operator.
pub const FEATURE_FACETS_OPERATOR_OR: &str = "search_api_facets_operator_or";

/// A search backend.
pub trait Backend: Send + Sync {
    /// Short identifier of the implementation.
    fn name(&self) -> &str;

    /// Whether the backend supports an optional feature.
    fn supports_feature(&self, feature: &str) -> bool;

    /// Start storing items for a new index.
    fn add_index(&self, index: &IndexDefinition) -> Result<()>;

    /// Apply a changed index definition. Stored items are reindexed when their
    /// indexed form changes.
    fn update_index(&self, index: &IndexDefinition) -> Result<()>;

    /// Drop an index and all its items.
    fn remove_index(&self, index_id: &str) -> Result<()>;

    /// Index or reindex items. Returns the number of items indexed.
    ///
    /// If some items fail, the others are still committed and
    /// `PartialIndexingFailure` is returned.
    fn index_items(&self, index_id: &str, items: &[Item]) -> Result<usize>;

    /// Remove items by id. Unknown ids are ignored.
    fn delete_items(&self, index_id: &str, item_ids: &[String]) -> Result<()>;

    /// Remove all items of an index, or only those of one datasource.
    fn delete_all_index_items(&self, index_id: &str, datasource_id: Option<&str>) -> Result<()>;

    /// Execute a query.
    fn search(&self, query: &Query) -> Result<ResultSet>;
}
