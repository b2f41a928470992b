//! A complete backend that keeps every index in memory.
//!
//! Items are analyzed and coerced on indexing; queries are evaluated by
//! scanning all items of the index with the compiled forms from
//! [`crate::query::matcher`]. All indexes live behind one read-write lock, so a
//! finished `index_items` call is visible to every later search.

pub mod search;
pub mod store;

use std::sync::Arc;

use ahash::{AHashMap, AHashSet};
use log::{debug, info};
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::analysis::analyzer::PipelineAnalyzer;
use crate::analysis::token_filter::{LengthFilter, LowercaseFilter, StopFilter, TruncateFilter};
use crate::analysis::tokenizer::UnicodeWordTokenizer;
use crate::backend::{Backend, FEATURE_FACETS, FEATURE_FACETS_OPERATOR_OR};
use crate::config::BackendConfig;
use crate::document::item::Item;
use crate::error::{PhalanxError, Result};
use crate::query::{Query, ResultSet};
use crate::schema::IndexDefinition;

use self::store::MemoryIndex;

/// The in-memory backend.
#[derive(Debug)]
pub struct InMemoryBackend {
    config: BackendConfig,
    index_analyzer: PipelineAnalyzer,
    query_analyzer: PipelineAnalyzer,
    disabled_features: AHashSet<String>,
    indexes: RwLock<AHashMap<String, MemoryIndex>>,
}

impl InMemoryBackend {
    /// Create a backend with a validated configuration.
    pub fn new(config: BackendConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: BackendConfig) -> Self {
        let tokenizer = Arc::new(UnicodeWordTokenizer::new());
        let index_analyzer = PipelineAnalyzer::new(tokenizer.clone())
            .add_filter(Arc::new(TruncateFilter::new(config.max_token_chars)))
            .with_name("memory_index");
        let query_analyzer = PipelineAnalyzer::new(tokenizer)
            .add_filter(Arc::new(LengthFilter::new(config.min_chars, config.max_token_chars)))
            .add_filter(Arc::new(StopFilter::from_words(&config.stop_words)))
            .add_filter(Arc::new(LowercaseFilter::new()))
            .with_name("memory_query");

        InMemoryBackend {
            config,
            index_analyzer,
            query_analyzer,
            disabled_features: AHashSet::new(),
            indexes: RwLock::new(AHashMap::new()),
        }
    }

    /// Stop advertising a feature.
    pub fn without_feature<S: Into<String>>(mut self, feature: S) -> Self {
        self.disabled_features.insert(feature.into());
        self
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    /// Number of items stored for an index.
    pub fn item_count(&self, index_id: &str) -> Result<usize> {
        let indexes = self.read()?;
        Ok(Self::get(&indexes, index_id)?.len())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, AHashMap<String, MemoryIndex>>> {
        self.indexes
            .try_read_for(self.config.lock_timeout())
            .ok_or_else(|| PhalanxError::timeout("could not acquire the index read lock"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, AHashMap<String, MemoryIndex>>> {
        self.indexes
            .try_write_for(self.config.lock_timeout())
            .ok_or_else(|| PhalanxError::timeout("could not acquire the index write lock"))
    }

    fn get<'a>(
        indexes: &'a AHashMap<String, MemoryIndex>,
        index_id: &str,
    ) -> Result<&'a MemoryIndex> {
        indexes
            .get(index_id)
            .ok_or_else(|| PhalanxError::invalid_query(format!("Unknown index '{index_id}'")))
    }

    fn get_mut<'a>(
        indexes: &'a mut AHashMap<String, MemoryIndex>,
        index_id: &str,
    ) -> Result<&'a mut MemoryIndex> {
        indexes
            .get_mut(index_id)
            .ok_or_else(|| PhalanxError::invalid_query(format!("Unknown index '{index_id}'")))
    }
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::build(BackendConfig::default())
    }
}

impl Backend for InMemoryBackend {
    fn name(&self) -> &str {
        "memory"
    }

    fn supports_feature(&self, feature: &str) -> bool {
        matches!(feature, FEATURE_FACETS | FEATURE_FACETS_OPERATOR_OR)
            && !self.disabled_features.contains(feature)
    }

    fn add_index(&self, index: &IndexDefinition) -> Result<()> {
        index.validate()?;
        let mut indexes = self.write()?;
        if indexes.contains_key(&index.id) {
            return Err(PhalanxError::invalid_query(format!(
                "Index '{}' already exists",
                index.id
            )));
        }
        indexes.insert(index.id.clone(), MemoryIndex::new(index.clone()));
        info!("Added index '{}' with {} field(s)", index.id, index.fields.len());
        Ok(())
    }

    fn update_index(&self, index: &IndexDefinition) -> Result<()> {
        index.validate()?;
        let mut indexes = self.write()?;
        let stored = Self::get_mut(&mut indexes, &index.id)?;
        let count = stored.update_definition(index.clone(), &self.index_analyzer, &self.config);
        info!("Updated index '{}', reindexed {count} item(s)", index.id);
        Ok(())
    }

    fn remove_index(&self, index_id: &str) -> Result<()> {
        let mut indexes = self.write()?;
        if indexes.remove(index_id).is_none() {
            return Err(PhalanxError::invalid_query(format!("Unknown index '{index_id}'")));
        }
        info!("Removed index '{index_id}'");
        Ok(())
    }

    fn index_items(&self, index_id: &str, items: &[Item]) -> Result<usize> {
        let mut indexes = self.write()?;
        let index = Self::get_mut(&mut indexes, index_id)?;
        let (indexed, failed) = index.index_items(items, &self.index_analyzer, &self.config);
        info!("Indexed {indexed} of {} item(s) on index '{index_id}'", items.len());

        if failed.is_empty() {
            Ok(indexed)
        } else {
            Err(PhalanxError::PartialIndexingFailure { indexed, failed })
        }
    }

    fn delete_items(&self, index_id: &str, item_ids: &[String]) -> Result<()> {
        let mut indexes = self.write()?;
        Self::get_mut(&mut indexes, index_id)?.delete_items(item_ids);
        debug!("Deleted {} item(s) from index '{index_id}'", item_ids.len());
        Ok(())
    }

    fn delete_all_index_items(&self, index_id: &str, datasource_id: Option<&str>) -> Result<()> {
        let mut indexes = self.write()?;
        Self::get_mut(&mut indexes, index_id)?.clear(datasource_id);
        info!(
            "Cleared index '{index_id}'{}",
            datasource_id.map(|ds| format!(" for datasource '{ds}'")).unwrap_or_default()
        );
        Ok(())
    }

    fn search(&self, query: &Query) -> Result<ResultSet> {
        let indexes = self.read()?;
        let index = Self::get(&indexes, query.index().id())?;
        search::execute(index, query, &self.query_analyzer)
    }
}
