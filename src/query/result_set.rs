//! Search results.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::document::item::Item;
use crate::error::Result;
use crate::facet::{FACETS_OPTION, FacetBucket};

/// One matching item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultItem {
    /// Composite item id (`"<datasource>/<raw id>"`).
    pub id: String,
    pub datasource_id: String,
    pub language: String,
    /// Relevance score.
    pub score: f32,
}

impl ResultItem {
    pub fn new<S: Into<String>>(id: S, datasource_id: S, language: S, score: f32) -> Self {
        ResultItem {
            id: id.into(),
            datasource_id: datasource_id.into(),
            language: language.into(),
            score,
        }
    }

    /// The id without its datasource prefix.
    pub fn raw_id(&self) -> &str {
        Item::split_id(&self.id).map_or(self.id.as_str(), |(_, raw)| raw)
    }
}

/// The outcome of executing a query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultSet {
    /// Number of matching items, regardless of the requested range.
    pub result_count: usize,
    /// Matching items in result order, restricted to the requested range.
    pub result_items: Vec<ResultItem>,
    /// Search keys that were dropped during analysis.
    #[serde(default)]
    pub ignored_search_keys: Vec<String>,
    #[serde(default)]
    pub warnings: Vec<String>,
    /// Backend-specific extra data, such as facets.
    #[serde(default)]
    pub extra_data: BTreeMap<String, Value>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ids of the returned items in order.
    pub fn ids(&self) -> Vec<&str> {
        self.result_items.iter().map(|item| item.id.as_str()).collect()
    }

    pub fn get(&self, id: &str) -> Option<&ResultItem> {
        self.result_items.iter().find(|item| item.id == id)
    }

    pub fn len(&self) -> usize {
        self.result_items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.result_items.is_empty()
    }

    /// Record an ignored key once.
    pub fn add_ignored_search_key<S: Into<String>>(&mut self, key: S) {
        let key = key.into();
        if !self.ignored_search_keys.contains(&key) {
            self.ignored_search_keys.push(key);
        }
    }

    /// Record a warning once.
    pub fn add_warning<S: Into<String>>(&mut self, warning: S) {
        let warning = warning.into();
        if !self.warnings.contains(&warning) {
            self.warnings.push(warning);
        }
    }

    pub fn extra_data(&self, name: &str) -> Option<&Value> {
        self.extra_data.get(name)
    }

    pub fn set_extra_data<S: Into<String>>(&mut self, name: S, value: Value) {
        self.extra_data.insert(name.into(), value);
    }

    /// Decode all facet results.
    pub fn facets(&self) -> Result<BTreeMap<String, Vec<FacetBucket>>> {
        match self.extra_data.get(FACETS_OPTION) {
            Some(value) => Ok(serde_json::from_value(value.clone())?),
            None => Ok(BTreeMap::new()),
        }
    }

    /// Buckets of a single facet, if it was computed.
    pub fn facet(&self, name: &str) -> Option<Vec<FacetBucket>> {
        let value = self.extra_data.get(FACETS_OPTION)?.get(name)?;
        serde_json::from_value(value.clone()).ok()
    }

    /// Store facet results.
    pub fn set_facets(&mut self, facets: &BTreeMap<String, Vec<FacetBucket>>) -> Result<()> {
        let value = serde_json::to_value(facets)?;
        self.extra_data.insert(FACETS_OPTION.to_string(), value);
        Ok(())
    }
}
