//! The search query and its serialized request form.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::time::Instant;

use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::backend::{FEATURE_FACETS, FEATURE_FACETS_OPERATOR_OR};
use crate::error::{PhalanxError, Result};
use crate::facet::spec::{FacetOperator, FacetSpec};
use crate::facet::FACETS_OPTION;
use crate::query::condition::{ConditionValue, Operator};
use crate::query::condition_group::{ConditionGroup, Conjunction};
use crate::query::keys::Keys;
use crate::query::result_set::ResultSet;
use crate::query::sort::{Sort, SortDirection};
use crate::server::Index;

/// The part of the result list to return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Range {
    pub offset: usize,
    /// Maximum number of items; `None` returns all, `Some(0)` only counts.
    pub limit: Option<usize>,
}

/// A search on one index.
///
/// Queries are created with [`Index::query`], configured through the builder
/// methods and run with [`Query::execute`]. A query runs at most once: later
/// calls return the cached result set.
#[derive(Clone)]
pub struct Query {
    index: Index,
    keys: Option<Keys>,
    fulltext_fields: Option<Vec<String>>,
    condition_group: ConditionGroup,
    sorts: Vec<Sort>,
    range: Range,
    languages: Option<BTreeSet<String>>,
    options: BTreeMap<String, Value>,
    ignored_search_keys: Vec<String>,
    warnings: Vec<String>,
    results: Option<ResultSet>,
}

impl Query {
    /// Create an empty query on an index.
    pub fn new(index: Index) -> Self {
        Query {
            index,
            keys: None,
            fulltext_fields: None,
            condition_group: ConditionGroup::new(Conjunction::And),
            sorts: Vec::new(),
            range: Range::default(),
            languages: None,
            options: BTreeMap::new(),
            ignored_search_keys: Vec::new(),
            warnings: Vec::new(),
            results: None,
        }
    }

    /// Create a query from its serialized form.
    pub fn from_request(index: Index, request: SearchRequest) -> Self {
        let mut query = Query::new(index);
        query.keys = request.keys;
        query.fulltext_fields = request.fulltext_fields;
        query.condition_group = request.conditions;
        query.sorts = request.sorts;
        query.range = Range {
            offset: request.offset,
            limit: request.limit,
        };
        query.languages = request.languages.map(|langs| langs.into_iter().collect());
        query.options = request.options;
        query
    }

    /// The serialized form of this query.
    pub fn to_request(&self) -> SearchRequest {
        SearchRequest {
            keys: self.keys.clone(),
            fulltext_fields: self.fulltext_fields.clone(),
            conditions: self.condition_group.clone(),
            sorts: self.sorts.clone(),
            offset: self.range.offset,
            limit: self.range.limit,
            languages: self.languages.as_ref().map(|langs| langs.iter().cloned().collect()),
            options: self.options.clone(),
        }
    }

    pub fn index(&self) -> &Index {
        &self.index
    }

    /// Set the fulltext keys. Strings are parsed as AND-joined terms.
    pub fn keys<K: Into<Keys>>(&mut self, keys: K) -> &mut Self {
        self.keys = Some(keys.into());
        self
    }

    pub fn get_keys(&self) -> Option<&Keys> {
        self.keys.as_ref()
    }

    /// Restrict the fulltext search to some of the index's text fields.
    pub fn set_fulltext_fields<I, S>(&mut self, fields: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fulltext_fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    pub fn get_fulltext_fields(&self) -> Option<&[String]> {
        self.fulltext_fields.as_deref()
    }

    /// Add a condition to the root group.
    pub fn add_condition<S, V>(&mut self, field: S, value: V, operator: Operator) -> &mut Self
    where
        S: Into<String>,
        V: Into<ConditionValue>,
    {
        self.condition_group.add_condition(field, value, operator);
        self
    }

    /// Add a nested group to the root group.
    pub fn add_condition_group(&mut self, group: ConditionGroup) -> &mut Self {
        self.condition_group.add_condition_group(group);
        self
    }

    /// Create an empty group for use with [`Query::add_condition_group`].
    pub fn create_condition_group<I, S>(&self, conjunction: Conjunction, tags: I) -> ConditionGroup
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ConditionGroup::with_tags(conjunction, tags)
    }

    /// Add an empty group to the root group and return it for filling.
    pub fn create_and_add_condition_group<I, S>(
        &mut self,
        conjunction: Conjunction,
        tags: I,
    ) -> &mut ConditionGroup
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.condition_group
            .add_condition_group(ConditionGroup::with_tags(conjunction, tags));
        match self.condition_group.last_group_mut() {
            Some(group) => group,
            None => unreachable!("a group was just added"),
        }
    }

    pub fn condition_group(&self) -> &ConditionGroup {
        &self.condition_group
    }

    pub fn condition_group_mut(&mut self) -> &mut ConditionGroup {
        &mut self.condition_group
    }

    /// Append a sort. Earlier sorts take precedence.
    pub fn sort<S: Into<String>>(&mut self, field: S, direction: SortDirection) -> &mut Self {
        self.sorts.push(Sort::new(field, direction));
        self
    }

    pub fn sorts(&self) -> &[Sort] {
        &self.sorts
    }

    /// Set offset and limit of the returned items.
    pub fn range(&mut self, offset: usize, limit: Option<usize>) -> &mut Self {
        self.range = Range { offset, limit };
        self
    }

    pub fn get_range(&self) -> Range {
        self.range
    }

    /// Only return items in one of these languages.
    pub fn set_languages<I, S>(&mut self, languages: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.languages = Some(languages.into_iter().map(Into::into).collect());
        self
    }

    pub fn languages(&self) -> Option<&BTreeSet<String>> {
        self.languages.as_ref()
    }

    /// Set an option, returning the previous value.
    pub fn set_option<S: Into<String>>(&mut self, name: S, value: Value) -> Option<Value> {
        self.options.insert(name.into(), value)
    }

    pub fn get_option(&self, name: &str) -> Option<&Value> {
        self.options.get(name)
    }

    pub fn options(&self) -> &BTreeMap<String, Value> {
        &self.options
    }

    /// Request facets.
    pub fn set_facets(&mut self, facets: &BTreeMap<String, FacetSpec>) -> Result<&mut Self> {
        self.options
            .insert(FACETS_OPTION.to_string(), FacetSpec::to_option(facets)?);
        Ok(self)
    }

    /// Keys dropped during the last execution.
    pub fn ignored_search_keys(&self) -> &[String] {
        &self.ignored_search_keys
    }

    /// Warnings raised during the last execution.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn has_executed(&self) -> bool {
        self.results.is_some()
    }

    /// Run the query on its index's backend.
    pub fn execute(&mut self) -> Result<ResultSet> {
        if let Some(results) = &self.results {
            return Ok(results.clone());
        }

        self.check_features()?;

        let start = Instant::now();
        let results = self.index.server().backend().search(self)?;
        debug!(
            "Query on index '{}' matched {} item(s), returned {} in {:?}",
            self.index.id(),
            results.result_count,
            results.result_items.len(),
            start.elapsed()
        );

        for key in &results.ignored_search_keys {
            if !self.ignored_search_keys.contains(key) {
                self.ignored_search_keys.push(key.clone());
            }
        }
        for warning in &results.warnings {
            if !self.warnings.contains(warning) {
                self.warnings.push(warning.clone());
            }
        }
        self.results = Some(results.clone());
        Ok(results)
    }

    fn check_features(&self) -> Result<()> {
        let facets = FacetSpec::from_options(&self.options)?;
        if facets.is_empty() {
            return Ok(());
        }
        let server = self.index.server();
        if !server.supports_feature(FEATURE_FACETS) {
            return Err(PhalanxError::unsupported(format!(
                "Server '{}' does not support facets",
                server.id()
            )));
        }
        if facets.values().any(|spec| spec.operator == FacetOperator::Or)
            && !server.supports_feature(FEATURE_FACETS_OPERATOR_OR)
        {
            return Err(PhalanxError::unsupported(format!(
                "Server '{}' does not support OR facets",
                server.id()
            )));
        }
        Ok(())
    }
}

impl fmt::Debug for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Query")
            .field("index", &self.index.id())
            .field("keys", &self.keys)
            .field("fulltext_fields", &self.fulltext_fields)
            .field("condition_group", &self.condition_group)
            .field("sorts", &self.sorts)
            .field("range", &self.range)
            .field("languages", &self.languages)
            .field("options", &self.options)
            .finish()
    }
}

/// A query without its index, as read from JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keys: Option<Keys>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fulltext_fields: Option<Vec<String>>,
    pub conditions: ConditionGroup,
    pub sorts: Vec<Sort>,
    pub offset: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub languages: Option<Vec<String>>,
    pub options: BTreeMap<String, Value>,
}

impl SearchRequest {
    /// Parse a request from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| PhalanxError::invalid_query(format!("Malformed search request: {e}")))
    }
}
