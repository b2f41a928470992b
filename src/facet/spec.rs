//! Facet request specifications.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{PhalanxError, Result};
use crate::facet::FACETS_OPTION;

/// How a facet interacts with filters on its own field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FacetOperator {
    /// Counts reflect every condition of the query.
    #[default]
    And,
    /// Counts ignore condition groups tagged for this facet.
    Or,
}

/// A single facet request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FacetSpec {
    /// Field to count values of.
    pub field: String,
    /// Maximum number of buckets; 0 means unlimited.
    #[serde(default)]
    pub limit: usize,
    /// Minimum count a bucket needs to be reported.
    #[serde(default = "default_min_count")]
    pub min_count: u64,
    /// Whether to add a bucket for items without a value.
    #[serde(default)]
    pub missing: bool,
    #[serde(default)]
    pub operator: FacetOperator,
}

fn default_min_count() -> u64 {
    1
}

impl FacetSpec {
    pub fn new<S: Into<String>>(field: S) -> Self {
        FacetSpec {
            field: field.into(),
            limit: 0,
            min_count: default_min_count(),
            missing: false,
            operator: FacetOperator::And,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_min_count(mut self, min_count: u64) -> Self {
        self.min_count = min_count;
        self
    }

    pub fn with_missing(mut self, missing: bool) -> Self {
        self.missing = missing;
        self
    }

    pub fn with_operator(mut self, operator: FacetOperator) -> Self {
        self.operator = operator;
        self
    }

    /// Read the facet requests from a query's option bag.
    ///
    /// Returns an empty map if no facets were requested.
    pub fn from_options(options: &BTreeMap<String, Value>) -> Result<BTreeMap<String, FacetSpec>> {
        let Some(value) = options.get(FACETS_OPTION) else {
            return Ok(BTreeMap::new());
        };
        let specs: BTreeMap<String, FacetSpec> = serde_json::from_value(value.clone())
            .map_err(|e| PhalanxError::invalid_query(format!("Malformed facet request: {e}")))?;

        if let Some((name, _)) = specs.iter().find(|(_, spec)| spec.field.is_empty()) {
            return Err(PhalanxError::invalid_query(format!(
                "Facet '{name}' has no field"
            )));
        }
        Ok(specs)
    }

    /// Encode facet requests as an option value.
    pub fn to_option(specs: &BTreeMap<String, FacetSpec>) -> Result<Value> {
        Ok(serde_json::to_value(specs)?)
    }
}
