//! Facet value counting.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::document::field_value::FieldValue;
use crate::facet::MISSING_FILTER;
use crate::facet::spec::FacetSpec;

/// One facet value and the number of matching items carrying it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetBucket {
    pub count: u64,
    /// The value in double quotes, or `!` for items without a value.
    pub filter: String,
}

impl FacetBucket {
    pub fn new<S: Into<String>>(count: u64, filter: S) -> Self {
        FacetBucket {
            count,
            filter: filter.into(),
        }
    }

    /// Filter string of a value.
    pub fn filter_for(value: &FieldValue) -> String {
        format!("\"{value}\"")
    }

    pub fn is_missing(&self) -> bool {
        self.filter == MISSING_FILTER
    }

    /// The unquoted value, or `None` for the missing bucket.
    pub fn value(&self) -> Option<&str> {
        self.filter
            .strip_prefix('"')
            .and_then(|rest| rest.strip_suffix('"'))
    }
}

/// Counts facet values for one facet.
#[derive(Debug, Clone)]
pub struct FacetCollector {
    spec: FacetSpec,
    counts: BTreeMap<String, u64>,
    missing: u64,
}

impl FacetCollector {
    pub fn new(spec: FacetSpec) -> Self {
        FacetCollector {
            spec,
            counts: BTreeMap::new(),
            missing: 0,
        }
    }

    pub fn spec(&self) -> &FacetSpec {
        &self.spec
    }

    /// Count the field values of one matching item. Each distinct value
    /// counts once per item.
    pub fn collect(&mut self, values: &[FieldValue]) {
        if values.is_empty() {
            self.missing += 1;
            return;
        }
        let distinct: BTreeSet<String> = values.iter().map(FacetBucket::filter_for).collect();
        for filter in distinct {
            *self.counts.entry(filter).or_default() += 1;
        }
    }

    /// Register a value that exists in the index without counting it, so it
    /// can be reported with count 0.
    pub fn seed(&mut self, values: &[FieldValue]) {
        for value in values {
            self.counts.entry(FacetBucket::filter_for(value)).or_default();
        }
    }

    /// Produce the ordered, filtered and truncated buckets.
    pub fn finalize(self) -> Vec<FacetBucket> {
        let min_count = self.spec.min_count;
        let mut buckets: Vec<FacetBucket> = self
            .counts
            .into_iter()
            .map(|(filter, count)| FacetBucket { count, filter })
            .collect();

        if self.spec.missing && (self.missing > 0 || min_count == 0) {
            buckets.push(FacetBucket::new(self.missing, MISSING_FILTER));
        }

        buckets.retain(|bucket| bucket.count >= min_count);
        buckets.sort_by(|a, b| match b.count.cmp(&a.count) {
            Ordering::Equal => a.filter.cmp(&b.filter),
            ordering => ordering,
        });
        if self.spec.limit > 0 {
            buckets.truncate(self.spec.limit);
        }
        buckets
    }
}
