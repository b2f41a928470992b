//! Query execution over an in-memory index.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use log::{debug, warn};
use rayon::prelude::*;

use crate::analysis::analyzer::Analyzer;
use crate::backend::memory::store::{MemoryIndex, StoredItem};
use crate::error::{PhalanxError, Result};
use crate::facet::aggregator::{FacetBucket, FacetCollector};
use crate::facet::restrict::restricted_group;
use crate::facet::spec::FacetSpec;
use crate::query::matcher::{CompiledGroup, CompiledKeys, ItemView, SortKey};
use crate::query::{Query, ResultItem, ResultSet, SortDirection};
use crate::schema::{FieldKind, FieldType, IndexDefinition};

/// Warning emitted when analysis leaves nothing of the search keys.
pub const NO_VALID_KEYS_WARNING: &str = "No valid search keys were present in the query.";

struct FacetJob {
    name: String,
    spec: FacetSpec,
    group: CompiledGroup,
}

/// Everything needed to evaluate a query, resolved before any item is read.
struct Plan {
    keys: Option<CompiledKeys>,
    group: CompiledGroup,
    sorts: Vec<SortKey>,
    facets: Vec<FacetJob>,
    facets_requested: bool,
}

/// Execute a query against one index.
pub fn execute(index: &MemoryIndex, query: &Query, analyzer: &dyn Analyzer) -> Result<ResultSet> {
    let mut results = ResultSet::new();
    let plan = plan(index.definition(), query, analyzer, &mut results)?;

    let languages = query.languages();
    let base: Vec<(&StoredItem, f32)> = index
        .items()
        .filter(|item| languages.is_none_or(|langs| langs.contains(&item.language)))
        .filter_map(|item| match &plan.keys {
            Some(keys) => keys.score(item).map(|score| (item, score)),
            None => Some((item, 1.0)),
        })
        .collect();

    let mut matches: Vec<(&StoredItem, f32)> = base
        .iter()
        .filter(|(item, _)| plan.group.matches(*item))
        .copied()
        .collect();

    sort_matches(&mut matches, &plan);
    results.result_count = matches.len();

    let range = query.get_range();
    let limit = range.limit.unwrap_or(usize::MAX);
    results.result_items = matches
        .iter()
        .skip(range.offset)
        .take(limit)
        .map(|(item, score)| ResultItem::new(&item.id, &item.datasource_id, &item.language, *score))
        .collect();

    if plan.facets_requested {
        let facets: BTreeMap<String, Vec<FacetBucket>> = plan
            .facets
            .par_iter()
            .map(|job| (job.name.clone(), count_facet(index, &base, job)))
            .collect();
        results.set_facets(&facets)?;
    }

    Ok(results)
}

fn plan(
    definition: &IndexDefinition,
    query: &Query,
    analyzer: &dyn Analyzer,
    results: &mut ResultSet,
) -> Result<Plan> {
    let group = CompiledGroup::compile(query.condition_group(), definition)?;
    let sorts = query
        .sorts()
        .iter()
        .map(|sort| SortKey::compile(sort, definition))
        .collect::<Result<Vec<_>>>()?;

    let keys = match query.get_keys().filter(|keys| !keys.is_empty()) {
        Some(keys) => {
            let fields = fulltext_fields(definition, query)?;
            if fields.is_empty() {
                results.add_warning(format!(
                    "Index '{}' has no fulltext fields, the search keys were ignored.",
                    definition.id
                ));
                None
            } else {
                let analysis = CompiledKeys::compile(keys, analyzer, fields)?;
                for key in analysis.ignored {
                    results.add_ignored_search_key(key);
                }
                if analysis.keys.is_none() {
                    results.add_warning(NO_VALID_KEYS_WARNING);
                }
                analysis.keys
            }
        }
        None => None,
    };

    let specs = FacetSpec::from_options(query.options())?;
    let facets_requested = !specs.is_empty();
    let mut facets = Vec::with_capacity(specs.len());
    for (name, spec) in specs {
        match definition.resolve(&spec.field) {
            None | Some(FieldKind::Relevance) => {
                warn!("Skipping facet '{name}': unknown field '{}'", spec.field);
                results.add_warning(format!(
                    "Unknown facet field '{}' for facet '{name}'.",
                    spec.field
                ));
            }
            Some(_) => {
                let restricted = restricted_group(query.condition_group(), &name, &spec);
                let group = CompiledGroup::compile(&restricted, definition)?;
                facets.push(FacetJob { name, spec, group });
            }
        }
    }

    debug!(
        "Planned query on index '{}': keys={}, sorts={}, facets={}",
        definition.id,
        keys.is_some(),
        sorts.len(),
        facets.len()
    );

    Ok(Plan {
        keys,
        group,
        sorts,
        facets,
        facets_requested,
    })
}

fn fulltext_fields(definition: &IndexDefinition, query: &Query) -> Result<Vec<String>> {
    let Some(requested) = query.get_fulltext_fields() else {
        return Ok(definition.fulltext_fields());
    };
    for field in requested {
        match definition.field_type(field) {
            Some(FieldType::Text) => {}
            Some(other) => {
                return Err(PhalanxError::invalid_query(format!(
                    "Field '{field}' is a {} field and cannot be searched as fulltext",
                    other.type_name()
                )));
            }
            None => {
                return Err(PhalanxError::invalid_query(format!(
                    "Unknown fulltext field '{field}' on index '{}'",
                    definition.id
                )));
            }
        }
    }
    Ok(requested.to_vec())
}

fn sort_matches(matches: &mut [(&StoredItem, f32)], plan: &Plan) {
    let default_sort;
    let sorts = if plan.sorts.is_empty() && plan.keys.is_some() {
        default_sort = [SortKey::Relevance(SortDirection::Desc)];
        &default_sort[..]
    } else {
        &plan.sorts[..]
    };

    matches.sort_by(|a, b| {
        sorts
            .iter()
            .map(|sort| sort.compare((a.0, a.1), (b.0, b.1)))
            .find(|ordering| *ordering != Ordering::Equal)
            .unwrap_or_else(|| a.0.id.cmp(&b.0.id))
    });
}

fn count_facet(
    index: &MemoryIndex,
    base: &[(&StoredItem, f32)],
    job: &FacetJob,
) -> Vec<FacetBucket> {
    let mut collector = FacetCollector::new(job.spec.clone());
    if job.spec.min_count == 0 {
        for item in index.items() {
            collector.seed(item.values(&job.spec.field));
        }
    }
    for (item, _) in base {
        if job.group.matches(*item) {
            collector.collect(item.values(&job.spec.field));
        }
    }
    collector.finalize()
}
