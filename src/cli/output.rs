//! Output formatting for CLI commands.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::cli::args::{OutputFormat, PhalanxArgs};
use crate::error::Result;
use crate::facet::FacetBucket;
use crate::query::{ResultItem, ResultSet};

/// Result structure for search operations.
#[derive(Debug, Serialize, Deserialize)]
pub struct SearchOutput {
    pub result_count: usize,
    pub items: Vec<ResultItem>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub facets: BTreeMap<String, Vec<FacetBucket>>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub ignored_search_keys: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub warnings: Vec<String>,
    pub duration_ms: u64,
}

impl SearchOutput {
    pub fn new(results: &ResultSet, duration: Duration) -> Result<Self> {
        Ok(SearchOutput {
            result_count: results.result_count,
            items: results.result_items.clone(),
            facets: results.facets()?,
            ignored_search_keys: results.ignored_search_keys.clone(),
            warnings: results.warnings.clone(),
            duration_ms: duration.as_millis() as u64,
        })
    }
}

/// Index statistics.
#[derive(Debug, Serialize, Deserialize)]
pub struct StatsOutput {
    pub index: String,
    pub datasources: Vec<String>,
    pub fields: BTreeMap<String, String>,
    pub total_items: usize,
    pub indexed_items: usize,
}

/// Types that know how to print themselves for humans.
pub trait HumanOutput {
    fn render_human(&self) -> String;
}

impl HumanOutput for SearchOutput {
    fn render_human(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "Found {} result(s) in {}ms\n",
            self.result_count, self.duration_ms
        ));
        for (i, item) in self.items.iter().enumerate() {
            out.push_str(&format!(
                "{:>3}. {} [{}] (Score: {:.3})\n",
                i + 1,
                item.id,
                item.language,
                item.score
            ));
        }
        for (name, buckets) in &self.facets {
            out.push_str(&format!("\nFacet {name}:\n"));
            for bucket in buckets {
                out.push_str(&format!("  {:<30} {}\n", bucket.filter, bucket.count));
            }
        }
        if !self.ignored_search_keys.is_empty() {
            out.push_str(&format!(
                "\nIgnored search keys: {}\n",
                self.ignored_search_keys.join(", ")
            ));
        }
        for warning in &self.warnings {
            out.push_str(&format!("Warning: {warning}\n"));
        }
        out
    }
}

impl HumanOutput for StatsOutput {
    fn render_human(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("Index: {}\n", self.index));
        out.push_str(&format!("Datasources: {}\n", self.datasources.join(", ")));
        out.push_str(&format!(
            "Items: {} indexed of {} tracked\n",
            self.indexed_items, self.total_items
        ));
        out.push_str("Fields:\n");
        for (name, field_type) in &self.fields {
            out.push_str(&format!("  {name:<20} {field_type}\n"));
        }
        out
    }
}

/// Output a result in the specified format.
pub fn output_result<T: Serialize + HumanOutput>(result: &T, args: &PhalanxArgs) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => {
            print!("{}", result.render_human());
            Ok(())
        }
        OutputFormat::Json => output_json(result, args),
    }
}

/// Output in JSON format.
fn output_json<T: Serialize>(result: &T, args: &PhalanxArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };
    println!("{json}");
    Ok(())
}
