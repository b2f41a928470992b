//! Command implementations for the Phalanx CLI.

use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use log::{info, warn};

use crate::backend::InMemoryBackend;
use crate::cli::args::*;
use crate::cli::output::*;
use crate::config::BackendConfig;
use crate::document::item::Item;
use crate::error::{PhalanxError, Result};
use crate::query::{Query, SearchRequest};
use crate::schema::IndexDefinition;
use crate::server::{Index, Server};

/// Execute a CLI command.
pub fn execute_command(args: PhalanxArgs) -> Result<()> {
    match &args.command {
        Command::Search(search_args) => search(search_args, &args),
        Command::Stats(stats_args) => show_stats(stats_args, &args),
    }
}

fn search(args: &SearchArgs, cli_args: &PhalanxArgs) -> Result<()> {
    let index = load_index(&args.source)?;
    let request = SearchRequest::from_json(&fs::read_to_string(&args.request)?)?;

    let start = Instant::now();
    let mut query = Query::from_request(index, request);
    let results = query.execute()?;
    let output = SearchOutput::new(&results, start.elapsed())?;

    output_result(&output, cli_args)
}

fn show_stats(args: &StatsArgs, cli_args: &PhalanxArgs) -> Result<()> {
    let index = load_index(&args.source)?;
    let definition = index.definition();
    let output = StatsOutput {
        index: definition.id.clone(),
        datasources: definition.datasources.clone(),
        fields: definition
            .fields
            .iter()
            .map(|(name, field)| (name.clone(), field.field_type.type_name().to_string()))
            .collect(),
        total_items: index.total_items_count(),
        indexed_items: index.indexed_items_count(),
    };
    output_result(&output, cli_args)
}

/// Create an in-memory index from the given files and index all items.
///
/// Items that fail to index are reported and skipped.
pub fn load_index(source: &IndexSource) -> Result<Index> {
    let config = match &source.config {
        Some(path) => BackendConfig::from_json_file(path)?,
        None => BackendConfig::default(),
    };
    let definition = IndexDefinition::from_json_file(&source.index)?;
    let items = load_items(&source.items)?;

    let server = Server::new("cli", Arc::new(InMemoryBackend::new(config)?));
    let index = server.create_index(definition)?;
    index.track_items_inserted(&items.iter().map(|item| item.id.clone()).collect::<Vec<_>>());

    match index.index_items(&items) {
        Ok(count) => info!("Indexed {count} item(s) from {}", source.items.display()),
        Err(PhalanxError::PartialIndexingFailure { indexed, failed }) => {
            warn!("Indexed {indexed} item(s), skipped {}: {}", failed.len(), failed.join(", "));
        }
        Err(e) => return Err(e),
    }
    Ok(index)
}

/// Read items from a JSON array or a JSONL file.
pub fn load_items(path: &Path) -> Result<Vec<Item>> {
    let content = fs::read_to_string(path)?;
    if content.trim_start().starts_with('[') {
        return Ok(serde_json::from_str(&content)?);
    }

    let reader = BufReader::new(File::open(path)?);
    let mut items = Vec::new();
    for (line_num, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let item = serde_json::from_str(&line).map_err(|e| {
            PhalanxError::other(format!("Invalid item on line {}: {e}", line_num + 1))
        })?;
        items.push(item);
    }
    Ok(items)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    fn write_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_items_jsonl_and_array() {
        let jsonl = write_file(
            "{\"id\": \"ds/1\", \"datasource_id\": \"ds\", \"fields\": {\"name\": [\"foo\"]}}\n\n{\"id\": \"ds/2\", \"datasource_id\": \"ds\"}\n",
        );
        let items = load_items(jsonl.path()).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].language, "und");

        let array = write_file(r#"[{"id": "ds/1", "datasource_id": "ds", "language": "en"}]"#);
        let items = load_items(array.path()).unwrap();
        assert_eq!(items[0].language, "en");

        let broken = write_file("{\"id\": \"ds/1\", \"datasource_id\": \"ds\"}\nnot json\n");
        assert!(load_items(broken.path()).is_err());
    }

    #[test]
    fn test_load_index_skips_bad_items() {
        let definition = write_file(
            r#"{"id": "test", "datasources": ["ds"], "fields": {"name": {"type": "text"}}}"#,
        );
        let items = write_file(
            "{\"id\": \"ds/1\", \"datasource_id\": \"ds\", \"fields\": {\"name\": [\"foo bar\"]}}\n{\"id\": \"x/2\", \"datasource_id\": \"x\"}\n",
        );
        let source = IndexSource {
            index: definition.path().to_path_buf(),
            items: items.path().to_path_buf(),
            config: None,
        };
        let index = load_index(&source).unwrap();
        assert_eq!(index.total_items_count(), 2);
        assert_eq!(index.indexed_items_count(), 1);

        let mut query = index.query();
        query.keys("bar");
        assert_eq!(query.execute().unwrap().result_count, 1);
    }
}
