//! Indexed item storage of the in-memory backend.

use std::collections::BTreeMap;

use ahash::AHashMap;
use chrono::DateTime;
use log::{debug, warn};

use crate::analysis::analyzer::Analyzer;
use crate::analysis::token_filter::truncate::truncate_chars;
use crate::config::BackendConfig;
use crate::document::field_value::FieldValue;
use crate::document::item::Item;
use crate::error::{PhalanxError, Result};
use crate::query::matcher::ItemView;
use crate::schema::{FIELD_DATASOURCE, FIELD_ID, FIELD_LANGUAGE, FieldType, IndexDefinition};

/// The indexed form of an item.
#[derive(Debug, Clone)]
pub struct StoredItem {
    pub id: String,
    pub datasource_id: String,
    pub language: String,
    /// Coerced values per field, tokens for fulltext fields, plus the
    /// virtual fields.
    values: AHashMap<String, Vec<FieldValue>>,
    /// Lowercased token counts per fulltext field.
    terms: AHashMap<String, AHashMap<String, u32>>,
}

impl StoredItem {
    /// Build the indexed form of an item under an index definition.
    pub fn build(
        item: &Item,
        definition: &IndexDefinition,
        analyzer: &dyn Analyzer,
        config: &BackendConfig,
    ) -> Result<Self> {
        let mut stored = StoredItem {
            id: item.id.clone(),
            datasource_id: item.datasource_id.clone(),
            language: item.language.clone(),
            values: AHashMap::new(),
            terms: AHashMap::new(),
        };
        stored.values.insert(FIELD_ID.to_string(), vec![item.id.as_str().into()]);
        stored
            .values
            .insert(FIELD_DATASOURCE.to_string(), vec![item.datasource_id.as_str().into()]);
        stored
            .values
            .insert(FIELD_LANGUAGE.to_string(), vec![item.language.as_str().into()]);

        for (name, values) in &item.fields {
            let Some(field_type) = definition.field_type(name) else {
                debug!(
                    "Skipping field '{name}' of item '{}': not part of index '{}'",
                    item.id, definition.id
                );
                continue;
            };
            if field_type == FieldType::Text {
                stored.add_text(name, values, analyzer)?;
                continue;
            }
            let coerced: Vec<FieldValue> = values
                .iter()
                .filter_map(|value| {
                    let result = coerce(value, field_type, config);
                    if result.is_none() {
                        warn!(
                            "Dropping value '{value}' of field '{name}' on item '{}': not a valid {}",
                            item.id,
                            field_type.type_name()
                        );
                    }
                    result
                })
                .collect();
            if !coerced.is_empty() {
                stored.values.insert(name.clone(), coerced);
            }
        }
        Ok(stored)
    }

    fn add_text(
        &mut self,
        name: &str,
        values: &[FieldValue],
        analyzer: &dyn Analyzer,
    ) -> Result<()> {
        let mut tokens = Vec::new();
        let mut terms: AHashMap<String, u32> = AHashMap::new();
        for value in values {
            for token in analyzer.analyze(&value.to_string())? {
                if token.is_stopped() {
                    continue;
                }
                *terms.entry(token.text.to_lowercase()).or_default() += 1;
                tokens.push(FieldValue::Text(token.text));
            }
        }
        if !tokens.is_empty() {
            self.values.insert(name.to_string(), tokens);
            self.terms.insert(name.to_string(), terms);
        }
        Ok(())
    }
}

fn coerce(value: &FieldValue, field_type: FieldType, config: &BackendConfig) -> Option<FieldValue> {
    match field_type {
        FieldType::Text | FieldType::String => {
            let text = value.to_string();
            let truncated = truncate_chars(&text, config.max_string_chars);
            if truncated.len() < text.len() {
                warn!(
                    "A string value longer than {} characters was truncated while indexing: {text}",
                    config.max_string_chars
                );
            }
            Some(FieldValue::Text(truncated.to_string()))
        }
        FieldType::Integer => value.as_integer().map(FieldValue::Integer),
        FieldType::Decimal => value.as_float().map(FieldValue::Float),
        FieldType::Boolean => value.as_boolean().map(FieldValue::Boolean),
        FieldType::Date => value
            .as_timestamp()
            .and_then(|ts| DateTime::from_timestamp(ts, 0))
            .map(FieldValue::DateTime),
    }
}

impl ItemView for StoredItem {
    fn values(&self, field: &str) -> &[FieldValue] {
        self.values.get(field).map_or(&[], Vec::as_slice)
    }

    fn term_frequency(&self, field: &str, token: &str) -> u32 {
        self.terms
            .get(field)
            .and_then(|terms| terms.get(token))
            .copied()
            .unwrap_or(0)
    }
}

/// All data of one index.
#[derive(Debug, Clone)]
pub struct MemoryIndex {
    definition: IndexDefinition,
    /// Indexed items ordered by id.
    items: BTreeMap<String, StoredItem>,
    /// Items as received, kept for reindexing on definition changes.
    sources: BTreeMap<String, Item>,
}

impl MemoryIndex {
    pub fn new(definition: IndexDefinition) -> Self {
        MemoryIndex {
            definition,
            items: BTreeMap::new(),
            sources: BTreeMap::new(),
        }
    }

    pub fn definition(&self) -> &IndexDefinition {
        &self.definition
    }

    pub fn items(&self) -> impl Iterator<Item = &StoredItem> {
        self.items.values()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Index a batch. Returns the number of indexed items and the ids of the
    /// items that failed.
    pub fn index_items(
        &mut self,
        items: &[Item],
        analyzer: &dyn Analyzer,
        config: &BackendConfig,
    ) -> (usize, Vec<String>) {
        let mut indexed = 0;
        let mut failed = Vec::new();
        for item in items {
            match self.index_item(item, analyzer, config) {
                Ok(()) => indexed += 1,
                Err(e) => {
                    warn!(
                        "Failed to index item '{}' on index '{}': {e}",
                        item.id, self.definition.id
                    );
                    failed.push(item.id.clone());
                }
            }
        }
        (indexed, failed)
    }

    fn index_item(
        &mut self,
        item: &Item,
        analyzer: &dyn Analyzer,
        config: &BackendConfig,
    ) -> Result<()> {
        if item.id.is_empty() {
            return Err(PhalanxError::invalid_query("Item id must not be empty"));
        }
        let id_datasource = Item::split_id(&item.id).map(|(datasource_id, _)| datasource_id);
        if id_datasource != Some(item.datasource_id.as_str()) {
            return Err(PhalanxError::invalid_query(format!(
                "Item id '{}' does not belong to datasource '{}'",
                item.id, item.datasource_id
            )));
        }
        if !self.definition.has_datasource(&item.datasource_id) {
            return Err(PhalanxError::invalid_query(format!(
                "Datasource '{}' is not part of index '{}'",
                item.datasource_id, self.definition.id
            )));
        }
        let stored = StoredItem::build(item, &self.definition, analyzer, config)?;
        self.items.insert(item.id.clone(), stored);
        self.sources.insert(item.id.clone(), item.clone());
        Ok(())
    }

    pub fn delete_items(&mut self, item_ids: &[String]) {
        for id in item_ids {
            self.items.remove(id);
            self.sources.remove(id);
        }
    }

    pub fn clear(&mut self, datasource_id: Option<&str>) {
        match datasource_id {
            Some(datasource_id) => {
                self.items.retain(|_, item| item.datasource_id != datasource_id);
                self.sources.retain(|_, item| item.datasource_id != datasource_id);
            }
            None => {
                self.items.clear();
                self.sources.clear();
            }
        }
    }

    /// Switch to a new definition and rebuild every item under it. Items of
    /// datasources the new definition lacks are dropped.
    pub fn update_definition(
        &mut self,
        definition: IndexDefinition,
        analyzer: &dyn Analyzer,
        config: &BackendConfig,
    ) -> usize {
        self.definition = definition;
        let sources: Vec<Item> = std::mem::take(&mut self.sources).into_values().collect();
        self.items.clear();
        let (indexed, failed) = self.index_items(&sources, analyzer, config);
        if !failed.is_empty() {
            debug!(
                "Dropped {} item(s) from index '{}' after definition change",
                failed.len(),
                self.definition.id
            );
        }
        indexed
    }
}
