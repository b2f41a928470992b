//! Shared fixture and backend conformance battery.
//!
//! The fixture holds five test entities. Every backend must produce exactly
//! the results asserted here.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::Arc;

use phalanx::backend::Backend;
use phalanx::document::Item;
use phalanx::error::{PhalanxError, Result};
use phalanx::facet::{FacetBucket, FacetOperator, FacetSpec};
use phalanx::query::{
    ConditionGroup, ConditionValue, Conjunction, Keys, KeysGroup, Operator, Query, ResultSet,
    SortDirection,
};
use phalanx::schema::{FieldType, IndexDefinition};
use phalanx::server::{Index, Server};

pub const DATASOURCE: &str = "entity:entity_test_mulrev_changed";
pub const INDEX_ID: &str = "database_search_index";

/// 28 code points, 56 bytes.
pub const MB_WORD: &str = "äöüßáŧæøðđŋħĸµäöüßáŧæøðđŋħĸµ";
pub const LONG_WORD: &str = "astringlongerthanfiftycharactersthatcantbestoredbythedbbackend";

pub fn item_id(n: u32) -> String {
    Item::combine_id(DATASOURCE, &format!("{n}:en"))
}

pub fn item_ids(ns: &[u32]) -> Vec<String> {
    ns.iter().map(|n| item_id(*n)).collect()
}

pub fn index_definition() -> IndexDefinition {
    IndexDefinition::new(INDEX_ID)
        .with_datasource(DATASOURCE)
        .with_field("id", FieldType::Integer)
        .with_field("name", FieldType::Text)
        .with_field("body", FieldType::Text)
        .with_field("type", FieldType::String)
        .with_field("keywords", FieldType::String)
        .with_field("category", FieldType::String)
        .with_field("width", FieldType::Decimal)
}

fn entity(n: u32) -> phalanx::document::ItemBuilder {
    Item::builder(DATASOURCE, &format!("{n}:en"))
        .language("en")
        .add_integer("id", i64::from(n))
}

pub fn test_items() -> Vec<Item> {
    vec![
        entity(1)
            .add_text("name", "foo bar baz foobaz föö")
            .add_text("body", "test test case Case casE")
            .add_text("type", "item")
            .add_values("keywords", ["Orange", "orange", "örange", "Orange"])
            .add_text("category", "item_category")
            .build(),
        entity(2)
            .add_text("name", "foo test")
            .add_text("body", "bar test casE")
            .add_text("type", "item")
            .add_values("keywords", ["orange", "apple", "grape"])
            .add_text("category", "item_category")
            .build(),
        entity(3)
            .add_text("name", "bar")
            .add_text("body", "test foobar Case")
            .add_text("type", "item")
            .build(),
        entity(4)
            .add_text("name", "foo baz")
            .add_text("body", "test test test")
            .add_text("type", "article")
            .add_values("keywords", ["apple", "strawberry", "grape"])
            .add_text("category", "article_category")
            .add_text("width", "1.0")
            .build(),
        entity(5)
            .add_text("name", "bar baz")
            .add_text("body", "foo")
            .add_text("type", "article")
            .add_values("keywords", ["orange", "strawberry", "grape", "banana"])
            .add_text("category", "article_category")
            .add_text("width", "2.0")
            .build(),
    ]
}

/// Create the test index on a new server without indexing anything.
pub fn create_index(backend: Arc<dyn Backend>) -> Result<Index> {
    let server = Server::new("database_search_server", backend);
    server.create_index(index_definition())
}

/// Create the test index and index the five test items.
pub fn setup_index(backend: Arc<dyn Backend>) -> Result<Index> {
    let index = create_index(backend)?;
    let count = index.index_items(&test_items())?;
    assert_eq!(count, 5);
    Ok(index)
}

/// Sort on the numeric `id` field.
pub const ID_SORT: Option<&str> = Some("id");
/// Sort on the virtual `search_api_id` field, which orders the fixture the same way.
pub const SEARCH_API_ID_SORT: Option<&str> = Some("search_api_id");

/// A query with range 0..10 and an optional ascending sort on `id_sort`.
pub fn build_search(
    index: &Index,
    keys: Option<Keys>,
    conditions: &[(&str, &str)],
    fields: Option<&[&str]>,
    id_sort: Option<&str>,
) -> Query {
    let mut query = index.query();
    if let Some(keys) = keys {
        query.keys(keys);
        if let Some(fields) = fields {
            query.set_fulltext_fields(fields.iter().copied());
        }
    }
    for (field, value) in conditions {
        query.add_condition(*field, *value, Operator::Eq);
    }
    query.range(0, Some(10));
    if let Some(field) = id_sort {
        query.sort(field, SortDirection::Asc);
    }
    query
}

pub fn search(index: &Index) -> Query {
    build_search(index, None, &[], None, ID_SORT)
}

pub fn search_keys<K: Into<Keys>>(index: &Index, keys: K) -> Query {
    build_search(index, Some(keys.into()), &[], None, SEARCH_API_ID_SORT)
}

/// Assert the result ids and count, without ignored keys or warnings.
pub fn assert_results(expected: &[u32], results: &ResultSet, label: &str) {
    let ids: Vec<String> = results.ids().into_iter().map(String::from).collect();
    assert_eq!(ids, item_ids(expected), "{label}: wrong results");
    assert_eq!(results.result_count, expected.len(), "{label}: wrong result count");
    assert!(results.ignored_search_keys.is_empty(), "{label}: unexpected ignored keys");
    assert!(results.warnings.is_empty(), "{label}: unexpected warnings {:?}", results.warnings);
}

pub fn buckets(expected: &[(u64, &str)]) -> Vec<FacetBucket> {
    expected
        .iter()
        .map(|(count, filter)| FacetBucket::new(*count, *filter))
        .collect()
}

pub fn facets_option(facets: &[(&str, FacetSpec)]) -> BTreeMap<String, FacetSpec> {
    facets
        .iter()
        .map(|(name, spec)| (name.to_string(), spec.clone()))
        .collect()
}

fn term(text: &str) -> Keys {
    Keys::term(text)
}

pub fn search_no_results(index: &Index) -> Result<()> {
    let results = search_keys(index, "test").execute()?;
    assert_results(&[], &results, "Search before indexing");
    Ok(())
}

pub fn search_success(index: &Index) -> Result<()> {
    let mut query = search_keys(index, "test");
    query.range(1, Some(2));
    let results = query.execute()?;
    assert_eq!(results.result_count, 4, "Search for »test« returned correct number of results.");
    assert_eq!(results.ids(), item_ids(&[2, 3]));
    assert!(results.ignored_search_keys.is_empty());
    assert!(results.warnings.is_empty());
    assert_eq!(results.result_items[0].datasource_id, DATASOURCE);
    assert_eq!(results.result_items[0].raw_id(), "2:en");

    let results = search_keys(index, "test foo").execute()?;
    assert_results(&[1, 2, 4], &results, "Search for »test foo«");

    let mut query = build_search(index, Some("foo".into()), &[("type", "item")], None, ID_SORT);
    let results = query.execute()?;
    assert_results(&[1, 2], &results, "Search for »foo«");

    let keys = KeysGroup::new(Conjunction::And)
        .with(term("test"))
        .with(KeysGroup::new(Conjunction::Or).with(term("baz")).with(term("foobar")))
        .with(
            KeysGroup::new(Conjunction::Or)
                .with(term("bar"))
                .with(term("fooblob"))
                .negated(),
        );
    let results = search_keys(index, keys).execute()?;
    assert_results(&[4], &results, "Complex search 1");

    let mut query = search(index);
    query
        .create_and_add_condition_group(Conjunction::Or, Vec::<String>::new())
        .add_condition("name", "bar", Operator::Eq)
        .add_condition("body", "bar", Operator::Eq);
    assert_results(&[1, 2, 3, 5], &query.execute()?, "Search with multi-field fulltext filter");

    let mut query = search(index);
    query.add_condition("keywords", ["grape", "apple"], Operator::In);
    assert_results(&[2, 4, 5], &query.execute()?, "Query with IN filter");

    let mut query = search(index);
    query.add_condition("keywords", ["grape", "apple"], Operator::NotIn);
    assert_results(&[1, 3], &query.execute()?, "Query with NOT IN filter");

    let mut query = search(index);
    query.add_condition("width", ["0.9", "1.5"], Operator::Between);
    assert_results(&[4], &query.execute()?, "Query with BETWEEN filter");

    let mut query = search(index);
    query.add_condition("width", ["0.9", "1.5"], Operator::NotBetween);
    assert_results(&[1, 2, 3, 5], &query.execute()?, "Query with NOT BETWEEN filter");

    let mut query = search(index);
    query
        .set_languages(["und", "en"])
        .add_condition("keywords", ["grape", "apple"], Operator::In);
    assert_results(&[2, 4, 5], &query.execute()?, "Query with IN filter and languages");

    let mut query = search(index);
    query.set_languages(["und"]);
    assert_results(&[], &query.execute()?, "Query with languages");

    let mut query = search(index);
    query
        .create_and_add_condition_group(Conjunction::Or, Vec::<String>::new())
        .add_condition("search_api_language", "und", Operator::Eq)
        .add_condition("width", ["0.9", "1.5"], Operator::Between);
    assert_results(&[4], &query.execute()?, "Query with search_api_language filter");

    let mut query = search(index);
    query
        .add_condition("search_api_language", "und", Operator::Eq)
        .add_condition("width", ["0.9", "1.5"], Operator::Between);
    assert_results(&[], &query.execute()?, "Query with search_api_language filter");

    let mut query = search(index);
    query
        .add_condition("search_api_language", ["und", "en"], Operator::In)
        .add_condition("width", ["0.9", "1.5"], Operator::Between);
    assert_results(&[4], &query.execute()?, "Query with search_api_language IN filter");

    let mut query = search(index);
    query
        .add_condition("search_api_language", ["und", "de"], Operator::NotIn)
        .add_condition("width", ["0.9", "1.5"], Operator::Between);
    assert_results(&[4], &query.execute()?, "Query with search_api_language NOT IN filter");

    let mut query = search(index);
    query.add_condition("search_api_id", item_id(1), Operator::Eq);
    assert_results(&[1], &query.execute()?, "Query with search_api_id filter");

    let mut query = search(index);
    query.add_condition("search_api_id", item_ids(&[2, 4]), Operator::NotIn);
    assert_results(&[1, 3, 5], &query.execute()?, "Query with search_api_id NOT IN filter");

    let mut query = search(index);
    query.add_condition("search_api_id", item_id(3), Operator::Gt);
    assert_results(&[4, 5], &query.execute()?, "Query with search_api_id greater than filter");

    let mut query = search(index);
    query.add_condition("search_api_datasource", "foobar", Operator::Eq);
    assert_results(&[], &query.execute()?, "Query for a non-existing datasource");

    let mut query = search(index);
    query.add_condition("search_api_datasource", ["foobar", DATASOURCE], Operator::In);
    assert_results(
        &[1, 2, 3, 4, 5],
        &query.execute()?,
        "Query with search_api_datasource IN filter",
    );

    let mut query = search(index);
    query.add_condition("search_api_datasource", ["foobar", DATASOURCE], Operator::NotIn);
    assert_results(&[], &query.execute()?, "Query with search_api_datasource NOT IN filter");

    // Without keys only the last sort has an effect.
    let mut query = build_search(index, None, &[], None, None);
    query
        .sort("search_api_relevance", SortDirection::Asc)
        .sort("search_api_datasource", SortDirection::Desc)
        .sort("search_api_language", SortDirection::Asc)
        .sort("search_api_id", SortDirection::Desc);
    assert_results(&[5, 4, 3, 2, 1], &query.execute()?, "Query with magic sorts");

    Ok(())
}

pub fn check_facets(index: &Index) -> Result<()> {
    let or_category = FacetSpec::new("category")
        .with_missing(true)
        .with_operator(FacetOperator::Or);

    // OR facets ignore condition groups tagged for them.
    let mut query = search(index);
    query
        .create_and_add_condition_group(Conjunction::Or, ["facet:category"])
        .add_condition("category", "article_category", Operator::Eq);
    query.set_facets(&facets_option(&[("category", or_category.clone())]))?;
    let results = query.execute()?;
    assert_results(&[4, 5], &results, "OR facets query");
    assert_eq!(
        results.facet("category"),
        Some(buckets(&[(2, "\"article_category\""), (2, "\"item_category\""), (1, "!")]))
    );

    // Also when the tagged group is nested.
    let mut query = search(index);
    let mut tagged = query.create_condition_group(Conjunction::Or, ["facet:category"]);
    tagged.add_condition("category", "article_category", Operator::Eq);
    query
        .create_and_add_condition_group(Conjunction::And, Vec::<String>::new())
        .add_condition_group(tagged);
    query.set_facets(&facets_option(&[("category", or_category.clone())]))?;
    let results = query.execute()?;
    assert_results(&[4, 5], &results, "Nested OR facets query");
    assert_eq!(
        results.facet("category"),
        Some(buckets(&[(2, "\"article_category\""), (2, "\"item_category\""), (1, "!")]))
    );

    // Other condition groups still apply.
    let mut query = search(index);
    query
        .create_and_add_condition_group(Conjunction::Or, ["facet:category"])
        .add_condition("category", "article_category", Operator::Eq);
    query
        .create_and_add_condition_group(Conjunction::And, Vec::<String>::new())
        .add_condition("category", ConditionValue::Null, Operator::NotEq);
    query.set_facets(&facets_option(&[("category", or_category)]))?;
    let results = query.execute()?;
    assert_results(&[4, 5], &results, "OR facets query with other groups");
    assert_eq!(
        results.facet("category"),
        Some(buckets(&[(2, "\"article_category\""), (2, "\"item_category\"")]))
    );

    // AND facets keep every condition.
    let mut query = search(index);
    query
        .create_and_add_condition_group(Conjunction::Or, ["facet:category"])
        .add_condition("category", "article_category", Operator::Eq);
    query.set_facets(&facets_option(&[(
        "category",
        FacetSpec::new("category").with_missing(true),
    )]))?;
    let results = query.execute()?;
    assert_results(&[4, 5], &results, "AND facets query");
    assert_eq!(
        results.facet("category"),
        Some(buckets(&[(2, "\"article_category\"")]))
    );

    Ok(())
}

pub fn regression_tests(index: &Index) -> Result<()> {
    sorting_and_or_filters_with_nulls(index)?;
    or_filters_on_multi_valued_fields(index)?;
    missing_facet_only_when_requested(index)?;
    missing_bucket_below_min_count(index)?;
    or_keywords(index)?;
    negated_keywords(index)?;
    null_filters(index)?;
    facets_with_zero_min_count(index)?;
    facets_on_fulltext_fields(index)?;
    facets_for_multi_word_searches(index)?;
    facets_with_min_count_above_one(index)?;
    multiple_or_facets(index)?;
    empty_string_conditions(index)?;
    null_conditions_on_fulltext_fields(index)?;
    Ok(())
}

pub fn sorting_and_or_filters_with_nulls(index: &Index) -> Result<()> {
    let mut query = build_search(index, Some("test".into()), &[], None, None);
    query.sort("id", SortDirection::Asc).sort("type", SortDirection::Asc);
    assert_results(&[1, 2, 3, 4], &query.execute()?, "Sorting on field with NULLs");

    let mut query = build_search(index, None, &[], None, None);
    query
        .create_and_add_condition_group(Conjunction::Or, Vec::<String>::new())
        .add_condition("id", 3, Operator::Eq)
        .add_condition("type", "article", Operator::Eq);
    query.sort("search_api_id", SortDirection::Desc);
    assert_results(&[5, 4, 3], &query.execute()?, "OR filter on field with NULLs");
    Ok(())
}

pub fn or_filters_on_multi_valued_fields(index: &Index) -> Result<()> {
    let mut query = search(index);
    query
        .create_and_add_condition_group(Conjunction::Or, Vec::<String>::new())
        .add_condition("keywords", "orange", Operator::Eq)
        .add_condition("keywords", "apple", Operator::Eq);
    assert_results(&[1, 2, 4, 5], &query.execute()?, "OR filter on multi-valued field");

    let mut query = search(index);
    query
        .create_and_add_condition_group(Conjunction::Or, Vec::<String>::new())
        .add_condition("keywords", "orange", Operator::Eq)
        .add_condition("keywords", "strawberry", Operator::Eq);
    query
        .create_and_add_condition_group(Conjunction::Or, Vec::<String>::new())
        .add_condition("keywords", "apple", Operator::Eq)
        .add_condition("keywords", "grape", Operator::Eq);
    assert_results(&[2, 4, 5], &query.execute()?, "Multiple OR filters on multi-valued field");

    let mut query = search(index);
    let mut first = ConditionGroup::new(Conjunction::And);
    first
        .add_condition("keywords", "orange", Operator::Eq)
        .add_condition("keywords", "apple", Operator::Eq);
    let mut second = ConditionGroup::new(Conjunction::And);
    second
        .add_condition("keywords", "strawberry", Operator::Eq)
        .add_condition("keywords", "grape", Operator::Eq);
    query
        .create_and_add_condition_group(Conjunction::Or, Vec::<String>::new())
        .add_condition_group(first)
        .add_condition_group(second);
    assert_results(&[2, 4, 5], &query.execute()?, "Complex nested filters on multi-valued field");
    Ok(())
}

pub fn missing_facet_only_when_requested(index: &Index) -> Result<()> {
    let spec = FacetSpec::new("category").with_missing(true);
    let mut query = search(index);
    query.set_facets(&facets_option(&[("category", spec.clone())]))?;
    query.range(0, Some(0));
    let results = query.execute()?;
    assert_eq!(
        results.facet("category"),
        Some(buckets(&[(2, "\"article_category\""), (2, "\"item_category\""), (1, "!")]))
    );

    let mut query = search(index);
    query.set_facets(&facets_option(&[("category", spec.with_missing(false))]))?;
    query.range(0, Some(0));
    let results = query.execute()?;
    assert_eq!(
        results.facet("category"),
        Some(buckets(&[(2, "\"article_category\""), (2, "\"item_category\"")]))
    );
    Ok(())
}

/// The missing bucket obeys the minimum count like any other bucket.
pub fn missing_bucket_below_min_count(index: &Index) -> Result<()> {
    let spec = FacetSpec::new("category").with_min_count(2).with_missing(true);
    let mut query = search(index);
    query.set_facets(&facets_option(&[("category", spec)]))?;
    query.range(0, Some(0));
    let results = query.execute()?;
    assert_eq!(results.result_count, 5);
    assert_eq!(
        results.facet("category"),
        Some(buckets(&[(2, "\"article_category\""), (2, "\"item_category\"")]))
    );
    Ok(())
}

pub fn or_keywords(index: &Index) -> Result<()> {
    let keys: Keys = KeysGroup::new(Conjunction::Or).with(term("foo")).with(term("test")).into();
    let mut query = build_search(
        index,
        Some(keys.clone()),
        &[],
        Some(&["name"][..]),
        SEARCH_API_ID_SORT,
    );
    let results = query.execute()?;
    assert_results(&[1, 2, 4], &results, "OR keywords");

    let mut query = build_search(index, Some(keys), &[], Some(&["name", "body"][..]), ID_SORT);
    query.range(0, Some(0));
    let results = query.execute()?;
    assert_eq!(
        results.result_count, 5,
        "Multi-field OR keywords returned correct number of results."
    );
    assert!(results.result_items.is_empty());
    assert!(results.ignored_search_keys.is_empty());
    assert!(results.warnings.is_empty());

    let keys: Keys = KeysGroup::new(Conjunction::Or)
        .with(term("foo"))
        .with(term("test"))
        .with(KeysGroup::new(Conjunction::And).with(term("bar")).with(term("baz")))
        .into();
    let mut query = build_search(index, Some(keys), &[], Some(&["name"][..]), SEARCH_API_ID_SORT);
    let results = query.execute()?;
    assert_results(&[1, 2, 4, 5], &results, "Nested OR keywords");

    let keys: Keys = KeysGroup::new(Conjunction::Or)
        .with(KeysGroup::new(Conjunction::And).with(term("foo")).with(term("test")))
        .with(KeysGroup::new(Conjunction::And).with(term("bar")).with(term("baz")))
        .into();
    let mut query = build_search(index, Some(keys), &[], Some(&["name", "body"][..]), ID_SORT);
    let results = query.execute()?;
    assert_results(&[1, 2, 4, 5], &results, "Nested multi-field OR keywords");
    Ok(())
}

pub fn negated_keywords(index: &Index) -> Result<()> {
    let keys = KeysGroup::new(Conjunction::And).with(term("foo")).with(term("bar")).negated();
    assert_results(&[3, 4], &search_keys(index, keys).execute()?, "Negated AND fulltext search");

    let keys = KeysGroup::new(Conjunction::Or).with(term("foo")).with(term("baz")).negated();
    assert_results(&[3], &search_keys(index, keys).execute()?, "Negated OR fulltext search");

    let keys = KeysGroup::new(Conjunction::And).with(term("test")).with(
        KeysGroup::new(Conjunction::And)
            .with(term("foo"))
            .with(term("bar"))
            .negated(),
    );
    assert_results(&[3, 4], &search_keys(index, keys).execute()?, "Nested NOT AND fulltext search");
    Ok(())
}

pub fn null_filters(index: &Index) -> Result<()> {
    let mut query = search(index);
    query.add_condition("category", ConditionValue::Null, Operator::Eq);
    assert_results(&[3], &query.execute()?, "NULL filter");

    let mut query = search(index);
    query.add_condition("category", ConditionValue::Null, Operator::NotEq);
    assert_results(&[1, 2, 4, 5], &query.execute()?, "NOT NULL filter");
    Ok(())
}

pub fn facets_with_zero_min_count(index: &Index) -> Result<()> {
    let mut query = search(index);
    query.set_facets(&facets_option(&[(
        "type",
        FacetSpec::new("type").with_min_count(0).with_missing(true),
    )]))?;
    query.add_condition("type", "article", Operator::Eq);
    query.range(0, Some(0));
    let results = query.execute()?;
    assert_eq!(
        results.facet("type"),
        Some(buckets(&[(2, "\"article\""), (0, "!"), (0, "\"item\"")]))
    );
    Ok(())
}

pub fn facets_on_fulltext_fields(index: &Index) -> Result<()> {
    let mut query = search(index);
    query.set_facets(&facets_option(&[("body", FacetSpec::new("body"))]))?;
    query.add_condition("id", 5, Operator::NotEq);
    query.range(0, Some(0));
    let results = query.execute()?;
    assert_eq!(
        results.facet("body"),
        Some(buckets(&[
            (4, "\"test\""),
            (2, "\"Case\""),
            (2, "\"casE\""),
            (1, "\"bar\""),
            (1, "\"case\""),
            (1, "\"foobar\""),
        ]))
    );
    Ok(())
}

pub fn facets_for_multi_word_searches(index: &Index) -> Result<()> {
    let mut query = search_keys(index, "test foo");
    query.set_facets(&facets_option(&[("type", FacetSpec::new("type").with_missing(true))]))?;
    query.range(0, Some(0));
    let results = query.execute()?;
    assert_eq!(
        results.facet("type"),
        Some(buckets(&[(2, "\"item\""), (1, "\"article\"")]))
    );
    Ok(())
}

pub fn facets_with_min_count_above_one(index: &Index) -> Result<()> {
    let mut query = search_keys(index, "test foo");
    query.set_facets(&facets_option(&[(
        "type",
        FacetSpec::new("type").with_min_count(2).with_missing(true),
    )]))?;
    query.range(0, Some(0));
    let results = query.execute()?;
    assert_eq!(results.facet("type"), Some(buckets(&[(2, "\"item\"")])));
    Ok(())
}

pub fn multiple_or_facets(index: &Index) -> Result<()> {
    let mut query = search(index);
    query
        .create_and_add_condition_group(Conjunction::Or, ["facet:type"])
        .add_condition("type", "article", Operator::Eq);
    query.set_facets(&facets_option(&[
        ("type", FacetSpec::new("type").with_operator(FacetOperator::Or)),
        ("category", FacetSpec::new("category").with_operator(FacetOperator::Or)),
    ]))?;
    let results = query.execute()?;
    assert_results(&[4, 5], &results, "Multi-facets query");
    assert_eq!(
        results.facet("type"),
        Some(buckets(&[(3, "\"item\""), (2, "\"article\"")]))
    );
    assert_eq!(
        results.facet("category"),
        Some(buckets(&[(2, "\"article_category\"")]))
    );
    Ok(())
}

pub fn empty_string_conditions(index: &Index) -> Result<()> {
    let results = build_search(index, None, &[("type", "")], None, SEARCH_API_ID_SORT).execute()?;
    assert_results(&[], &results, "Search for empty-string type");

    let results = build_search(index, None, &[("category", "")], None, ID_SORT).execute()?;
    assert_results(&[], &results, "Search for empty-string category");

    let mut query = search(index);
    query.add_condition("category", "", Operator::NotEq);
    assert_results(
        &[1, 2, 3, 4, 5],
        &query.execute()?,
        "Search for items with category not an empty string",
    );

    let mut query = search(index);
    query
        .add_condition("category", "", Operator::Lt)
        .add_condition("category", ["", "foo"], Operator::Between)
        .add_condition("category", ["", "a", "b"], Operator::NotIn);
    assert_results(&[], &query.execute()?, "Search with various empty-string filters");
    Ok(())
}

pub fn null_conditions_on_fulltext_fields(index: &Index) -> Result<()> {
    let mut without_name = test_items().remove(2);
    without_name.fields.remove("name");
    index.index_items(&[without_name])?;

    let mut query = search(index);
    query.add_condition("name", ConditionValue::Null, Operator::Eq);
    assert_results(&[3], &query.execute()?, "Search for items without name");

    let mut query = search(index);
    query.add_condition("name", ConditionValue::Null, Operator::NotEq);
    assert_results(&[1, 2, 4, 5], &query.execute()?, "Search for items with name");

    index.index_items(&[test_items().remove(2)])?;
    Ok(())
}

/// Clear the index and check that reindexing restores it.
pub fn clear_round_trip(index: &Index) -> Result<()> {
    index.clear()?;
    assert_eq!(search(index).execute()?.result_count, 0);
    assert_eq!(index.indexed_items_count(), 0);

    let count = index.index_items(&test_items())?;
    assert_eq!(count, 5);
    assert_results(&[1, 2, 3, 4, 5], &search(index).execute()?, "Search after reindexing");
    Ok(())
}

pub fn regression_tests_2(index: &Index) -> Result<()> {
    let definition = index.definition().with_field("prices", FieldType::Decimal);
    index.update_definition(definition)?;

    filters_on_multi_valued_decimals(index)?;
    items_with_empty_values(index)?;
    overlong_words(index)?;
    multibyte_words(index)?;
    Ok(())
}

pub fn filters_on_multi_valued_decimals(index: &Index) -> Result<()> {
    assert_eq!(index.index_items(&[extra_item(6)])?, 1);

    let mut query = build_search(index, None, &[("prices", "3.25")], None, SEARCH_API_ID_SORT);
    let results = query.execute()?;
    assert_results(&[6], &results, "Filter on decimal field");

    let results = build_search(index, None, &[("prices", "3.5")], None, ID_SORT).execute()?;
    assert_results(&[6], &results, "Filter on decimal field");

    let mut query = search(index);
    query.add_condition("prices", [3.6, 3.8], Operator::Between);
    assert_results(&[6], &query.execute()?, "BETWEEN filter on multi-valued field");

    let mut query = search(index);
    query.add_condition("prices", [3.6, 3.8], Operator::NotBetween);
    assert_results(&[1, 2, 3, 4, 5], &query.execute()?, "NOT BETWEEN filter on multi-valued field");
    Ok(())
}

pub fn items_with_empty_values(index: &Index) -> Result<()> {
    assert_eq!(index.index_items(&[extra_item(7)])?, 1);
    Ok(())
}

fn all_items(extra: &[u32]) -> Vec<Item> {
    let mut items = test_items();
    for n in extra {
        items.push(extra_item(*n));
    }
    items
}

fn extra_item(n: u32) -> Item {
    match n {
        6 => entity(6)
            .add_values("prices", ["3.5", "3.25", "3.75", "3.5"])
            .add_text("type", "item")
            .build(),
        7 => entity(7).add_text("type", "item").build(),
        8 => entity(8)
            .add_text("name", "Article with long body")
            .add_text("type", "article")
            .add_text("body", LONG_WORD)
            .build(),
        _ => entity(9)
            .add_text("name", "Test item 9")
            .add_text("type", "item")
            .add_text("body", vec![MB_WORD; 8].join(" "))
            .build(),
    }
}

fn set_body_type(index: &Index, field_type: FieldType) -> Result<()> {
    let mut definition = index.definition();
    definition.set_field_type("body", field_type)?;
    index.update_definition(definition)
}

pub fn overlong_words(index: &Index) -> Result<()> {
    assert_eq!(index.index_items(&[extra_item(8)])?, 1);

    set_body_type(index, FieldType::String)?;
    let items = all_items(&[6, 7, 8]);
    assert_eq!(index.index_items(&items)?, items.len());

    let mut query = build_search(index, None, &[("body", LONG_WORD)], None, SEARCH_API_ID_SORT);
    let results = query.execute()?;
    assert_results(&[8], &results, "Filter on new string field");

    set_body_type(index, FieldType::Text)?;
    assert_eq!(index.index_items(&items)?, items.len());
    Ok(())
}

pub fn multibyte_words(index: &Index) -> Result<()> {
    assert_eq!(index.index_items(&[extra_item(9)])?, 1);

    let results = search_keys(index, Keys::term(MB_WORD)).execute()?;
    assert_results(&[9], &results, "Search for word with 28 multi-byte characters");

    let results = search_keys(index, Keys::term(format!("{MB_WORD}ä"))).execute()?;
    assert_results(&[], &results, "Search for unknown word with 29 multi-byte characters");

    set_body_type(index, FieldType::String)?;
    let items = all_items(&[6, 7, 8, 9]);
    assert_eq!(index.index_items(&items)?, items.len());

    let body = vec![MB_WORD; 8].join(" ");
    let results = build_search(index, None, &[("body", body.as_str())], None, ID_SORT).execute()?;
    assert_results(&[9], &results, "Search for body with 231 multi-byte characters");

    let longer = format!("{body}ä");
    let mut query = build_search(index, None, &[("body", longer.as_str())], None, SEARCH_API_ID_SORT);
    let results = query.execute()?;
    assert_results(&[], &results, "Search for unknown body with 232 multi-byte characters");

    set_body_type(index, FieldType::Text)?;
    Ok(())
}

/// An index without fields still holds and counts items.
pub fn index_without_fields(server: &Server) -> Result<Index> {
    let definition = IndexDefinition::new("test_index_2").with_datasource(DATASOURCE);
    let index = server.create_index(definition)?;
    assert_eq!(index.index_items(&test_items())?, 5);
    assert_eq!(index.query().execute()?.result_count, 5);
    Ok(index)
}

/// Run the complete battery against a backend.
pub fn run_backend_battery(backend: Arc<dyn Backend>) -> Result<()> {
    let index = create_index(backend)?;
    search_no_results(&index)?;

    index.track_items_inserted(&item_ids(&[1, 2, 3, 4, 5]));
    assert_eq!(index.index_items(&test_items())?, 5);
    assert_eq!(index.indexed_items_count(), 5);

    search_success(&index)?;
    check_facets(&index)?;
    regression_tests(&index)?;
    clear_round_trip(&index)?;
    regression_tests_2(&index)?;

    let second = index_without_fields(index.server())?;
    index.server().delete_index(&second)?;
    index.server().delete_index(&index)?;
    assert!(matches!(index.query().execute(), Err(PhalanxError::InvalidQuery(_))));
    Ok(())
}
