//! In-process evaluation of compiled queries.
//!
//! Conditions, keys and sorts are compiled against an [`IndexDefinition`]
//! once per execution, which is also where malformed input is rejected. The
//! compiled forms are then evaluated against any [`ItemView`], so every backend
//! that evaluates queries itself shares the same NULL, multi-value and
//! negation semantics.

use std::cmp::Ordering;

use crate::analysis::analyzer::Analyzer;
use crate::document::field_value::FieldValue;
use crate::error::{PhalanxError, Result};
use crate::query::condition::{Condition, ConditionValue, Operator};
use crate::query::condition_group::{Clause, ConditionGroup, Conjunction};
use crate::query::keys::Keys;
use crate::query::sort::{Sort, SortDirection};
use crate::schema::{FieldKind, FieldType, IndexDefinition};

/// Read access to the indexed form of an item.
pub trait ItemView {
    /// Stored values of a field, including virtual fields. Fulltext fields
    /// expose their tokens.
    fn values(&self, field: &str) -> &[FieldValue];

    /// Number of occurrences of a lowercased token in a fulltext field.
    fn term_frequency(&self, field: &str, token: &str) -> u32;
}

/// A value normalized for comparison under a field type.
#[derive(Debug, Clone, PartialEq)]
pub enum Comparable {
    Number(f64),
    Text(String),
    Bool(bool),
}

impl Comparable {
    /// Normalize a value for a field of the given type.
    pub fn from_value(value_type: FieldType, value: &FieldValue) -> Option<Self> {
        match value_type {
            FieldType::Text | FieldType::String => Some(Comparable::Text(value.to_string())),
            FieldType::Integer | FieldType::Decimal => value.as_float().map(Comparable::Number),
            FieldType::Date => value.as_timestamp().map(|ts| Comparable::Number(ts as f64)),
            FieldType::Boolean => value.as_boolean().map(Comparable::Bool),
        }
    }

    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Comparable::Number(a), Comparable::Number(b)) => a.partial_cmp(b),
            (Comparable::Text(a), Comparable::Text(b)) => Some(a.cmp(b)),
            (Comparable::Bool(a), Comparable::Bool(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    fn equals(&self, other: &Self) -> bool {
        self.compare(other) == Some(Ordering::Equal)
    }

    fn within(&self, low: &Self, high: &Self) -> bool {
        matches!(self.compare(low), Some(Ordering::Greater | Ordering::Equal))
            && matches!(self.compare(high), Some(Ordering::Less | Ordering::Equal))
    }
}

#[derive(Debug, Clone)]
enum Predicate {
    IsNull,
    IsNotNull,
    Compare(Operator, Comparable),
    In(Vec<Comparable>),
    NotIn(Vec<Comparable>),
    Between(Comparable, Comparable),
    NotBetween(Comparable, Comparable),
}

/// A condition resolved against an index.
#[derive(Debug, Clone)]
pub struct CompiledCondition {
    field: String,
    value_type: FieldType,
    predicate: Predicate,
}

impl CompiledCondition {
    pub fn compile(condition: &Condition, index: &IndexDefinition) -> Result<Self> {
        condition.validate()?;

        let field = condition.field();
        let kind = index.resolve(field).ok_or_else(|| {
            PhalanxError::invalid_query(format!("Unknown field '{field}' on index '{}'", index.id))
        })?;
        if kind == FieldKind::Relevance {
            return Err(PhalanxError::unsupported(format!(
                "Conditions on '{field}' are not supported"
            )));
        }

        let value_type = kind.value_type();
        let coerce = |value: &FieldValue| {
            Comparable::from_value(value_type, value).ok_or_else(|| {
                PhalanxError::invalid_query(format!(
                    "Value '{value}' cannot be compared with {} field '{field}'",
                    value_type.type_name()
                ))
            })
        };
        let coerce_all = |values: &[FieldValue]| {
            values.iter().map(|v| coerce(v)).collect::<Result<Vec<_>>>()
        };

        let predicate = match (condition.operator(), condition.value()) {
            (Operator::Eq, ConditionValue::Null) => Predicate::IsNull,
            (Operator::NotEq, ConditionValue::Null) => Predicate::IsNotNull,
            (operator, ConditionValue::Scalar(value)) => {
                Predicate::Compare(operator, coerce(value)?)
            }
            (Operator::In, ConditionValue::List(values)) => Predicate::In(coerce_all(values)?),
            (Operator::NotIn, ConditionValue::List(values)) => {
                Predicate::NotIn(coerce_all(values)?)
            }
            (operator, ConditionValue::List(bounds)) => {
                let mut bounds = coerce_all(bounds)?.into_iter();
                match (bounds.next(), bounds.next(), operator) {
                    (Some(low), Some(high), Operator::Between) => Predicate::Between(low, high),
                    (Some(low), Some(high), _) => Predicate::NotBetween(low, high),
                    _ => {
                        return Err(PhalanxError::invalid_query(format!(
                            "Operator {operator} on field '{field}' requires exactly two bounds"
                        )));
                    }
                }
            }
            (operator, ConditionValue::Null) => {
                return Err(PhalanxError::invalid_query(format!(
                    "Operator {operator} on field '{field}' requires a value"
                )));
            }
        };

        Ok(CompiledCondition {
            field: field.to_string(),
            value_type,
            predicate,
        })
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn matches<V: ItemView + ?Sized>(&self, item: &V) -> bool {
        let raw = item.values(&self.field);
        let mut values = raw
            .iter()
            .filter_map(|value| Comparable::from_value(self.value_type, value));

        match &self.predicate {
            Predicate::IsNull => raw.is_empty(),
            Predicate::IsNotNull => !raw.is_empty(),
            Predicate::Compare(Operator::NotEq, target) => values.all(|v| !v.equals(target)),
            Predicate::Compare(operator, target) => values.any(|v| {
                let ordering = v.compare(target);
                match operator {
                    Operator::Lt => ordering == Some(Ordering::Less),
                    Operator::Le => matches!(ordering, Some(Ordering::Less | Ordering::Equal)),
                    Operator::Gt => ordering == Some(Ordering::Greater),
                    Operator::Ge => matches!(ordering, Some(Ordering::Greater | Ordering::Equal)),
                    _ => ordering == Some(Ordering::Equal),
                }
            }),
            Predicate::In(set) => values.any(|v| set.iter().any(|s| v.equals(s))),
            Predicate::NotIn(set) => values.all(|v| !set.iter().any(|s| v.equals(s))),
            Predicate::Between(low, high) => values.any(|v| v.within(low, high)),
            Predicate::NotBetween(low, high) => values.all(|v| !v.within(low, high)),
        }
    }
}

#[derive(Debug, Clone)]
enum CompiledClause {
    Condition(CompiledCondition),
    Group(CompiledGroup),
}

/// A condition group resolved against an index.
#[derive(Debug, Clone)]
pub struct CompiledGroup {
    conjunction: Conjunction,
    negation: bool,
    children: Vec<CompiledClause>,
}

impl CompiledGroup {
    pub fn compile(group: &ConditionGroup, index: &IndexDefinition) -> Result<Self> {
        let children = group
            .children()
            .iter()
            .map(|child| match child {
                Clause::Condition(condition) => {
                    CompiledCondition::compile(condition, index).map(CompiledClause::Condition)
                }
                Clause::Group(group) => {
                    CompiledGroup::compile(group, index).map(CompiledClause::Group)
                }
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(CompiledGroup {
            conjunction: group.conjunction(),
            negation: group.is_negated(),
            children,
        })
    }

    /// Evaluate the group. A negated group is the complement of its
    /// non-negated form.
    pub fn matches<V: ItemView + ?Sized>(&self, item: &V) -> bool {
        let child_matches = |child: &CompiledClause| match child {
            CompiledClause::Condition(condition) => condition.matches(item),
            CompiledClause::Group(group) => group.matches(item),
        };
        let matched = match self.conjunction {
            Conjunction::And => self.children.iter().all(child_matches),
            Conjunction::Or => self.children.iter().any(child_matches),
        };
        matched != self.negation
    }
}

#[derive(Debug, Clone)]
enum KeyNode {
    Term(Vec<String>),
    Group {
        conjunction: Conjunction,
        negation: bool,
        children: Vec<KeyNode>,
    },
}

/// Keys after analysis.
#[derive(Debug, Clone)]
pub struct CompiledKeys {
    root: KeyNode,
    fields: Vec<String>,
}

/// Outcome of analyzing a keys expression.
#[derive(Debug, Clone, Default)]
pub struct KeysAnalysis {
    /// The usable keys, or `None` if nothing survived analysis.
    pub keys: Option<CompiledKeys>,
    /// Dropped tokens in order of appearance, without duplicates.
    pub ignored: Vec<String>,
}

impl CompiledKeys {
    /// Analyze every term of `keys` for matching against `fields`.
    pub fn compile(
        keys: &Keys,
        analyzer: &dyn Analyzer,
        fields: Vec<String>,
    ) -> Result<KeysAnalysis> {
        let mut ignored = Vec::new();
        let root = Self::compile_node(keys, analyzer, &mut ignored)?;
        Ok(KeysAnalysis {
            keys: root.map(|root| CompiledKeys { root, fields }),
            ignored,
        })
    }

    fn compile_node(
        keys: &Keys,
        analyzer: &dyn Analyzer,
        ignored: &mut Vec<String>,
    ) -> Result<Option<KeyNode>> {
        match keys {
            Keys::Term(text) => {
                let mut tokens = Vec::new();
                for token in analyzer.analyze(text)? {
                    if token.is_stopped() {
                        if !ignored.contains(&token.text) {
                            ignored.push(token.text);
                        }
                    } else if !tokens.contains(&token.text) {
                        tokens.push(token.text);
                    }
                }
                Ok((!tokens.is_empty()).then_some(KeyNode::Term(tokens)))
            }
            Keys::Group(group) => {
                let mut children = Vec::with_capacity(group.children.len());
                for child in &group.children {
                    if let Some(node) = Self::compile_node(child, analyzer, ignored)? {
                        children.push(node);
                    }
                }
                Ok((!children.is_empty()).then_some(KeyNode::Group {
                    conjunction: group.conjunction,
                    negation: group.negation,
                    children,
                }))
            }
        }
    }

    /// The searched fulltext fields.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Score an item, or `None` if it does not match.
    pub fn score<V: ItemView + ?Sized>(&self, item: &V) -> Option<f32> {
        let (matched, score) = self.evaluate(&self.root, item);
        matched.then_some(score)
    }

    fn evaluate<V: ItemView + ?Sized>(&self, node: &KeyNode, item: &V) -> (bool, f32) {
        match node {
            KeyNode::Term(tokens) => {
                let mut score = 0u32;
                for token in tokens {
                    let frequency: u32 = self
                        .fields
                        .iter()
                        .map(|field| item.term_frequency(field, token))
                        .sum();
                    if frequency == 0 {
                        return (false, 0.0);
                    }
                    score += frequency;
                }
                (true, score as f32)
            }
            KeyNode::Group {
                conjunction,
                negation,
                children,
            } => {
                let results = children.iter().map(|child| self.evaluate(child, item));
                let (matched, score) = match conjunction {
                    Conjunction::And => results.fold((true, 0.0), |(all, total), (m, s)| {
                        (all && m, if m { total + s } else { total })
                    }),
                    Conjunction::Or => results.fold((false, 0.0), |(any, total), (m, s)| {
                        (any || m, if m { total + s } else { total })
                    }),
                };
                if *negation { (!matched, 0.0) } else { (matched, score) }
            }
        }
    }
}

/// A sort resolved against an index.
#[derive(Debug, Clone)]
pub enum SortKey {
    Relevance(SortDirection),
    Field {
        field: String,
        value_type: FieldType,
        direction: SortDirection,
    },
}

impl SortKey {
    pub fn compile(sort: &Sort, index: &IndexDefinition) -> Result<Self> {
        let kind = index.resolve(&sort.field).ok_or_else(|| {
            PhalanxError::invalid_query(format!(
                "Unknown sort field '{}' on index '{}'",
                sort.field, index.id
            ))
        })?;
        match kind {
            FieldKind::Relevance => Ok(SortKey::Relevance(sort.direction)),
            FieldKind::Indexed(FieldType::Text) => Err(PhalanxError::unsupported(format!(
                "Sorting on fulltext field '{}' is not supported",
                sort.field
            ))),
            kind => Ok(SortKey::Field {
                field: sort.field.clone(),
                value_type: kind.value_type(),
                direction: sort.direction,
            }),
        }
    }

    /// Compare two scored items. Items without a value sort last in both
    /// directions.
    pub fn compare<V: ItemView + ?Sized>(&self, a: (&V, f32), b: (&V, f32)) -> Ordering {
        match self {
            SortKey::Relevance(direction) => {
                let ordering = a.1.total_cmp(&b.1);
                match direction {
                    SortDirection::Asc => ordering,
                    SortDirection::Desc => ordering.reverse(),
                }
            }
            SortKey::Field {
                field,
                value_type,
                direction,
            } => {
                let key_a = Self::sort_value(a.0.values(field), *value_type, *direction);
                let key_b = Self::sort_value(b.0.values(field), *value_type, *direction);
                match (key_a, key_b) {
                    (None, None) => Ordering::Equal,
                    (None, Some(_)) => Ordering::Greater,
                    (Some(_), None) => Ordering::Less,
                    (Some(x), Some(y)) => {
                        let ordering = x.compare(&y).unwrap_or(Ordering::Equal);
                        match direction {
                            SortDirection::Asc => ordering,
                            SortDirection::Desc => ordering.reverse(),
                        }
                    }
                }
            }
        }
    }

    /// Smallest value when ascending, largest when descending.
    fn sort_value(
        values: &[FieldValue],
        value_type: FieldType,
        direction: SortDirection,
    ) -> Option<Comparable> {
        values
            .iter()
            .filter_map(|value| Comparable::from_value(value_type, value))
            .reduce(|best, next| {
                let ordering = next.compare(&best).unwrap_or(Ordering::Equal);
                let better = match direction {
                    SortDirection::Asc => ordering == Ordering::Less,
                    SortDirection::Desc => ordering == Ordering::Greater,
                };
                if better { next } else { best }
            })
    }
}
