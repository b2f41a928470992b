//! Recursive boolean trees of field conditions.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::query::condition::{Condition, ConditionValue, Operator};

/// How the children of a group are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Conjunction {
    /// Every child must match.
    #[default]
    #[serde(rename = "AND", alias = "and")]
    And,
    /// At least one child must match.
    #[serde(rename = "OR", alias = "or")]
    Or,
}

impl fmt::Display for Conjunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Conjunction::And => f.write_str("AND"),
            Conjunction::Or => f.write_str("OR"),
        }
    }
}

/// A child of a condition group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Clause {
    /// An atomic condition.
    Condition(Condition),
    /// A nested group.
    Group(ConditionGroup),
}

/// A group of conditions combined with AND or OR.
///
/// Tags carry no matching semantics. They label a group so that OR facets can
/// find and drop the group that filters on their own field.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ConditionGroup {
    #[serde(default)]
    conjunction: Conjunction,
    #[serde(default)]
    negation: bool,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    tags: BTreeSet<String>,
    #[serde(default)]
    children: Vec<Clause>,
}

impl ConditionGroup {
    /// Create an empty group.
    pub fn new(conjunction: Conjunction) -> Self {
        ConditionGroup {
            conjunction,
            ..Default::default()
        }
    }

    /// Create an empty group carrying the given tags.
    pub fn with_tags<I, S>(conjunction: Conjunction, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ConditionGroup {
            conjunction,
            tags: tags.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Append a condition.
    pub fn add_condition<S, V>(&mut self, field: S, value: V, operator: Operator) -> &mut Self
    where
        S: Into<String>,
        V: Into<ConditionValue>,
    {
        self.children
            .push(Clause::Condition(Condition::new(field, value, operator)));
        self
    }

    /// Append a nested group.
    pub fn add_condition_group(&mut self, group: ConditionGroup) -> &mut Self {
        self.children.push(Clause::Group(group));
        self
    }

    /// Append an already built clause.
    pub fn add_clause(&mut self, clause: Clause) -> &mut Self {
        self.children.push(clause);
        self
    }

    /// The most recently added nested group.
    pub fn last_group_mut(&mut self) -> Option<&mut ConditionGroup> {
        match self.children.last_mut() {
            Some(Clause::Group(group)) => Some(group),
            _ => None,
        }
    }

    /// Add a tag.
    pub fn add_tag<S: Into<String>>(&mut self, tag: S) -> &mut Self {
        self.tags.insert(tag.into());
        self
    }

    /// Set whether the group's result is inverted.
    pub fn set_negation(&mut self, negation: bool) -> &mut Self {
        self.negation = negation;
        self
    }

    pub fn conjunction(&self) -> Conjunction {
        self.conjunction
    }

    pub fn is_negated(&self) -> bool {
        self.negation
    }

    pub fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    pub fn children(&self) -> &[Clause] {
        &self.children
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Copy of this group with its conjunction, negation and tags but no children.
    pub fn shallow_copy(&self) -> Self {
        ConditionGroup {
            conjunction: self.conjunction,
            negation: self.negation,
            tags: self.tags.clone(),
            children: Vec::new(),
        }
    }

    /// All conditions at any depth, in tree order.
    pub fn conditions(&self) -> Vec<&Condition> {
        let mut conditions = Vec::new();
        self.collect_conditions(&mut conditions);
        conditions
    }

    fn collect_conditions<'a>(&'a self, out: &mut Vec<&'a Condition>) {
        for child in &self.children {
            match child {
                Clause::Condition(condition) => out.push(condition),
                Clause::Group(group) => group.collect_conditions(out),
            }
        }
    }

    /// Validate every condition in the tree.
    pub fn validate(&self) -> Result<()> {
        self.conditions()
            .into_iter()
            .try_for_each(Condition::validate)
    }
}
