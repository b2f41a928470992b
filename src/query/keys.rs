//! Fulltext search keys.
//!
//! Keys are a boolean tree with search terms at the leaves. A plain string is
//! parsed in "terms" mode: whitespace separates terms, which are joined with
//! AND, and a double-quoted phrase is kept as a single term.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::query::condition_group::Conjunction;

static TERM_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""([^"]*)"|(\S+)"#).expect("term pattern is valid"));

/// A keys expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Keys {
    /// A single search term.
    Term(String),
    /// A nested group of terms.
    Group(KeysGroup),
}

/// A group node of a keys expression.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct KeysGroup {
    #[serde(default)]
    pub conjunction: Conjunction,
    #[serde(default)]
    pub negation: bool,
    #[serde(default)]
    pub children: Vec<Keys>,
}

impl KeysGroup {
    pub fn new(conjunction: Conjunction) -> Self {
        KeysGroup {
            conjunction,
            ..Default::default()
        }
    }

    /// Add a child and return the group.
    pub fn with<K: Into<Keys>>(mut self, child: K) -> Self {
        self.children.push(child.into());
        self
    }

    /// Mark the group as negated.
    pub fn negated(mut self) -> Self {
        self.negation = true;
        self
    }
}

impl Keys {
    /// Create a single term.
    pub fn term<S: Into<String>>(text: S) -> Self {
        Keys::Term(text.into())
    }

    /// Parse a user-entered string into an AND group of terms.
    pub fn parse(input: &str) -> Self {
        let children = TERM_PATTERN
            .captures_iter(input)
            .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
            .map(|m| m.as_str().trim())
            .filter(|text| !text.is_empty())
            .map(Keys::term)
            .collect();

        Keys::Group(KeysGroup {
            conjunction: Conjunction::And,
            negation: false,
            children,
        })
    }

    /// Whether the expression contains no term at all.
    pub fn is_empty(&self) -> bool {
        match self {
            Keys::Term(text) => text.trim().is_empty(),
            Keys::Group(group) => group.children.iter().all(Keys::is_empty),
        }
    }

    /// All terms in tree order.
    pub fn terms(&self) -> Vec<&str> {
        match self {
            Keys::Term(text) => vec![text.as_str()],
            Keys::Group(group) => group.children.iter().flat_map(Keys::terms).collect(),
        }
    }
}

impl From<&str> for Keys {
    fn from(input: &str) -> Self {
        Keys::parse(input)
    }
}

impl From<String> for Keys {
    fn from(input: String) -> Self {
        Keys::parse(&input)
    }
}

impl From<KeysGroup> for Keys {
    fn from(group: KeysGroup) -> Self {
        Keys::Group(group)
    }
}
