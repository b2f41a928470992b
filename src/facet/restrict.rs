//! Condition group rewriting for OR facets.
//!
//! A facet with the OR operator must count values as if the user's own
//! selection on that facet were not applied, otherwise selecting one value
//! would hide all alternatives. Callers mark the group holding that selection
//! with the tag `facet:<name>`; the rewrite removes every such group at any
//! depth from a copy of the root group.

use std::borrow::Cow;

use crate::facet::spec::{FacetOperator, FacetSpec};
use crate::query::condition_group::{Clause, ConditionGroup};

/// Tag marking a condition group as the filter of a facet.
pub fn exclusion_tag(facet_name: &str) -> String {
    format!("facet:{facet_name}")
}

/// The condition group a facet is counted with.
pub fn restricted_group<'a>(
    root: &'a ConditionGroup,
    facet_name: &str,
    spec: &FacetSpec,
) -> Cow<'a, ConditionGroup> {
    match spec.operator {
        FacetOperator::And => Cow::Borrowed(root),
        FacetOperator::Or => Cow::Owned(without_tag(root, &exclusion_tag(facet_name))),
    }
}

/// Copy of `group` without any descendant group tagged with `tag`.
///
/// The root itself is never removed.
pub fn without_tag(group: &ConditionGroup, tag: &str) -> ConditionGroup {
    let mut copy = group.shallow_copy();
    for child in group.children() {
        match child {
            Clause::Group(nested) if nested.has_tag(tag) => {}
            Clause::Group(nested) => {
                copy.add_condition_group(without_tag(nested, tag));
            }
            Clause::Condition(condition) => {
                copy.add_clause(Clause::Condition(condition.clone()));
            }
        }
    }
    copy
}
