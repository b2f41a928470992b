//! Atomic field conditions.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::document::field_value::FieldValue;
use crate::error::{PhalanxError, Result};

/// Comparison operator of a condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Operator {
    /// Equal, or IS NULL with an absent value
    #[default]
    #[serde(rename = "=")]
    Eq,
    /// Not equal, or IS NOT NULL with an absent value
    #[serde(rename = "<>")]
    NotEq,
    /// Less than
    #[serde(rename = "<")]
    Lt,
    /// Less than or equal
    #[serde(rename = "<=")]
    Le,
    /// Greater than
    #[serde(rename = ">")]
    Gt,
    /// Greater than or equal
    #[serde(rename = ">=")]
    Ge,
    /// Value is one of a list
    #[serde(rename = "IN")]
    In,
    /// Value is none of a list
    #[serde(rename = "NOT IN")]
    NotIn,
    /// Value lies within two inclusive bounds
    #[serde(rename = "BETWEEN")]
    Between,
    /// Value lies outside two inclusive bounds
    #[serde(rename = "NOT BETWEEN")]
    NotBetween,
}

impl Operator {
    /// The operator as written in queries.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::NotEq => "<>",
            Operator::Lt => "<",
            Operator::Le => "<=",
            Operator::Gt => ">",
            Operator::Ge => ">=",
            Operator::In => "IN",
            Operator::NotIn => "NOT IN",
            Operator::Between => "BETWEEN",
            Operator::NotBetween => "NOT BETWEEN",
        }
    }

    /// Negative operators must hold for every stored value of a multi-valued
    /// field; all others need only one matching value.
    pub fn is_negative(&self) -> bool {
        matches!(self, Operator::NotEq | Operator::NotIn | Operator::NotBetween)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The value side of a condition.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConditionValue {
    /// No value: IS NULL / IS NOT NULL
    #[default]
    Null,
    /// A single value
    Scalar(FieldValue),
    /// A list of values for set and range operators
    List(Vec<FieldValue>),
}

impl ConditionValue {
    /// Whether this is the absent value.
    pub fn is_null(&self) -> bool {
        matches!(self, ConditionValue::Null)
    }
}

impl From<FieldValue> for ConditionValue {
    fn from(value: FieldValue) -> Self {
        ConditionValue::Scalar(value)
    }
}

impl From<&str> for ConditionValue {
    fn from(value: &str) -> Self {
        ConditionValue::Scalar(value.into())
    }
}

impl From<String> for ConditionValue {
    fn from(value: String) -> Self {
        ConditionValue::Scalar(value.into())
    }
}

impl From<i64> for ConditionValue {
    fn from(value: i64) -> Self {
        ConditionValue::Scalar(value.into())
    }
}

impl From<i32> for ConditionValue {
    fn from(value: i32) -> Self {
        ConditionValue::Scalar(value.into())
    }
}

impl From<f64> for ConditionValue {
    fn from(value: f64) -> Self {
        ConditionValue::Scalar(value.into())
    }
}

impl From<bool> for ConditionValue {
    fn from(value: bool) -> Self {
        ConditionValue::Scalar(value.into())
    }
}

impl<T: Into<FieldValue>> From<Vec<T>> for ConditionValue {
    fn from(values: Vec<T>) -> Self {
        ConditionValue::List(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<FieldValue>, const N: usize> From<[T; N]> for ConditionValue {
    fn from(values: [T; N]) -> Self {
        ConditionValue::List(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for ConditionValue {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => ConditionValue::Scalar(value.into()),
            None => ConditionValue::Null,
        }
    }
}

/// An atomic predicate on one field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    field: String,
    #[serde(default)]
    value: ConditionValue,
    #[serde(default)]
    operator: Operator,
}

impl Condition {
    /// Create a new condition.
    pub fn new<S, V>(field: S, value: V, operator: Operator) -> Self
    where
        S: Into<String>,
        V: Into<ConditionValue>,
    {
        Condition {
            field: field.into(),
            value: value.into(),
            operator,
        }
    }

    /// The field the condition applies to.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// The condition value.
    pub fn value(&self) -> &ConditionValue {
        &self.value
    }

    /// The operator.
    pub fn operator(&self) -> Operator {
        self.operator
    }

    /// Check that value and operator fit together.
    pub fn validate(&self) -> Result<()> {
        let malformed = |expected: &str| {
            Err(PhalanxError::invalid_query(format!(
                "Operator {} on field '{}' requires {expected}",
                self.operator, self.field
            )))
        };
        match (self.operator, &self.value) {
            (Operator::Eq | Operator::NotEq, ConditionValue::List(_)) => {
                malformed("a single value")
            }
            (Operator::Eq | Operator::NotEq, _) => Ok(()),
            (Operator::Lt | Operator::Le | Operator::Gt | Operator::Ge, value) => match value {
                ConditionValue::Scalar(_) => Ok(()),
                _ => malformed("a single value"),
            },
            (Operator::In | Operator::NotIn, ConditionValue::List(_)) => Ok(()),
            (Operator::In | Operator::NotIn, _) => malformed("a list of values"),
            (Operator::Between | Operator::NotBetween, ConditionValue::List(bounds))
                if bounds.len() == 2 =>
            {
                Ok(())
            }
            (Operator::Between | Operator::NotBetween, _) => malformed("exactly two bounds"),
        }
    }
}
