use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::Payload;

/// Exact-match operand: payload fields are compared as strings or booleans.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Boolean flag such as `is_public`.
    Flag(bool),
    /// String identifier or keyword.
    Text(String),
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// How a payload field must match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchCondition {
    /// Field equals the value.
    Value(FieldValue),
    /// Field equals any of the values.
    Any(Vec<String>),
}

/// A single `key` + `match` condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldCondition {
    /// Payload key.
    pub key: String,
    /// Match rule for the key.
    #[serde(rename = "match")]
    pub condition: MatchCondition,
}

impl FieldCondition {
    /// Exact-match condition.
    pub fn equals(key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Self {
            key: key.into(),
            condition: MatchCondition::Value(value.into()),
        }
    }

    /// Match-any condition.
    pub fn any(key: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            key: key.into(),
            condition: MatchCondition::Any(values),
        }
    }

    /// Evaluate the condition against a stored payload.
    ///
    /// Array fields match when any element matches, mirroring how the
    /// vector index treats keyword arrays.
    pub fn matches(&self, payload: &Payload) -> bool {
        let Some(field) = payload.get(&self.key) else {
            return false;
        };
        match field {
            Value::Array(items) => items.iter().any(|item| self.matches_scalar(item)),
            scalar => self.matches_scalar(scalar),
        }
    }

    fn matches_scalar(&self, field: &Value) -> bool {
        match (&self.condition, field) {
            (MatchCondition::Value(FieldValue::Flag(expected)), Value::Bool(actual)) => {
                expected == actual
            }
            (MatchCondition::Value(FieldValue::Text(expected)), Value::String(actual)) => {
                expected == actual
            }
            (MatchCondition::Any(accepted), Value::String(actual)) => {
                accepted.iter().any(|candidate| candidate == actual)
            }
            _ => false,
        }
    }
}

/// Conjunction of field conditions; every condition must hold.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchFilter {
    /// Required conditions.
    pub must: Vec<FieldCondition>,
}

impl SearchFilter {
    /// Append a required condition.
    #[must_use]
    pub fn with(mut self, condition: FieldCondition) -> Self {
        self.must.push(condition);
        self
    }

    /// Look up the condition on a key.
    pub fn condition(&self, key: &str) -> Option<&MatchCondition> {
        self.must
            .iter()
            .find(|field| field.key == key)
            .map(|field| &field.condition)
    }

    /// Whether a payload satisfies every condition.
    pub fn matches(&self, payload: &Payload) -> bool {
        self.must.iter().all(|condition| condition.matches(payload))
    }
}
