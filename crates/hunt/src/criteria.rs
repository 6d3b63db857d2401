//! Declarative, conservative node criteria.
//!
//! A [`Criteria`] is a conjunction of attribute equalities. Every field
//! that is set must equal the node's attribute of the same name; unset
//! fields are ignored, so an empty `Criteria` accepts every node. There is
//! no ranking or fuzzy matching here.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use traverse::Node;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Criteria {
    #[serde(default)]
    pub id: Option<String>,
    /// Structural hash.
    #[serde(default)]
    pub hash: Option<String>,
    /// Semantic hash.
    #[serde(default)]
    pub shash: Option<String>,
    #[serde(default)]
    pub data: Option<JsonValue>,
    /// Extra attribute equalities, checked in order.
    #[serde(default)]
    pub attributes: Vec<(String, JsonValue)>,
}

impl Criteria {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn with_hash(mut self, hash: impl Into<String>) -> Self {
        self.hash = Some(hash.into());
        self
    }

    #[must_use]
    pub fn with_shash(mut self, shash: impl Into<String>) -> Self {
        self.shash = Some(shash.into());
        self
    }

    #[must_use]
    pub fn with_data(mut self, data: impl Into<JsonValue>) -> Self {
        self.data = Some(data.into());
        self
    }

    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.id.is_none()
            && self.hash.is_none()
            && self.shash.is_none()
            && self.data.is_none()
            && self.attributes.is_empty()
    }

    pub fn matches<N: Node>(&self, node: &N) -> bool {
        let text = |name: &str, expected: &Option<String>| match expected {
            None => true,
            Some(expected) => {
                matches!(node.attribute(name), Some(JsonValue::String(ref s)) if s == expected)
            }
        };

        if !text("id", &self.id) || !text("hash", &self.hash) || !text("shash", &self.shash) {
            return false;
        }
        if let Some(expected) = &self.data {
            if node.attribute("data").as_ref() != Some(expected) {
                return false;
            }
        }
        self.attributes
            .iter()
            .all(|(name, expected)| node.attribute(name).as_ref() == Some(expected))
    }
}
