use std::sync::Arc;

use serde_json::Value as JsonValue;

use crate::types::{Match, Metadata};

/// Mutable view of a match under construction, handed to a hunter's
/// enrichment callback.
///
/// Node, path, depth and score are read-only here; only the metadata bag
/// can be written.
#[derive(Debug)]
pub struct MatchContext<N> {
    inner: Match<N>,
}

impl<N> MatchContext<N> {
    pub(crate) fn new(hunter: Arc<str>, node: N, path: Vec<N>, depth: usize, score: f64) -> Self {
        Self {
            inner: Match {
                node,
                hunter,
                score,
                path,
                depth,
                metadata: Metadata::new(),
            },
        }
    }

    pub fn node(&self) -> &N {
        &self.inner.node
    }

    pub fn path(&self) -> &[N] {
        &self.inner.path
    }

    pub fn depth(&self) -> usize {
        self.inner.depth
    }

    pub fn hunter(&self) -> &str {
        &self.inner.hunter
    }

    pub fn score(&self) -> f64 {
        self.inner.score
    }

    pub fn metadata(&self) -> &Metadata {
        &self.inner.metadata
    }

    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.inner.metadata.get(key)
    }

    /// Write `key` into the metadata bag; a later write to the same key wins.
    pub fn enrich(&mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> &mut Self {
        self.inner.metadata.insert(key.into(), value.into());
        self
    }

    /// Merge every entry of `entries` into the metadata bag.
    pub fn enrich_all<K, V, I>(&mut self, entries: I) -> &mut Self
    where
        K: Into<String>,
        V: Into<JsonValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        for (key, value) in entries {
            self.enrich(key, value);
        }
        self
    }

    pub(crate) fn into_match(self) -> Match<N> {
        self.inner
    }
}
