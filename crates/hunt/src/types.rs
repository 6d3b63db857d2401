use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use thiserror::Error;
use traverse::{Node, TraverseError};

/// Metadata bag attached to a match by its hunter's enrichment callback.
pub type Metadata = Map<String, JsonValue>;

/// What the engine does when a hunter fails on a node.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Log, record and move on to the next hunter.
    #[default]
    Skip,
    /// Also yield the failure in-band as `Err(HuntError::Hunter(..))`.
    /// The run continues afterwards.
    Surface,
}

/// Engine-wide settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct EngineConfig {
    #[serde(default)]
    pub failure_policy: FailurePolicy,
    /// Stop a run after this many matches.
    #[serde(default)]
    pub max_matches: Option<usize>,
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), HuntError> {
        if self.max_matches == Some(0) {
            return Err(HuntError::InvalidConfig(
                "max_matches must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

/// The hunter callable that was running when a failure happened.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum HuntStage {
    Predicate,
    Scorer,
    OnMatch,
}

impl HuntStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            HuntStage::Predicate => "predicate",
            HuntStage::Scorer => "scorer",
            HuntStage::OnMatch => "on_match",
        }
    }
}

impl fmt::Display for HuntStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A hunter that failed on one node. Isolated to that (hunter, node) pair.
#[derive(Debug, Error, Clone, PartialEq, Serialize, Deserialize)]
#[error("hunter `{hunter}` {stage} failed on node {node} at depth {depth}: {message}")]
pub struct HunterFailure {
    pub hunter: String,
    pub stage: HuntStage,
    /// Debug rendering of the node key.
    pub node: String,
    pub depth: usize,
    pub message: String,
}

/// Errors produced by the hunt engine.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum HuntError {
    /// Invalid engine configuration.
    #[error("invalid engine config: {0}")]
    InvalidConfig(String),
    /// Traversal setup or resolver failure. Resolver failures end the run.
    #[error(transparent)]
    Traverse(#[from] TraverseError),
    /// A hunter failed on a node; only yielded under [`FailurePolicy::Surface`].
    #[error(transparent)]
    Hunter(#[from] HunterFailure),
}

impl HuntError {
    /// `true` when the run cannot continue after this error.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, HuntError::Hunter(_))
    }
}

/// Counters for one run.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct HuntStats {
    /// Nodes pulled from the traversal.
    pub visited: usize,
    pub matches: usize,
    pub failures: usize,
}

/// A node accepted by a hunter.
///
/// Each hunter accepting a node produces its own `Match`, with its own
/// metadata. The metadata is read-only once the match leaves the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct Match<N> {
    pub(crate) node: N,
    pub(crate) hunter: Arc<str>,
    pub(crate) score: f64,
    pub(crate) path: Vec<N>,
    pub(crate) depth: usize,
    pub(crate) metadata: Metadata,
}

impl<N> Match<N> {
    pub fn node(&self) -> &N {
        &self.node
    }

    /// Name of the hunter that produced this match.
    pub fn hunter(&self) -> &str {
        &self.hunter
    }

    /// Scorer output, or `0.0` for hunters without a scorer.
    pub fn score(&self) -> f64 {
        self.score
    }

    /// Nodes from the traversal root to this node, root first.
    pub fn path(&self) -> &[N] {
        &self.path
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.metadata.get(key)
    }

    pub fn into_node(self) -> N {
        self.node
    }
}

impl<N: Node> Match<N> {
    /// Owned, serializable view of the match.
    pub fn summary(&self) -> MatchSummary {
        MatchSummary {
            hunter: self.hunter.to_string(),
            node: self.node.name().to_string(),
            key: format!("{:?}", self.node.key()),
            score: self.score,
            depth: self.depth,
            path: self.path.iter().map(|n| n.name().to_string()).collect(),
            metadata: self.metadata.clone(),
        }
    }
}

/// Serializable rendering of a [`Match`] for logs and CLI output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchSummary {
    pub hunter: String,
    pub node: String,
    pub key: String,
    pub score: f64,
    pub depth: usize,
    pub path: Vec<String>,
    #[serde(default)]
    pub metadata: Metadata,
}
