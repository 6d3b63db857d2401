use std::fmt;

use thiserror::Error;

use crate::mode::{ResolverKind, TraversalMode};

/// Failure reported by a caller-supplied callable (resolver, predicate,
/// scorer or enrichment callback).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct RuleError(pub String);

impl RuleError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    pub fn message(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RuleError {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for RuleError {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Errors produced while setting up or running a traversal.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TraverseError {
    /// The selected mode needs a resolver that was not supplied.
    #[error("traversal mode {mode} requires a {missing} resolver, none was supplied")]
    Configuration {
        mode: TraversalMode,
        missing: ResolverKind,
    },
    /// A resolver failed for a node; the traversal cannot continue past it.
    #[error("{kind} resolver failed for node {node}: {source}")]
    Resolver {
        kind: ResolverKind,
        node: String,
        #[source]
        source: RuleError,
    },
    /// Invalid traversal limits.
    #[error("invalid traversal config: {0}")]
    InvalidConfig(String),
}

impl TraverseError {
    pub(crate) fn resolver(kind: ResolverKind, node: &impl fmt::Debug, source: RuleError) -> Self {
        TraverseError::Resolver {
            kind,
            node: format!("{node:?}"),
            source,
        }
    }

    /// `true` for errors raised before any output was produced.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            TraverseError::Configuration { .. } | TraverseError::InvalidConfig(_)
        )
    }
}
