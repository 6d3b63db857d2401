//! Limits applied to a single traversal.
//!
//! Both limits default to unlimited, which is the right setting for
//! finite graphs and for consumers that stop pulling on their own.

use serde::{Deserialize, Serialize};

use crate::error::TraverseError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct TraversalConfig {
    /// Nodes at this depth are yielded but not expanded. Depth 0 is the root.
    #[serde(default)]
    pub max_depth: Option<usize>,
    /// The sequence ends after this many nodes have been yielded.
    #[serde(default)]
    pub max_nodes: Option<usize>,
}

impl TraversalConfig {
    #[must_use]
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    #[must_use]
    pub fn with_max_nodes(mut self, nodes: usize) -> Self {
        self.max_nodes = Some(nodes);
        self
    }

    pub fn validate(&self) -> Result<(), TraverseError> {
        if self.max_nodes == Some(0) {
            return Err(TraverseError::InvalidConfig(
                "max_nodes must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    pub(crate) fn expands(&self, depth: usize) -> bool {
        self.max_depth.is_none_or(|max| depth < max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_unlimited_and_valid() {
        let cfg = TraversalConfig::default();
        assert!(cfg.validate().is_ok());
        assert!(cfg.expands(10_000));
    }

    #[test]
    fn zero_max_nodes_rejected() {
        let err = TraversalConfig::default()
            .with_max_nodes(0)
            .validate()
            .expect_err("config should be invalid");
        match err {
            TraverseError::InvalidConfig(msg) => assert!(msg.contains("max_nodes")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn max_depth_stops_expansion() {
        let cfg = TraversalConfig::default().with_max_depth(2);
        assert!(cfg.expands(1));
        assert!(!cfg.expands(2));
    }
}
