//! Node capability consumed by the traverser and the hunt engine.

use std::fmt::Debug;
use std::hash::Hash;

use serde_json::Value as JsonValue;

/// Anything identifiable and attribute-bearing that can sit in a graph.
///
/// Implementations are expected to be cheap handles (indices, `Arc`s,
/// small value types): the traverser clones a node once per path entry.
/// The engine never mutates a node.
pub trait Node: Clone {
    /// Stable identity used as the visited-set key.
    type Key: Eq + Hash + Clone + Debug;

    /// Identity of this node. Two nodes with equal keys are the same node.
    fn key(&self) -> Self::Key;

    /// Human-readable name of the node.
    fn name(&self) -> &str;

    /// Look up a named attribute. Unknown attributes are `None`.
    fn attribute(&self, _name: &str) -> Option<JsonValue> {
        None
    }
}
