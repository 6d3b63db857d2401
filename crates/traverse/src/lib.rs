//! Knvectis traversal layer.
//!
//! Walks an abstract node graph (tree, DAG or cyclic graph) without knowing
//! anything about how nodes relate. Structure comes from caller-supplied
//! [`Resolvers`]; the order of the walk comes from the [`TraversalMode`].
//!
//! ## What we guarantee
//!
//! - Breadth-first order: depths never decrease along the sequence
//! - Every reachable node is produced at most once, even on cyclic input
//! - A node reachable from several parents keeps the path of the parent
//!   dequeued first (shortest path)
//! - Laziness: a node's neighbors are resolved only when the next item is
//!   requested, so infinite graphs are fine as long as the consumer stops
//! - No state survives a traversal; calling `traverse` again starts fresh
//!
//! ## Errors
//!
//! A mode that needs a missing resolver is rejected by
//! [`Traverser::traverse`] before anything is produced. A resolver that fails
//! mid-walk ends the sequence with [`TraverseError::Resolver`].
//!
//! ```
//! use traverse::{Node, Resolvers, TraversalMode, Traverser};
//!
//! #[derive(Clone, Debug)]
//! struct Step(u64);
//!
//! impl Node for Step {
//!     type Key = u64;
//!     fn key(&self) -> u64 { self.0 }
//!     fn name(&self) -> &str { "step" }
//! }
//!
//! // Infinite binary tree: n -> 2n, 2n + 1.
//! let traverser = Traverser::new(
//!     Resolvers::new().children(|n: &Step| vec![Step(n.0 * 2), Step(n.0 * 2 + 1)]),
//! );
//! let first: Vec<u64> = traverser
//!     .traverse(Step(1), TraversalMode::Forward)
//!     .unwrap()
//!     .take(5)
//!     .map(|visit| visit.unwrap().node.0)
//!     .collect();
//! assert_eq!(first, vec![1, 2, 3, 4, 5]);
//! ```

mod config;
mod error;
mod mode;
mod node;
mod resolver;
mod traverser;

pub use crate::config::TraversalConfig;
pub use crate::error::{RuleError, TraverseError};
pub use crate::mode::{ResolverKind, TraversalMode};
pub use crate::node::Node;
pub use crate::resolver::Resolvers;
pub use crate::traverser::{Traversal, Traverser, Visit};
