//! Structural primitives for knowledge graphs.
//!
//! A [`Forest`] owns objects of seven kinds, nested outermost to innermost
//! as matrix, layer, net, node, tree, branch, leaf (leaves may nest). Each
//! container may carry a [`RetentionPolicy`] bounding its child count, and
//! any object may link laterally to any other with a [`RelationshipType`].
//!
//! Once built, the forest is frozen behind an `Arc` and exposed to the
//! traverser through [`ObjectRef`]:
//!
//! ```
//! use objects::{object_traverser, Forest, ObjectKind, ObjectRef};
//! use traverse::{Node, TraversalConfig, TraversalMode};
//!
//! let mut forest = Forest::new();
//! let root = forest.create(ObjectKind::Tree, "Knowledge Root").unwrap();
//! let ai = forest.add(root, ObjectKind::Branch, "AI").unwrap();
//! forest.add(ai, ObjectKind::Leaf, "Neural Networks").unwrap();
//! let forest = forest.share();
//!
//! let traverser = object_traverser(TraversalConfig::default()).unwrap();
//! let names: Vec<String> = traverser
//!     .traverse(ObjectRef::new(&forest, root).unwrap(), TraversalMode::Forward)
//!     .unwrap()
//!     .map(|visit| visit.unwrap().node.name().to_string())
//!     .collect();
//! assert_eq!(names, ["Knowledge Root", "AI", "Neural Networks"]);
//! ```

mod error;
mod forest;
mod hash;
mod kind;
mod object_ref;
mod retention;

pub use crate::error::ObjectError;
pub use crate::forest::{Forest, Handle, Link, Object};
pub use crate::hash::digest;
pub use crate::kind::{MatchLevel, ObjectKind, RelationshipType};
pub use crate::object_ref::{object_resolvers, object_traverser, ObjectRef};
pub use crate::retention::{
    NotifyMode, PruneFrom, PruneType, Retention, RetentionCallback, RetentionPolicy,
};
