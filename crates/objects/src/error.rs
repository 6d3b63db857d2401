use thiserror::Error;

use crate::forest::Handle;
use crate::kind::ObjectKind;

/// Errors produced while building or editing a [`Forest`](crate::Forest).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ObjectError {
    #[error("unknown object handle {0}")]
    UnknownHandle(Handle),
    #[error("{parent} cannot have child of kind {child}")]
    DisallowedChild {
        parent: ObjectKind,
        child: ObjectKind,
    },
    #[error("object id `{0}` is already taken")]
    DuplicateId(String),
    #[error("invalid retention policy: {0}")]
    InvalidRetention(String),
    #[error("object {0} cannot become a descendant of itself")]
    Cycle(String),
    #[error("forest is full: object index {0} does not fit a handle")]
    CapacityExceeded(usize),
    /// Raised by a retention policy with `NotifyMode::Raise`; the pruning
    /// has already happened.
    #[error("retention policy on {container} pruned {} objects", pruned.len())]
    RetentionOverflow {
        container: String,
        pruned: Vec<Handle>,
    },
}
