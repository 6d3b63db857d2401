use std::fmt;
use std::sync::Arc;

use serde_json::Value as JsonValue;
use traverse::{Node, Resolvers, TraversalConfig, TraverseError, Traverser};

use crate::forest::{Forest, Handle, Object};
use crate::kind::{MatchLevel, ObjectKind, RelationshipType};

/// Cheap, owned view of one object in a shared [`Forest`].
///
/// This is the node type handed to the traverser: cloning it copies an
/// `Arc` and a handle.
#[derive(Clone)]
pub struct ObjectRef {
    forest: Arc<Forest>,
    handle: Handle,
}

impl ObjectRef {
    /// `None` if `handle` does not belong to `forest`.
    pub fn new(forest: &Arc<Forest>, handle: Handle) -> Option<Self> {
        forest.object(handle)?;
        Some(Self {
            forest: Arc::clone(forest),
            handle,
        })
    }

    pub fn by_id(forest: &Arc<Forest>, id: &str) -> Option<Self> {
        Self::new(forest, forest.by_id(id)?)
    }

    pub fn handle(&self) -> Handle {
        self.handle
    }

    pub fn forest(&self) -> &Arc<Forest> {
        &self.forest
    }

    pub fn object(&self) -> &Object {
        self.forest.at(self.handle)
    }

    pub fn id(&self) -> &str {
        self.object().id()
    }

    pub fn kind(&self) -> ObjectKind {
        self.object().kind()
    }

    pub fn data(&self) -> &JsonValue {
        self.object().data()
    }

    pub fn level(&self) -> Option<MatchLevel> {
        self.object().level()
    }

    pub fn is_leaf(&self) -> bool {
        self.object().is_leaf()
    }

    pub fn children(&self) -> Vec<ObjectRef> {
        self.object()
            .children()
            .iter()
            .map(|h| self.sibling(*h))
            .collect()
    }

    pub fn parent(&self) -> Option<ObjectRef> {
        self.object().parent().map(|h| self.sibling(h))
    }

    /// Targets of every lateral link, in link order.
    pub fn linked(&self) -> Vec<ObjectRef> {
        self.object()
            .links()
            .iter()
            .map(|l| self.sibling(l.target))
            .collect()
    }

    pub fn linked_by(&self, relation: RelationshipType) -> Vec<ObjectRef> {
        self.object()
            .links()
            .iter()
            .filter(|l| l.relation == relation)
            .map(|l| self.sibling(l.target))
            .collect()
    }

    pub fn hash(&self) -> String {
        self.forest.hash(self.handle).unwrap_or_default()
    }

    pub fn shash(&self) -> String {
        self.forest.shash(self.handle).unwrap_or_default()
    }

    // Handles stored inside a forest always point into that forest.
    fn sibling(&self, handle: Handle) -> ObjectRef {
        ObjectRef {
            forest: Arc::clone(&self.forest),
            handle,
        }
    }
}

impl PartialEq for ObjectRef {
    fn eq(&self, other: &Self) -> bool {
        self.handle == other.handle && Arc::ptr_eq(&self.forest, &other.forest)
    }
}

impl Eq for ObjectRef {}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let obj = self.object();
        f.debug_struct("ObjectRef")
            .field("id", &obj.id())
            .field("kind", &obj.kind())
            .field("name", &obj.name())
            .finish()
    }
}

impl Node for ObjectRef {
    type Key = Handle;

    fn key(&self) -> Handle {
        self.handle
    }

    fn name(&self) -> &str {
        self.object().name()
    }

    /// `id`, `kind`, `name`, `data`, `hash`, `shash` and `level` are
    /// built in; any other name is looked up in the object's metadata.
    fn attribute(&self, name: &str) -> Option<JsonValue> {
        let obj = self.object();
        match name {
            "id" => Some(obj.id().into()),
            "kind" => Some(obj.kind().as_str().into()),
            "name" => Some(obj.name().into()),
            "data" => Some(obj.data().clone()),
            "hash" => self.forest.hash(self.handle).map(JsonValue::from),
            "shash" => self.forest.shash(self.handle).map(JsonValue::from),
            "level" => obj.level().map(|l| JsonValue::from(l as u8)),
            other => obj.metadata().get(other).cloned(),
        }
    }
}

/// Children, parent and lateral resolvers over a shared forest.
pub fn object_resolvers() -> Resolvers<ObjectRef> {
    Resolvers::new()
        .children(ObjectRef::children)
        .parent(ObjectRef::parent)
        .lateral(ObjectRef::linked)
}

pub fn object_traverser(config: TraversalConfig) -> Result<Traverser<ObjectRef>, TraverseError> {
    Traverser::with_config(object_resolvers(), config)
}
