use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use tracing::debug;
use uuid::Uuid;

use crate::error::ObjectError;
use crate::hash::digest;
use crate::kind::{MatchLevel, ObjectKind, RelationshipType};
use crate::retention::{NotifyMode, PruneType, Retention, RetentionPolicy};

/// Index of an object inside its [`Forest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Handle(u32);

impl Handle {
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Handles are `u32`; a forest holds at most `u32::MAX + 1` objects.
    pub(crate) fn try_from_index(index: usize) -> Result<Self, ObjectError> {
        u32::try_from(index)
            .map(Handle)
            .map_err(|_| ObjectError::CapacityExceeded(index))
    }

    #[cfg(test)]
    pub(crate) fn from_index(index: usize) -> Self {
        Self::try_from_index(index).unwrap()
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Directed lateral edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub target: Handle,
    pub relation: RelationshipType,
}

/// One structural object. Read-only outside the forest.
#[derive(Debug, Clone)]
pub struct Object {
    id: String,
    kind: ObjectKind,
    name: String,
    data: JsonValue,
    parent: Option<Handle>,
    children: Vec<Handle>,
    links: Vec<Link>,
    metadata: Map<String, JsonValue>,
    retention: Option<RetentionPolicy>,
    retained: Vec<Handle>,
}

impl Object {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> ObjectKind {
        self.kind
    }

    /// Display name: the payload when it is a string, otherwise its JSON
    /// rendering, or the kind for an empty payload.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data(&self) -> &JsonValue {
        &self.data
    }

    pub fn parent(&self) -> Option<Handle> {
        self.parent
    }

    pub fn children(&self) -> &[Handle] {
        &self.children
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn metadata(&self) -> &Map<String, JsonValue> {
        &self.metadata
    }

    pub fn retention(&self) -> Option<&RetentionPolicy> {
        self.retention.as_ref()
    }

    /// Children pruned with [`PruneType::Discard`], oldest prune first.
    pub fn retained(&self) -> &[Handle] {
        &self.retained
    }

    pub fn level(&self) -> Option<MatchLevel> {
        self.kind.level()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    fn payload_text(&self) -> String {
        match &self.data {
            JsonValue::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

/// Arena of structural objects.
///
/// Objects are never removed, so a [`Handle`] stays valid for the life of
/// the forest. Detached objects simply become roots.
#[derive(Debug, Clone, Default)]
pub struct Forest {
    objects: Vec<Object>,
    ids: HashMap<String, Handle>,
}

impl Forest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn handles(&self) -> impl Iterator<Item = Handle> + '_ {
        (0..self.objects.len()).map_while(|index| Handle::try_from_index(index).ok())
    }

    /// Freeze the forest for traversal.
    pub fn share(self) -> Arc<Forest> {
        Arc::new(self)
    }

    /// Create a detached object with a generated id.
    pub fn create(
        &mut self,
        kind: ObjectKind,
        data: impl Into<JsonValue>,
    ) -> Result<Handle, ObjectError> {
        let id = self.gen_id();
        self.insert(kind, id, data.into())
    }

    /// Create a detached object with a caller-chosen id.
    pub fn create_with_id(
        &mut self,
        kind: ObjectKind,
        id: impl Into<String>,
        data: impl Into<JsonValue>,
    ) -> Result<Handle, ObjectError> {
        let id = id.into();
        if self.ids.contains_key(&id) {
            return Err(ObjectError::DuplicateId(id));
        }
        self.insert(kind, id, data.into())
    }

    /// Create an object and attach it under `parent`.
    ///
    /// The kind is checked before anything is created. If the parent's
    /// retention policy raises, the new object exists but the error is
    /// returned.
    pub fn add(
        &mut self,
        parent: Handle,
        kind: ObjectKind,
        data: impl Into<JsonValue>,
    ) -> Result<Handle, ObjectError> {
        self.check_child_kind(parent, kind)?;
        let child = self.create(kind, data)?;
        self.attach(parent, child)?;
        Ok(child)
    }

    /// Put `child` under `parent`.
    ///
    /// Re-attaching an existing child is a no-op. A child attached elsewhere
    /// is moved. The parent's retention policy runs after the insert.
    pub fn attach(&mut self, parent: Handle, child: Handle) -> Result<(), ObjectError> {
        let child_kind = self.obj(child)?.kind;
        self.check_child_kind(parent, child_kind)?;
        if self.path(parent).contains(&child) {
            return Err(ObjectError::Cycle(self.obj(child)?.id.clone()));
        }
        let previous = self.obj(child)?.parent;
        if previous == Some(parent) {
            return Ok(());
        }
        if let Some(old) = previous {
            self.obj_mut(old)?.children.retain(|c| *c != child);
        }
        self.obj_mut(child)?.parent = Some(parent);
        self.obj_mut(parent)?.children.push(child);
        self.apply_retention(parent)
    }

    /// Remove `child` from `parent`. Returns `false` if it was not there.
    pub fn detach(&mut self, parent: Handle, child: Handle) -> Result<bool, ObjectError> {
        if self.obj(child)?.parent != Some(parent) {
            self.obj(parent)?;
            return Ok(false);
        }
        self.obj_mut(parent)?.children.retain(|c| *c != child);
        self.obj_mut(child)?.parent = None;
        Ok(true)
    }

    /// Set the retention of a container and enforce it right away.
    pub fn set_retention(&mut self, container: Handle, retention: Retention) -> Result<(), ObjectError> {
        let policy = match retention {
            Retention::Unbounded => None,
            Retention::Policy(policy) => Some(policy),
            Retention::Inherit => match self.obj(container)?.parent {
                Some(parent) => self.obj(parent)?.retention.clone(),
                None => None,
            },
        };
        if policy.as_ref().is_some_and(|p| p.max_size == 0) {
            return Err(ObjectError::InvalidRetention(
                "max_size must be >= 1".to_string(),
            ));
        }
        self.obj_mut(container)?.retention = policy;
        self.apply_retention(container)
    }

    /// Add a lateral link. Duplicate links are ignored.
    pub fn link(
        &mut self,
        from: Handle,
        to: Handle,
        relation: RelationshipType,
    ) -> Result<(), ObjectError> {
        self.obj(to)?;
        let links = &mut self.obj_mut(from)?.links;
        let link = Link {
            target: to,
            relation,
        };
        if !links.contains(&link) {
            links.push(link);
        }
        Ok(())
    }

    pub fn set_metadata(
        &mut self,
        handle: Handle,
        key: impl Into<String>,
        value: impl Into<JsonValue>,
    ) -> Result<(), ObjectError> {
        self.obj_mut(handle)?.metadata.insert(key.into(), value.into());
        Ok(())
    }

    pub fn object(&self, handle: Handle) -> Option<&Object> {
        self.objects.get(handle.index())
    }

    pub fn by_id(&self, id: &str) -> Option<Handle> {
        self.ids.get(id).copied()
    }

    /// Ancestors of `handle`, root first, `handle` last. Empty for an
    /// unknown handle.
    pub fn path(&self, handle: Handle) -> Vec<Handle> {
        let mut path = Vec::new();
        let mut cursor = self.object(handle).map(|_| handle);
        while let Some(current) = cursor {
            path.push(current);
            cursor = self.object(current).and_then(Object::parent);
        }
        path.reverse();
        path
    }

    pub fn root(&self, handle: Handle) -> Option<Handle> {
        self.path(handle).first().copied()
    }

    /// `handle` and all of its descendants, breadth-first.
    pub fn walk(&self, handle: Handle) -> Vec<Handle> {
        let mut out = Vec::new();
        if self.object(handle).is_none() {
            return out;
        }
        let mut queue = VecDeque::from([handle]);
        while let Some(current) = queue.pop_front() {
            out.push(current);
            if let Some(obj) = self.object(current) {
                queue.extend(obj.children.iter().copied());
            }
        }
        out
    }

    /// First object under `from` (inclusive, breadth-first) satisfying
    /// `predicate`.
    pub fn find<F>(&self, from: Handle, predicate: F) -> Option<Handle>
    where
        F: Fn(&Object) -> bool,
    {
        self.walk(from)
            .into_iter()
            .find(|h| self.object(*h).is_some_and(&predicate))
    }

    /// Structural digest: content plus children and parent ids.
    pub fn hash(&self, handle: Handle) -> Option<String> {
        let obj = self.object(handle)?;
        let text = obj.payload_text();
        let children = self.child_ids(obj);
        let parent = obj
            .parent
            .and_then(|p| self.object(p))
            .map(|p| p.id.as_str())
            .unwrap_or("");
        let parts: Vec<&str> = match obj.kind {
            ObjectKind::Leaf => vec![text.as_str(), parent],
            ObjectKind::Branch | ObjectKind::Tree | ObjectKind::Node => {
                vec![text.as_str(), children.as_str(), parent]
            }
            ObjectKind::Net => vec![children.as_str()],
            ObjectKind::Layer | ObjectKind::Matrix => vec![obj.name.as_str(), children.as_str()],
        };
        Some(digest(obj.kind, &parts))
    }

    /// Semantic digest: content only, independent of placement.
    pub fn shash(&self, handle: Handle) -> Option<String> {
        let obj = self.object(handle)?;
        let text = obj.payload_text();
        let value = match obj.kind {
            ObjectKind::Branch => digest(obj.kind, &[text.as_str(), obj.id.as_str()]),
            ObjectKind::Net => return self.hash(handle),
            ObjectKind::Layer | ObjectKind::Matrix => digest(obj.kind, &[obj.name.as_str()]),
            ObjectKind::Leaf | ObjectKind::Tree | ObjectKind::Node => {
                digest(obj.kind, &[text.as_str()])
            }
        };
        Some(value)
    }

    pub(crate) fn at(&self, handle: Handle) -> &Object {
        &self.objects[handle.index()]
    }

    fn child_ids(&self, obj: &Object) -> String {
        obj.children
            .iter()
            .filter_map(|c| self.object(*c))
            .map(|c| c.id.as_str())
            .collect::<Vec<_>>()
            .join(",")
    }

    fn insert(
        &mut self,
        kind: ObjectKind,
        id: String,
        data: JsonValue,
    ) -> Result<Handle, ObjectError> {
        let handle = Handle::try_from_index(self.objects.len())?;
        let name = match &data {
            JsonValue::String(s) => s.clone(),
            JsonValue::Null => kind.as_str().to_string(),
            other => other.to_string(),
        };
        self.ids.insert(id.clone(), handle);
        self.objects.push(Object {
            id,
            kind,
            name,
            data,
            parent: None,
            children: Vec::new(),
            links: Vec::new(),
            metadata: Map::new(),
            retention: None,
            retained: Vec::new(),
        });
        Ok(handle)
    }

    fn gen_id(&self) -> String {
        loop {
            let id = Uuid::new_v4().simple().to_string()[..8].to_string();
            if !self.ids.contains_key(&id) {
                return id;
            }
        }
    }

    fn check_child_kind(&self, parent: Handle, child: ObjectKind) -> Result<(), ObjectError> {
        let parent_kind = self.obj(parent)?.kind;
        if parent_kind.allows(child) {
            Ok(())
        } else {
            Err(ObjectError::DisallowedChild {
                parent: parent_kind,
                child,
            })
        }
    }

    fn apply_retention(&mut self, container: Handle) -> Result<(), ObjectError> {
        let obj = self.obj_mut(container)?;
        let Some(policy) = obj.retention.clone() else {
            return Ok(());
        };
        let range = policy.victims(obj.children.len());
        if range.is_empty() {
            return Ok(());
        }
        let pruned: Vec<Handle> = obj.children.drain(range).collect();
        if policy.prune_type == PruneType::Discard {
            obj.retained.extend(pruned.iter().copied());
        }
        let container_id = obj.id.clone();
        for victim in &pruned {
            self.obj_mut(*victim)?.parent = None;
        }
        debug!(
            container = %container_id,
            pruned = pruned.len(),
            prune_type = ?policy.prune_type,
            "retention_prune"
        );
        match policy.notify {
            NotifyMode::Raise => Err(ObjectError::RetentionOverflow {
                container: container_id,
                pruned,
            }),
            NotifyMode::Call => {
                if let Some(callback) = policy.callback() {
                    callback(&pruned);
                }
                Ok(())
            }
            NotifyMode::Suppress => Ok(()),
        }
    }

    fn obj(&self, handle: Handle) -> Result<&Object, ObjectError> {
        self.objects
            .get(handle.index())
            .ok_or(ObjectError::UnknownHandle(handle))
    }

    fn obj_mut(&mut self, handle: Handle) -> Result<&mut Object, ObjectError> {
        self.objects
            .get_mut(handle.index())
            .ok_or(ObjectError::UnknownHandle(handle))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::retention::PruneFrom;

    fn tree_with_branch() -> (Forest, Handle, Handle) {
        let mut forest = Forest::new();
        let tree = forest.create(ObjectKind::Tree, "Knowledge Root").unwrap();
        let branch = forest.add(tree, ObjectKind::Branch, "AI").unwrap();
        (forest, tree, branch)
    }

    #[test]
    fn add_respects_allowed_children() {
        let (mut forest, tree, branch) = tree_with_branch();
        let err = forest.add(tree, ObjectKind::Leaf, "x").unwrap_err();
        assert_eq!(
            err,
            ObjectError::DisallowedChild {
                parent: ObjectKind::Tree,
                child: ObjectKind::Leaf
            }
        );
        assert_eq!(forest.len(), 2, "rejected child must not be created");

        let leaf = forest.add(branch, ObjectKind::Leaf, "Neural Networks").unwrap();
        let nested = forest.add(leaf, ObjectKind::Leaf, "Transformers").unwrap();
        assert_eq!(forest.path(nested), vec![tree, branch, leaf, nested]);
        assert_eq!(forest.root(nested), Some(tree));
    }

    #[test]
    fn attach_is_idempotent_and_moves() {
        let (mut forest, tree, branch) = tree_with_branch();
        let other = forest.add(tree, ObjectKind::Branch, "Mathematics").unwrap();
        let leaf = forest.add(branch, ObjectKind::Leaf, "Graph Theory").unwrap();

        forest.attach(branch, leaf).unwrap();
        assert_eq!(forest.object(branch).unwrap().children(), &[leaf]);

        forest.attach(other, leaf).unwrap();
        assert!(forest.object(branch).unwrap().children().is_empty());
        assert_eq!(forest.object(leaf).unwrap().parent(), Some(other));

        assert!(forest.detach(other, leaf).unwrap());
        assert!(!forest.detach(other, leaf).unwrap());
        assert_eq!(forest.root(leaf), Some(leaf));
    }

    #[test]
    fn attach_rejects_cycles() {
        let mut forest = Forest::new();
        let a = forest.create(ObjectKind::Leaf, "a").unwrap();
        let b = forest.add(a, ObjectKind::Leaf, "b").unwrap();
        assert!(matches!(forest.attach(b, a), Err(ObjectError::Cycle(_))));
        assert!(matches!(forest.attach(a, a), Err(ObjectError::Cycle(_))));
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn handle_indices_are_bounded_by_u32() {
        let last = u32::MAX as usize;
        assert_eq!(Handle::try_from_index(last).unwrap().index(), last);
        assert_eq!(
            Handle::try_from_index(last + 1),
            Err(ObjectError::CapacityExceeded(last + 1))
        );
    }

    #[test]
    fn explicit_ids_are_unique() {
        let mut forest = Forest::new();
        let h = forest.create_with_id(ObjectKind::Tree, "root", "Root").unwrap();
        assert_eq!(forest.by_id("root"), Some(h));
        assert_eq!(
            forest.create_with_id(ObjectKind::Tree, "root", "Again"),
            Err(ObjectError::DuplicateId("root".into()))
        );
        let generated = forest.create(ObjectKind::Tree, JsonValue::Null).unwrap();
        let obj = forest.object(generated).unwrap();
        assert_eq!(obj.id().len(), 8);
        assert_eq!(obj.name(), "tree");
    }

    #[test]
    fn walk_and_find_are_breadth_first() {
        let (mut forest, tree, branch) = tree_with_branch();
        let math = forest.add(tree, ObjectKind::Branch, "Mathematics").unwrap();
        let nn = forest.add(branch, ObjectKind::Leaf, "Neural Networks").unwrap();
        let gt = forest.add(math, ObjectKind::Leaf, "Graph Theory").unwrap();
        assert_eq!(forest.walk(tree), vec![tree, branch, math, nn, gt]);
        assert_eq!(forest.find(tree, |o| o.is_leaf()), Some(nn));
        assert_eq!(forest.find(math, |o| o.name() == "Neural Networks"), None);
    }

    #[test]
    fn forward_discard_keeps_newest_out() {
        let (mut forest, _, branch) = tree_with_branch();
        forest
            .set_retention(branch, Retention::Policy(RetentionPolicy::new(2)))
            .unwrap();
        let a = forest.add(branch, ObjectKind::Leaf, "a").unwrap();
        let b = forest.add(branch, ObjectKind::Leaf, "b").unwrap();
        let c = forest.add(branch, ObjectKind::Leaf, "c").unwrap();
        let obj = forest.object(branch).unwrap();
        assert_eq!(obj.children(), &[a, b]);
        assert_eq!(obj.retained(), &[c]);
        assert_eq!(forest.object(c).unwrap().parent(), None);
    }

    #[test]
    fn backward_destroy_drops_oldest() {
        let (mut forest, _, branch) = tree_with_branch();
        let policy = RetentionPolicy::new(1)
            .prune_from(PruneFrom::Backward)
            .prune_type(PruneType::Destroy);
        forest.set_retention(branch, Retention::Policy(policy)).unwrap();
        forest.add(branch, ObjectKind::Leaf, "a").unwrap();
        let b = forest.add(branch, ObjectKind::Leaf, "b").unwrap();
        let obj = forest.object(branch).unwrap();
        assert_eq!(obj.children(), &[b]);
        assert!(obj.retained().is_empty());
    }

    #[test]
    fn zero_capacity_policy_is_rejected() {
        let (mut forest, _, branch) = tree_with_branch();
        let err = forest
            .set_retention(branch, Retention::Policy(RetentionPolicy::new(0)))
            .unwrap_err();
        assert!(matches!(err, ObjectError::InvalidRetention(_)));
        assert!(forest.object(branch).unwrap().retention().is_none());
    }

    #[test]
    fn raise_reports_after_pruning() {
        let (mut forest, _, branch) = tree_with_branch();
        let policy = RetentionPolicy::new(1).notify(NotifyMode::Raise);
        forest.set_retention(branch, Retention::Policy(policy)).unwrap();
        let a = forest.add(branch, ObjectKind::Leaf, "a").unwrap();
        let b = forest.create(ObjectKind::Leaf, "b").unwrap();
        let err = forest.attach(branch, b).unwrap_err();
        assert!(matches!(
            err,
            ObjectError::RetentionOverflow { ref pruned, .. } if pruned == &vec![b]
        ));
        assert_eq!(forest.object(branch).unwrap().children(), &[a]);
    }

    #[test]
    fn call_notifies_and_inherit_copies_policy() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let mut forest = Forest::new();
        let tree = forest.create(ObjectKind::Tree, "root").unwrap();
        let policy = RetentionPolicy::new(1).on_prune(move |pruned| {
            sink.lock().unwrap().extend_from_slice(pruned);
        });
        forest.set_retention(tree, Retention::Policy(policy)).unwrap();
        let branch = forest.add(tree, ObjectKind::Branch, "AI").unwrap();
        forest.set_retention(branch, Retention::Inherit).unwrap();
        assert_eq!(forest.object(branch).unwrap().retention().unwrap().max_size, 1);

        forest.add(branch, ObjectKind::Leaf, "a").unwrap();
        let b = forest.add(branch, ObjectKind::Leaf, "b").unwrap();
        assert_eq!(*seen.lock().unwrap(), vec![b]);
    }

    #[test]
    fn hash_tracks_structure_shash_tracks_content() {
        let (mut forest, tree, branch) = tree_with_branch();
        let leaf = forest.add(branch, ObjectKind::Leaf, "Neural Networks").unwrap();
        let before = (forest.hash(leaf).unwrap(), forest.shash(leaf).unwrap());

        let other = forest.add(tree, ObjectKind::Branch, "Mathematics").unwrap();
        forest.attach(other, leaf).unwrap();
        assert_ne!(forest.hash(leaf).unwrap(), before.0);
        assert_eq!(forest.shash(leaf).unwrap(), before.1);

        let twin = forest.create(ObjectKind::Leaf, "Neural Networks").unwrap();
        assert_eq!(forest.shash(twin), forest.shash(leaf));
        assert_eq!(forest.hash(Handle(99)), None);
    }

    #[test]
    fn links_are_deduplicated() {
        let (mut forest, tree, branch) = tree_with_branch();
        forest.link(branch, tree, RelationshipType::References).unwrap();
        forest.link(branch, tree, RelationshipType::References).unwrap();
        forest.link(branch, tree, RelationshipType::Extends).unwrap();
        assert_eq!(forest.object(branch).unwrap().links().len(), 2);
        assert_eq!(
            forest.link(branch, Handle(42), RelationshipType::Influences),
            Err(ObjectError::UnknownHandle(Handle(42)))
        );
    }
}
