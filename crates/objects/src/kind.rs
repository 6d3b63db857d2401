use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of a structural object, outermost first.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    Matrix,
    Layer,
    Net,
    Node,
    Tree,
    Branch,
    Leaf,
}

impl ObjectKind {
    /// Kinds this kind may contain.
    pub fn allowed_children(&self) -> &'static [ObjectKind] {
        match self {
            ObjectKind::Matrix => &[ObjectKind::Layer],
            ObjectKind::Layer => &[ObjectKind::Net],
            ObjectKind::Net => &[ObjectKind::Node],
            ObjectKind::Node => &[ObjectKind::Tree],
            ObjectKind::Tree => &[ObjectKind::Branch],
            ObjectKind::Branch | ObjectKind::Leaf => &[ObjectKind::Leaf],
        }
    }

    pub fn allows(&self, child: ObjectKind) -> bool {
        self.allowed_children().contains(&child)
    }

    pub fn level(&self) -> Option<MatchLevel> {
        match self {
            ObjectKind::Tree => Some(MatchLevel::Tree),
            ObjectKind::Branch => Some(MatchLevel::Branch),
            ObjectKind::Leaf => Some(MatchLevel::Leaf),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectKind::Matrix => "matrix",
            ObjectKind::Layer => "layer",
            ObjectKind::Net => "net",
            ObjectKind::Node => "node",
            ObjectKind::Tree => "tree",
            ObjectKind::Branch => "branch",
            ObjectKind::Leaf => "leaf",
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Granularity of a match inside a tree.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum MatchLevel {
    Tree = 1,
    Branch = 2,
    Leaf = 3,
}

/// Meaning of a lateral link between two objects.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipType {
    Influences,
    DependsOn,
    References,
    Extends,
    Contradicts,
}

impl RelationshipType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationshipType::Influences => "influences",
            RelationshipType::DependsOn => "depends_on",
            RelationshipType::References => "references",
            RelationshipType::Extends => "extends",
            RelationshipType::Contradicts => "contradicts",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hierarchy_rules() {
        assert!(ObjectKind::Tree.allows(ObjectKind::Branch));
        assert!(!ObjectKind::Tree.allows(ObjectKind::Leaf));
        assert!(ObjectKind::Branch.allows(ObjectKind::Leaf));
        assert!(ObjectKind::Leaf.allows(ObjectKind::Leaf));
        assert!(!ObjectKind::Net.allows(ObjectKind::Tree));
        assert!(ObjectKind::Matrix.allows(ObjectKind::Layer));
    }

    #[test]
    fn levels_order_from_tree_to_leaf() {
        assert_eq!(ObjectKind::Leaf.level(), Some(MatchLevel::Leaf));
        assert!(MatchLevel::Tree < MatchLevel::Leaf);
        assert_eq!(ObjectKind::Net.level(), None);
        assert_eq!(MatchLevel::Branch as u8, 2);
    }
}
