use std::fmt;

use serde::{Deserialize, Serialize};

/// The three resolver slots a traverser can consult.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ResolverKind {
    Children,
    Parent,
    Lateral,
}

impl ResolverKind {
    pub const ALL: [ResolverKind; 3] = [
        ResolverKind::Children,
        ResolverKind::Parent,
        ResolverKind::Lateral,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResolverKind::Children => "children",
            ResolverKind::Parent => "parent",
            ResolverKind::Lateral => "lateral",
        }
    }
}

impl fmt::Display for ResolverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which resolver(s) the traverser consults at each step.
///
/// Neighbors of a node are always gathered in the fixed order
/// children, parent, lateral. `Bidirectional` therefore interleaves
/// both directions inside a single breadth-first pass rather than running
/// two independent passes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TraversalMode {
    /// Root towards leaves: children only.
    #[default]
    Forward,
    /// Leaves towards root: parent only.
    Backward,
    /// Cross-branch moves: lateral only.
    Lateral,
    /// Children and parent.
    Bidirectional,
    /// Caller-selected combination.
    Custom {
        #[serde(default)]
        children: bool,
        #[serde(default)]
        parent: bool,
        #[serde(default)]
        lateral: bool,
    },
}

impl TraversalMode {
    /// Whether this mode consults the given resolver.
    pub fn uses(&self, kind: ResolverKind) -> bool {
        match (self, kind) {
            (TraversalMode::Forward, ResolverKind::Children) => true,
            (TraversalMode::Backward, ResolverKind::Parent) => true,
            (TraversalMode::Lateral, ResolverKind::Lateral) => true,
            (TraversalMode::Bidirectional, ResolverKind::Children | ResolverKind::Parent) => true,
            (TraversalMode::Custom { children, .. }, ResolverKind::Children) => *children,
            (TraversalMode::Custom { parent, .. }, ResolverKind::Parent) => *parent,
            (TraversalMode::Custom { lateral, .. }, ResolverKind::Lateral) => *lateral,
            _ => false,
        }
    }

    /// Resolvers consulted by this mode, in neighbor-gathering order.
    pub fn kinds(&self) -> impl Iterator<Item = ResolverKind> + '_ {
        ResolverKind::ALL.into_iter().filter(move |kind| self.uses(*kind))
    }

    pub fn label(&self) -> &'static str {
        match self {
            TraversalMode::Forward => "forward",
            TraversalMode::Backward => "backward",
            TraversalMode::Lateral => "lateral",
            TraversalMode::Bidirectional => "bidirectional",
            TraversalMode::Custom { .. } => "custom",
        }
    }
}

impl fmt::Display for TraversalMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bidirectional_uses_children_then_parent() {
        let kinds: Vec<_> = TraversalMode::Bidirectional.kinds().collect();
        assert_eq!(kinds, vec![ResolverKind::Children, ResolverKind::Parent]);
    }

    #[test]
    fn custom_mode_selects_flags() {
        let mode = TraversalMode::Custom {
            children: false,
            parent: true,
            lateral: true,
        };
        let kinds: Vec<_> = mode.kinds().collect();
        assert_eq!(kinds, vec![ResolverKind::Parent, ResolverKind::Lateral]);
    }

    #[test]
    fn mode_serde_is_tagged() {
        let json = serde_json::to_string(&TraversalMode::Backward).unwrap();
        assert_eq!(json, r#"{"type":"backward"}"#);

        let mode: TraversalMode =
            serde_json::from_str(r#"{"type":"custom","lateral":true}"#).unwrap();
        assert_eq!(
            mode,
            TraversalMode::Custom {
                children: false,
                parent: false,
                lateral: true
            }
        );
    }
}
