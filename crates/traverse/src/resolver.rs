//! Resolver set: the caller-supplied functions that define graph structure.
//!
//! The traverser never inspects nodes for structure. Instead it asks up to
//! three resolvers:
//!
//! - `children(node)`: ordered, possibly empty sequence of nodes
//! - `parent(node)`: a node or nothing
//! - `lateral(node)`: ordered cross-branch neighbors
//!
//! Resolvers must be pure for the duration of one traversal: calling one
//! twice with the same node yields the same result.
//!
//! Each slot accepts either an infallible closure or a fallible `try_*`
//! variant returning [`RuleError`]. A failing resolver is fatal to the
//! traversal that invoked it.

use std::fmt;

use crate::error::RuleError;
use crate::mode::ResolverKind;

type ManyFn<N> = Box<dyn Fn(&N) -> Result<Vec<N>, RuleError> + Send + Sync>;
type OneFn<N> = Box<dyn Fn(&N) -> Result<Option<N>, RuleError> + Send + Sync>;

/// The three optional resolver slots.
pub struct Resolvers<N> {
    children: Option<ManyFn<N>>,
    parent: Option<OneFn<N>>,
    lateral: Option<ManyFn<N>>,
}

impl<N> Default for Resolvers<N> {
    fn default() -> Self {
        Self {
            children: None,
            parent: None,
            lateral: None,
        }
    }
}

impl<N> Resolvers<N> {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn children<F>(self, f: F) -> Self
    where
        F: Fn(&N) -> Vec<N> + Send + Sync + 'static,
    {
        self.try_children(move |node| Ok(f(node)))
    }

    #[must_use]
    pub fn try_children<F>(mut self, f: F) -> Self
    where
        F: Fn(&N) -> Result<Vec<N>, RuleError> + Send + Sync + 'static,
    {
        self.children = Some(Box::new(f));
        self
    }

    #[must_use]
    pub fn parent<F>(self, f: F) -> Self
    where
        F: Fn(&N) -> Option<N> + Send + Sync + 'static,
    {
        self.try_parent(move |node| Ok(f(node)))
    }

    #[must_use]
    pub fn try_parent<F>(mut self, f: F) -> Self
    where
        F: Fn(&N) -> Result<Option<N>, RuleError> + Send + Sync + 'static,
    {
        self.parent = Some(Box::new(f));
        self
    }

    #[must_use]
    pub fn lateral<F>(self, f: F) -> Self
    where
        F: Fn(&N) -> Vec<N> + Send + Sync + 'static,
    {
        self.try_lateral(move |node| Ok(f(node)))
    }

    #[must_use]
    pub fn try_lateral<F>(mut self, f: F) -> Self
    where
        F: Fn(&N) -> Result<Vec<N>, RuleError> + Send + Sync + 'static,
    {
        self.lateral = Some(Box::new(f));
        self
    }

    /// Whether the slot for `kind` is populated.
    pub fn has(&self, kind: ResolverKind) -> bool {
        match kind {
            ResolverKind::Children => self.children.is_some(),
            ResolverKind::Parent => self.parent.is_some(),
            ResolverKind::Lateral => self.lateral.is_some(),
        }
    }

    /// Invoke one resolver and append its neighbors to `out`.
    ///
    /// An absent slot contributes nothing; the traverser checks slot
    /// presence up front so this only happens for unused kinds.
    pub(crate) fn resolve_into(
        &self,
        kind: ResolverKind,
        node: &N,
        out: &mut Vec<N>,
    ) -> Result<(), RuleError> {
        match kind {
            ResolverKind::Children => {
                if let Some(f) = &self.children {
                    out.extend(f(node)?);
                }
            }
            ResolverKind::Parent => {
                if let Some(f) = &self.parent {
                    out.extend(f(node)?);
                }
            }
            ResolverKind::Lateral => {
                if let Some(f) = &self.lateral {
                    out.extend(f(node)?);
                }
            }
        }
        Ok(())
    }
}

impl<N> fmt::Debug for Resolvers<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolvers")
            .field("children", &self.children.is_some())
            .field("parent", &self.parent.is_some())
            .field("lateral", &self.lateral.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slots_report_presence() {
        let resolvers: Resolvers<u32> = Resolvers::new().children(|n| vec![n + 1]);
        assert!(resolvers.has(ResolverKind::Children));
        assert!(!resolvers.has(ResolverKind::Parent));
        assert!(!resolvers.has(ResolverKind::Lateral));
    }

    #[test]
    fn resolve_into_appends_in_order() {
        let resolvers: Resolvers<u32> = Resolvers::new()
            .children(|n| vec![n * 10, n * 10 + 1])
            .parent(|n| if *n > 0 { Some(n - 1) } else { None });

        let mut out = Vec::new();
        resolvers
            .resolve_into(ResolverKind::Children, &2, &mut out)
            .unwrap();
        resolvers
            .resolve_into(ResolverKind::Parent, &2, &mut out)
            .unwrap();
        assert_eq!(out, vec![20, 21, 1]);

        let mut none = Vec::new();
        resolvers
            .resolve_into(ResolverKind::Parent, &0, &mut none)
            .unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn fallible_resolver_propagates() {
        let resolvers: Resolvers<u32> =
            Resolvers::new().try_lateral(|_| Err(RuleError::from("link table offline")));
        let mut out = Vec::new();
        let err = resolvers
            .resolve_into(ResolverKind::Lateral, &1, &mut out)
            .unwrap_err();
        assert_eq!(err.message(), "link table offline");
    }
}
