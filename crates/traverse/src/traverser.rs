use std::collections::VecDeque;
use std::iter::FusedIterator;
use std::time::Instant;

use fxhash::FxHashSet;
use tracing::{debug, warn, Level};

use crate::config::TraversalConfig;
use crate::error::TraverseError;
use crate::mode::TraversalMode;
use crate::node::Node;
use crate::resolver::Resolvers;

/// One step of a traversal: the node, the path that reached it and its depth.
#[derive(Debug, Clone, PartialEq)]
pub struct Visit<N> {
    pub node: N,
    /// Nodes from the root to `node`, root first, `node` last.
    pub path: Vec<N>,
    /// Number of edges between the root and `node` (`path.len() - 1`).
    pub depth: usize,
}

/// Walks a graph through its resolvers.
///
/// A `Traverser` is immutable after construction and can be shared across
/// threads; each call to [`Traverser::traverse`] owns its own frontier and
/// visited-set.
#[derive(Debug)]
pub struct Traverser<N> {
    resolvers: Resolvers<N>,
    config: TraversalConfig,
}

impl<N: Node> Traverser<N> {
    /// Traverser with unlimited depth and node count.
    pub fn new(resolvers: Resolvers<N>) -> Self {
        Self {
            resolvers,
            config: TraversalConfig::default(),
        }
    }

    pub fn with_config(
        resolvers: Resolvers<N>,
        config: TraversalConfig,
    ) -> Result<Self, TraverseError> {
        config.validate()?;
        Ok(Self { resolvers, config })
    }

    pub fn resolvers(&self) -> &Resolvers<N> {
        &self.resolvers
    }

    pub fn config(&self) -> &TraversalConfig {
        &self.config
    }

    /// Verify that every resolver `mode` needs is present.
    pub fn check(&self, mode: TraversalMode) -> Result<(), TraverseError> {
        let mut any = false;
        for kind in mode.kinds() {
            any = true;
            if !self.resolvers.has(kind) {
                return Err(TraverseError::Configuration {
                    mode,
                    missing: kind,
                });
            }
        }
        if !any {
            return Err(TraverseError::InvalidConfig(
                "custom traversal mode selects no resolver".into(),
            ));
        }
        Ok(())
    }

    /// Start a breadth-first traversal from `root`.
    ///
    /// Configuration problems are reported here, before any node is
    /// produced. The returned sequence is lazy: a node's resolvers run only
    /// when the item after it is requested.
    pub fn traverse(&self, root: N, mode: TraversalMode) -> Result<Traversal<'_, N>, TraverseError> {
        self.check(mode)?;

        let span = tracing::span!(Level::DEBUG, "traverse.traverse", mode = %mode);
        let mut visited = FxHashSet::default();
        visited.insert(root.key());
        let mut queue = VecDeque::new();
        queue.push_back(vec![root]);

        Ok(Traversal {
            traverser: self,
            mode,
            queue,
            visited,
            pending: None,
            yielded: 0,
            done: false,
            started: Instant::now(),
            span,
        })
    }
}

/// Lazy, cycle-safe breadth-first sequence of [`Visit`]s.
///
/// Nodes come out in non-decreasing depth order. Within one depth, order
/// follows the resolvers' output, concatenated in dequeue order of the
/// parents. After a resolver error has been yielded the sequence is over.
pub struct Traversal<'t, N: Node> {
    traverser: &'t Traverser<N>,
    mode: TraversalMode,
    // Each entry is a full path; the node is its last element.
    queue: VecDeque<Vec<N>>,
    visited: FxHashSet<N::Key>,
    pending: Option<Vec<N>>,
    yielded: usize,
    done: bool,
    started: Instant,
    span: tracing::Span,
}

impl<N: Node> Traversal<'_, N> {
    pub fn mode(&self) -> TraversalMode {
        self.mode
    }

    /// Nodes yielded so far.
    pub fn yielded(&self) -> usize {
        self.yielded
    }

    /// Nodes discovered so far, including ones still queued.
    pub fn discovered(&self) -> usize {
        self.visited.len()
    }

    fn expand(&mut self, path: Vec<N>) -> Result<(), TraverseError> {
        let Some(node) = path.last() else {
            return Ok(());
        };
        let resolvers = self.traverser.resolvers();

        let mut neighbors = Vec::new();
        for kind in self.mode.kinds() {
            resolvers
                .resolve_into(kind, node, &mut neighbors)
                .map_err(|err| TraverseError::resolver(kind, &node.key(), err))?;
        }

        for neighbor in neighbors {
            // Marked on discovery so converging paths enqueue a node once.
            if self.visited.insert(neighbor.key()) {
                let mut next = Vec::with_capacity(path.len() + 1);
                next.extend(path.iter().cloned());
                next.push(neighbor);
                self.queue.push_back(next);
            }
        }
        Ok(())
    }

    fn finish(&mut self) {
        self.done = true;
        self.queue.clear();
        self.pending = None;
        debug!(
            mode = %self.mode,
            yielded = self.yielded,
            discovered = self.visited.len(),
            elapsed_micros = self.started.elapsed().as_micros(),
            "traversal_complete"
        );
    }
}

impl<N: Node> Iterator for Traversal<'_, N> {
    type Item = Result<Visit<N>, TraverseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let span = self.span.clone();
        let _guard = span.enter();

        if self
            .traverser
            .config()
            .max_nodes
            .is_some_and(|max| self.yielded >= max)
        {
            self.finish();
            return None;
        }

        if let Some(path) = self.pending.take() {
            if let Err(err) = self.expand(path) {
                warn!(mode = %self.mode, error = %err, "resolver_failure");
                self.finish();
                return Some(Err(err));
            }
        }

        let Some(path) = self.queue.pop_front() else {
            self.finish();
            return None;
        };
        let Some(node) = path.last().cloned() else {
            self.finish();
            return None;
        };

        let depth = path.len() - 1;
        self.yielded += 1;
        let visit = Visit {
            node,
            path: path.clone(),
            depth,
        };
        if self.traverser.config().expands(depth) {
            self.pending = Some(path);
        }
        Some(Ok(visit))
    }
}

impl<N: Node> FusedIterator for Traversal<'_, N> {}
