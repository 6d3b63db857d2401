use std::iter::FusedIterator;
use std::sync::Arc;
use std::time::Instant;

use tracing::{info, warn, Level};
use traverse::{Node, Traversal, TraversalMode, Traverser, Visit};

use crate::hunter::Hunter;
use crate::metrics::metrics_recorder;
use crate::types::{EngineConfig, FailurePolicy, HuntError, HuntStats, HunterFailure, Match};

/// Runs an ordered list of hunters over one traversal.
///
/// The engine owns its hunters and shares its traverser. Each call to
/// [`Engine::run`] gets its own traversal state, so one engine can serve
/// several runs at once, from several threads, as long as the caller's
/// resolvers and hunters are thread-safe themselves.
#[derive(Debug)]
pub struct Engine<N> {
    traverser: Arc<Traverser<N>>,
    hunters: Vec<Hunter<N>>,
    config: EngineConfig,
}

impl<N: Node> Engine<N> {
    pub fn new(traverser: Traverser<N>) -> Self {
        Self::with_shared(Arc::new(traverser))
    }

    /// Engine over a traverser shared with other engines.
    pub fn with_shared(traverser: Arc<Traverser<N>>) -> Self {
        Self {
            traverser,
            hunters: Vec::new(),
            config: EngineConfig::default(),
        }
    }

    pub fn with_config(traverser: Arc<Traverser<N>>, config: EngineConfig) -> Result<Self, HuntError> {
        config.validate()?;
        Ok(Self {
            traverser,
            hunters: Vec::new(),
            config,
        })
    }

    /// Append a hunter. Registration order decides the order of matches
    /// produced for the same node.
    pub fn add_hunter(&mut self, hunter: Hunter<N>) -> &mut Self {
        self.hunters.push(hunter);
        self
    }

    #[must_use]
    pub fn hunter(mut self, hunter: Hunter<N>) -> Self {
        self.hunters.push(hunter);
        self
    }

    pub fn hunters(&self) -> &[Hunter<N>] {
        &self.hunters
    }

    pub fn traverser(&self) -> &Arc<Traverser<N>> {
        &self.traverser
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Start a run from `root`.
    ///
    /// Fails synchronously if `mode` needs a resolver the traverser lacks.
    /// Otherwise returns a lazy [`Hunt`]: no node is visited and no hunter
    /// is evaluated until the caller pulls.
    pub fn run(&self, root: N, mode: TraversalMode) -> Result<Hunt<'_, N>, HuntError> {
        let traversal = self.traverser.traverse(root, mode)?;
        let span = tracing::span!(
            Level::DEBUG,
            "hunt.run",
            mode = %mode,
            hunters = self.hunters.len()
        );
        Ok(Hunt {
            engine: self,
            traversal,
            mode,
            current: None,
            next_hunter: 0,
            stats: HuntStats::default(),
            failures: Vec::new(),
            done: false,
            started: Instant::now(),
            span,
        })
    }

    /// Drain a run into a vector.
    ///
    /// Hunter failures surfaced under [`FailurePolicy::Surface`] are skipped;
    /// the first fatal error ends the drain and is returned.
    pub fn collect(&self, root: N, mode: TraversalMode) -> Result<Vec<Match<N>>, HuntError> {
        let mut found = Vec::new();
        for item in self.run(root, mode)? {
            match item {
                Ok(m) => found.push(m),
                Err(err) if err.is_fatal() => return Err(err),
                Err(_) => continue,
            }
        }
        Ok(found)
    }
}

/// One in-progress run of an [`Engine`].
///
/// Iterating interleaves traversal and hunter evaluation: for each visited
/// node, hunters are tried in registration order, and every match is
/// yielded as soon as it exists, before the next hunter runs. Dropping the
/// `Hunt` cancels the run; nothing needs tearing down.
pub struct Hunt<'e, N: Node> {
    engine: &'e Engine<N>,
    traversal: Traversal<'e, N>,
    mode: TraversalMode,
    current: Option<Visit<N>>,
    next_hunter: usize,
    stats: HuntStats,
    failures: Vec<HunterFailure>,
    done: bool,
    started: Instant,
    span: tracing::Span,
}

impl<N: Node> Hunt<'_, N> {
    pub fn stats(&self) -> HuntStats {
        self.stats
    }

    /// Hunter failures isolated so far, in the order they happened.
    pub fn failures(&self) -> &[HunterFailure] {
        &self.failures
    }

    pub fn mode(&self) -> TraversalMode {
        self.mode
    }

    /// `true` once the run has ended and `next` will return `None`.
    pub fn is_finished(&self) -> bool {
        self.done
    }

    fn finish(&mut self) {
        if self.done {
            return;
        }
        self.done = true;
        self.current = None;
        let latency = self.started.elapsed();
        info!(
            mode = %self.mode,
            visited = self.stats.visited,
            matches = self.stats.matches,
            failures = self.stats.failures,
            elapsed_micros = latency.as_micros(),
            "hunt_complete"
        );
        if let Some(recorder) = metrics_recorder() {
            recorder.record_run(self.mode, latency, &self.stats);
        }
    }

    fn record_failure(&mut self, failure: &HunterFailure) {
        self.stats.failures += 1;
        warn!(
            hunter = %failure.hunter,
            stage = %failure.stage,
            node = %failure.node,
            depth = failure.depth,
            error = %failure.message,
            "hunter_failure"
        );
        if let Some(recorder) = metrics_recorder() {
            recorder.record_hunter_failure(&failure.hunter, failure.stage);
        }
        self.failures.push(failure.clone());
    }
}

impl<N: Node> Iterator for Hunt<'_, N> {
    type Item = Result<Match<N>, HuntError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let span = self.span.clone();
        let _guard = span.enter();
        let engine = self.engine;

        loop {
            if engine
                .config
                .max_matches
                .is_some_and(|max| self.stats.matches >= max)
            {
                self.finish();
                return None;
            }

            if let Some(visit) = self.current.take() {
                while self.next_hunter < engine.hunters.len() {
                    let hunter = &engine.hunters[self.next_hunter];
                    self.next_hunter += 1;
                    match hunter.hunt(&visit) {
                        Ok(Some(found)) => {
                            self.stats.matches += 1;
                            self.current = Some(visit);
                            return Some(Ok(found));
                        }
                        Ok(None) => {}
                        Err(failure) => {
                            self.record_failure(&failure);
                            if engine.config.failure_policy == FailurePolicy::Surface {
                                self.current = Some(visit);
                                return Some(Err(HuntError::Hunter(failure)));
                            }
                        }
                    }
                }
            }

            match self.traversal.next() {
                None => {
                    self.finish();
                    return None;
                }
                Some(Err(err)) => {
                    self.finish();
                    return Some(Err(HuntError::Traverse(err)));
                }
                Some(Ok(visit)) => {
                    self.stats.visited += 1;
                    self.current = Some(visit);
                    self.next_hunter = 0;
                }
            }
        }
    }
}

impl<N: Node> FusedIterator for Hunt<'_, N> {}
