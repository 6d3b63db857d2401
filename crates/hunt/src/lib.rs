//! # Knvectis hunt engine (`hunt`)
//!
//! ## Purpose
//!
//! `hunt` runs a set of independently defined matching rules ("hunters")
//! over the nodes produced by a [`traverse::Traverser`], and yields scored,
//! metadata-enriched [`Match`] records.
//!
//! ## Core Types
//!
//! - [`Hunter`]: named rule = predicate + optional scorer + optional
//!   enrichment callback.
//! - [`MatchContext`]: what the enrichment callback sees; only its metadata
//!   bag is writable.
//! - [`Match`]: matched node, owning hunter, score, path, depth, metadata.
//! - [`Engine`]: ordered hunters + shared traverser; [`Engine::run`] returns
//!   a lazy [`Hunt`].
//! - [`Criteria`]: declarative attribute-equality predicate.
//!
//! ## Ordering
//!
//! Nodes are visited breadth-first. For each node, hunters run in
//! registration order and their matches come out adjacently, before the
//! traversal advances.
//!
//! ## Failures
//!
//! - Missing resolver for the mode: [`Engine::run`] fails up front.
//! - Hunter failure: isolated to that (hunter, node) pair, see
//!   [`FailurePolicy`].
//! - Resolver failure: yielded once as an error, then the run is over.
//!
//! ## Example Usage
//!
//! ```
//! use hunt::{Engine, Hunter};
//! use traverse::{Node, Resolvers, TraversalMode, Traverser};
//!
//! #[derive(Clone, Debug)]
//! struct Dir(&'static str);
//!
//! impl Node for Dir {
//!     type Key = &'static str;
//!     fn key(&self) -> &'static str { self.0 }
//!     fn name(&self) -> &str { self.0 }
//! }
//!
//! let traverser = Traverser::new(Resolvers::new().children(|d: &Dir| match d.0 {
//!     "src" => vec![Dir("lib.rs"), Dir("engine")],
//!     "engine" => vec![Dir("tests.rs")],
//!     _ => Vec::new(),
//! }));
//!
//! let engine = Engine::new(traverser).hunter(
//!     Hunter::new("rust-files", |d: &Dir| d.0.ends_with(".rs"))
//!         .with_scorer(|d: &Dir| d.0.len() as f64),
//! );
//!
//! for found in engine.run(Dir("src"), TraversalMode::Forward).unwrap() {
//!     let found = found.unwrap();
//!     println!("{} score={} depth={}", found.node().0, found.score(), found.depth());
//! }
//! ```
//!
//! ## Observability
//!
//! Runs log through `tracing`. Install a [`HuntMetrics`] implementation via
//! [`set_hunt_metrics`] to record per-run latency and counters.

pub mod context;
pub mod criteria;
pub mod engine;
pub mod hunter;
pub mod metrics;
pub mod signals;
pub mod types;

pub use crate::context::MatchContext;
pub use crate::criteria::Criteria;
pub use crate::engine::{Engine, Hunt};
pub use crate::hunter::Hunter;
pub use crate::metrics::{set_hunt_metrics, HuntMetrics};
pub use crate::signals::{depth_signal, path_signal};
pub use crate::types::{
    EngineConfig, FailurePolicy, HuntError, HuntStage, HuntStats, HunterFailure, Match,
    MatchSummary, Metadata,
};
pub use traverse::RuleError;
