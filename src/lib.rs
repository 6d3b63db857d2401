//! Workspace umbrella crate for Knvectis.
//!
//! This crate stitches the traverser, the hunt engine and the structural
//! primitives together so callers can configure and run hunts over a
//! [`Forest`] with a single API entry point.

pub mod config;

pub use config::{
    ConfigLoadError, EngineYamlConfig, KnvectisConfig, LoggingYamlConfig, TraversalYamlConfig,
};
pub use hunt::{
    depth_signal, path_signal, set_hunt_metrics, Criteria, Engine, EngineConfig, FailurePolicy,
    Hunt, HuntError, HuntMetrics, HuntStage, HuntStats, Hunter, HunterFailure, Match,
    MatchContext, MatchSummary, Metadata,
};
pub use objects::{
    object_resolvers, object_traverser, Forest, Handle, MatchLevel, NotifyMode, ObjectError,
    ObjectKind, ObjectRef, PruneFrom, PruneType, RelationshipType, Retention, RetentionPolicy,
};
pub use traverse::{
    Node, ResolverKind, Resolvers, RuleError, TraversalConfig, TraversalMode, TraverseError,
    Traverser, Visit,
};

use std::sync::Arc;

use thiserror::Error;

/// Errors surfaced by the umbrella helpers.
#[derive(Debug, Error)]
pub enum KnvectisError {
    #[error("configuration failure: {0}")]
    Config(#[from] ConfigLoadError),
    #[error("object failure: {0}")]
    Object(#[from] ObjectError),
    #[error("traversal failure: {0}")]
    Traverse(#[from] TraverseError),
    #[error("hunt failure: {0}")]
    Hunt(#[from] HuntError),
}

/// Build an engine over [`ObjectRef`] nodes with the traversal and engine
/// sections of `config`. Hunters still need to be added.
pub fn forest_engine(config: &KnvectisConfig) -> Result<Engine<ObjectRef>, KnvectisError> {
    let traverser = object_traverser(config.traversal.to_traversal_config())?;
    let engine = Engine::with_config(Arc::new(traverser), config.engine.to_engine_config())?;
    Ok(engine)
}

/// Small knowledge tree used by the demo binary, benches and tests.
///
/// ```text
/// Knowledge Root (tree)
/// ├── AI (branch)
/// │   ├── Neural Networks (leaf)        ── depends_on ──> Graph Theory
/// │   └── Reinforcement Learning (leaf) ── extends ─────> Neural Networks
/// └── Mathematics (branch)
///     └── Graph Theory (leaf)
/// ```
///
/// Returns the frozen forest and the handle of the tree.
pub fn knowledge_demo() -> Result<(Arc<Forest>, Handle), ObjectError> {
    let mut forest = Forest::new();
    let root = forest.create_with_id(ObjectKind::Tree, "knowledge-root", "Knowledge Root")?;
    let ai = forest.add(root, ObjectKind::Branch, "AI")?;
    let math = forest.add(root, ObjectKind::Branch, "Mathematics")?;
    let nn = forest.add(ai, ObjectKind::Leaf, "Neural Networks")?;
    let rl = forest.add(ai, ObjectKind::Leaf, "Reinforcement Learning")?;
    let gt = forest.add(math, ObjectKind::Leaf, "Graph Theory")?;

    forest.link(nn, gt, RelationshipType::DependsOn)?;
    forest.link(rl, nn, RelationshipType::Extends)?;
    forest.set_metadata(nn, "field", "machine learning")?;
    forest.set_metadata(rl, "field", "machine learning")?;
    forest.set_metadata(gt, "field", "discrete mathematics")?;

    Ok((forest.share(), root))
}

/// Hunters run by the demo binary.
pub fn demo_hunters() -> Vec<Hunter<ObjectRef>> {
    vec![
        Hunter::new("learning", |node: &ObjectRef| {
            node.name().to_lowercase().contains("learning")
        }),
        Hunter::new("leaves", |node: &ObjectRef| node.is_leaf())
            .with_scorer(|node: &ObjectRef| node.name().len() as f64)
            .on_match(depth_signal),
        Hunter::from_criteria(
            "machine-learning",
            Criteria::new().with_attribute("field", "machine learning"),
        )
        .on_match(|ctx: &mut MatchContext<ObjectRef>| {
            let level = ctx.node().level().map(|l| l as u8);
            ctx.enrich("level", level);
        }),
    ]
}

/// Install the global `tracing` subscriber described by `logging`.
///
/// `RUST_LOG` takes precedence over `logging.level`. Returns `false` if a
/// subscriber was already installed.
#[cfg(feature = "cli")]
pub fn init_tracing(logging: &LoggingYamlConfig) -> bool {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(logging.level.as_str()));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);
    if logging.json {
        builder.json().try_init().is_ok()
    } else {
        builder.try_init().is_ok()
    }
}
