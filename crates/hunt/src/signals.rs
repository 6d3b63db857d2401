//! Ready-made enrichment callbacks.
//!
//! These are plain functions with the enrichment signature so they can be
//! passed straight to [`Hunter::on_match`](crate::Hunter::on_match), or called
//! from a custom callback.

use serde_json::Value as JsonValue;
use traverse::Node;

use crate::context::MatchContext;

/// Writes `depth_score = 1 / (depth + 1)`: 1.0 at the root, decaying with
/// distance from it.
pub fn depth_signal<N>(ctx: &mut MatchContext<N>) {
    let score = 1.0 / (ctx.depth() as f64 + 1.0);
    ctx.enrich("depth_score", score);
}

/// Writes `path` as the list of node names from the root to the match.
pub fn path_signal<N: Node>(ctx: &mut MatchContext<N>) {
    let names: Vec<JsonValue> = ctx
        .path()
        .iter()
        .map(|node| JsonValue::String(node.name().to_string()))
        .collect();
    ctx.enrich("path", names);
}
