use std::fmt;
use std::sync::Arc;

use traverse::{Node, RuleError, Visit};

use crate::context::MatchContext;
use crate::criteria::Criteria;
use crate::types::{HuntStage, HunterFailure, Match};

type PredicateFn<N> = Box<dyn Fn(&N) -> Result<bool, RuleError> + Send + Sync>;
type ScorerFn<N> = Box<dyn Fn(&N) -> Result<f64, RuleError> + Send + Sync>;
type OnMatchFn<N> = Box<dyn Fn(&mut MatchContext<N>) -> Result<(), RuleError> + Send + Sync>;

/// A named matching rule.
///
/// - predicate: decides whether a node is a match
/// - scorer (optional): numeric score, called only for accepted nodes;
///   absent means a score of `0.0`
/// - on_match (optional): enrichment callback, called once per accepted
///   node after scoring
///
/// Every callable has an infallible form and a `try_*` form. A hunter is
/// built up front and is immutable once handed to an engine.
pub struct Hunter<N> {
    name: Arc<str>,
    predicate: PredicateFn<N>,
    scorer: Option<ScorerFn<N>>,
    on_match: Option<OnMatchFn<N>>,
}

impl<N: Node> Hunter<N> {
    pub fn new<F>(name: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&N) -> bool + Send + Sync + 'static,
    {
        Self::try_new(name, move |node| Ok(predicate(node)))
    }

    pub fn try_new<F>(name: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&N) -> Result<bool, RuleError> + Send + Sync + 'static,
    {
        Self {
            name: Arc::from(name.into()),
            predicate: Box::new(predicate),
            scorer: None,
            on_match: None,
        }
    }

    /// Hunter accepting nodes that satisfy `criteria`.
    pub fn from_criteria(name: impl Into<String>, criteria: Criteria) -> Self {
        Self::new(name, move |node| criteria.matches(node))
    }

    /// Like [`Hunter::from_criteria`], with one more condition checked only
    /// when the criteria hold.
    pub fn from_criteria_and<F>(name: impl Into<String>, criteria: Criteria, extra: F) -> Self
    where
        F: Fn(&N) -> bool + Send + Sync + 'static,
    {
        Self::new(name, move |node| criteria.matches(node) && extra(node))
    }

    #[must_use]
    pub fn with_scorer<F>(self, scorer: F) -> Self
    where
        F: Fn(&N) -> f64 + Send + Sync + 'static,
    {
        self.with_try_scorer(move |node| Ok(scorer(node)))
    }

    #[must_use]
    pub fn with_try_scorer<F>(mut self, scorer: F) -> Self
    where
        F: Fn(&N) -> Result<f64, RuleError> + Send + Sync + 'static,
    {
        self.scorer = Some(Box::new(scorer));
        self
    }

    #[must_use]
    pub fn on_match<F>(self, callback: F) -> Self
    where
        F: Fn(&mut MatchContext<N>) + Send + Sync + 'static,
    {
        self.try_on_match(move |ctx| {
            callback(ctx);
            Ok(())
        })
    }

    #[must_use]
    pub fn try_on_match<F>(mut self, callback: F) -> Self
    where
        F: Fn(&mut MatchContext<N>) -> Result<(), RuleError> + Send + Sync + 'static,
    {
        self.on_match = Some(Box::new(callback));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn has_scorer(&self) -> bool {
        self.scorer.is_some()
    }

    pub fn has_on_match(&self) -> bool {
        self.on_match.is_some()
    }

    /// Evaluate this hunter against one visited node.
    ///
    /// `Ok(None)` means the predicate rejected the node. Any failing
    /// callable turns into a [`HunterFailure`] and no match is produced.
    pub fn hunt(&self, visit: &Visit<N>) -> Result<Option<Match<N>>, HunterFailure> {
        let accepted = (self.predicate)(&visit.node)
            .map_err(|err| self.failure(HuntStage::Predicate, visit, err))?;
        if !accepted {
            return Ok(None);
        }

        let score = match &self.scorer {
            Some(scorer) => {
                let score =
                    scorer(&visit.node).map_err(|err| self.failure(HuntStage::Scorer, visit, err))?;
                if !score.is_finite() {
                    return Err(self.failure(
                        HuntStage::Scorer,
                        visit,
                        RuleError::new(format!("non-finite score {score}")),
                    ));
                }
                score
            }
            None => 0.0,
        };

        let mut ctx = MatchContext::new(
            Arc::clone(&self.name),
            visit.node.clone(),
            visit.path.clone(),
            visit.depth,
            score,
        );
        if let Some(callback) = &self.on_match {
            callback(&mut ctx).map_err(|err| self.failure(HuntStage::OnMatch, visit, err))?;
        }
        Ok(Some(ctx.into_match()))
    }

    fn failure(&self, stage: HuntStage, visit: &Visit<N>, err: RuleError) -> HunterFailure {
        HunterFailure {
            hunter: self.name.to_string(),
            stage,
            node: format!("{:?}", visit.node.key()),
            depth: visit.depth,
            message: err.0,
        }
    }
}

impl<N> fmt::Debug for Hunter<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hunter")
            .field("name", &self.name)
            .field("scorer", &self.scorer.is_some())
            .field("on_match", &self.on_match.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq)]
    struct Word(&'static str);

    impl Node for Word {
        type Key = &'static str;

        fn key(&self) -> &'static str {
            self.0
        }

        fn name(&self) -> &str {
            self.0
        }
    }

    fn visit(word: &'static str) -> Visit<Word> {
        Visit {
            node: Word(word),
            path: vec![Word("root"), Word(word)],
            depth: 1,
        }
    }

    #[test]
    fn rejected_node_yields_nothing() {
        let hunter = Hunter::new("long", |w: &Word| w.0.len() > 10);
        assert_eq!(hunter.hunt(&visit("short")).unwrap(), None);
    }

    #[test]
    fn missing_scorer_scores_zero() {
        let hunter = Hunter::new("any", |_: &Word| true);
        let m = hunter.hunt(&visit("graph")).unwrap().unwrap();
        assert_eq!(m.score(), 0.0);
        assert_eq!(m.hunter(), "any");
        assert_eq!(m.depth(), 1);
        assert!(m.metadata().is_empty());
    }

    #[test]
    fn scorer_runs_before_enrichment() {
        let hunter = Hunter::new("len", |_: &Word| true)
            .with_scorer(|w: &Word| w.0.len() as f64)
            .on_match(|ctx| {
                let seen = ctx.score();
                ctx.enrich("seen_score", seen);
            });
        let m = hunter.hunt(&visit("theory")).unwrap().unwrap();
        assert_eq!(m.score(), 6.0);
        assert_eq!(m.get("seen_score"), Some(&json!(6.0)));
    }

    #[test]
    fn failures_name_the_stage() {
        let predicate = Hunter::try_new("p", |_: &Word| Err(RuleError::from("no index")));
        let err = predicate.hunt(&visit("x")).unwrap_err();
        assert_eq!(err.stage, HuntStage::Predicate);
        assert_eq!(err.node, "\"x\"");
        assert_eq!(err.message, "no index");

        let scorer = Hunter::new("s", |_: &Word| true).with_scorer(|_: &Word| f64::NAN);
        assert_eq!(
            scorer.hunt(&visit("x")).unwrap_err().stage,
            HuntStage::Scorer
        );

        let enrich = Hunter::new("e", |_: &Word| true)
            .try_on_match(|_ctx: &mut MatchContext<Word>| Err("bad metadata".into()));
        assert_eq!(
            enrich.hunt(&visit("x")).unwrap_err().stage,
            HuntStage::OnMatch
        );
    }

    #[test]
    fn criteria_hunter_uses_attributes() {
        #[derive(Clone)]
        struct Tagged(&'static str);

        impl Node for Tagged {
            type Key = &'static str;

            fn key(&self) -> &'static str {
                self.0
            }

            fn name(&self) -> &str {
                self.0
            }

            fn attribute(&self, name: &str) -> Option<serde_json::Value> {
                (name == "id").then(|| json!(self.0))
            }
        }

        let hunter = Hunter::from_criteria("by-id", Criteria::new().with_id("b"));
        let hit = Visit {
            node: Tagged("b"),
            path: vec![Tagged("b")],
            depth: 0,
        };
        let miss = Visit {
            node: Tagged("a"),
            path: vec![Tagged("a")],
            depth: 0,
        };
        assert!(hunter.hunt(&hit).unwrap().is_some());
        assert!(hunter.hunt(&miss).unwrap().is_none());

        let narrowed =
            Hunter::from_criteria_and("by-id-short", Criteria::new().with_id("b"), |t: &Tagged| {
                t.0.len() > 1
            });
        assert!(narrowed.hunt(&hit).unwrap().is_none());
    }
}
