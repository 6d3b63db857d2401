use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::forest::Handle;

/// Which end of the child list loses entries on overflow.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PruneFrom {
    /// Drop the newest children.
    #[default]
    Forward,
    /// Drop the oldest children.
    Backward,
}

/// What happens to pruned children.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PruneType {
    /// Detach and keep them in the container's `retained` list.
    #[default]
    Discard,
    /// Detach and forget them.
    Destroy,
}

/// How the owner of the container learns about pruning.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum NotifyMode {
    /// `attach` returns `ObjectError::RetentionOverflow`.
    Raise,
    /// The policy callback receives the pruned handles.
    Call,
    #[default]
    Suppress,
}

pub type RetentionCallback = Arc<dyn Fn(&[Handle]) + Send + Sync>;

/// Bound on the number of children a container keeps.
#[derive(Clone)]
pub struct RetentionPolicy {
    pub max_size: usize,
    pub prune_from: PruneFrom,
    pub prune_type: PruneType,
    pub notify: NotifyMode,
    callback: Option<RetentionCallback>,
}

impl RetentionPolicy {
    pub fn new(max_size: usize) -> Self {
        Self {
            max_size,
            prune_from: PruneFrom::default(),
            prune_type: PruneType::default(),
            notify: NotifyMode::default(),
            callback: None,
        }
    }

    #[must_use]
    pub fn prune_from(mut self, from: PruneFrom) -> Self {
        self.prune_from = from;
        self
    }

    #[must_use]
    pub fn prune_type(mut self, kind: PruneType) -> Self {
        self.prune_type = kind;
        self
    }

    #[must_use]
    pub fn notify(mut self, mode: NotifyMode) -> Self {
        self.notify = mode;
        self
    }

    /// Set the callback and switch to [`NotifyMode::Call`].
    #[must_use]
    pub fn on_prune<F>(mut self, f: F) -> Self
    where
        F: Fn(&[Handle]) + Send + Sync + 'static,
    {
        self.callback = Some(Arc::new(f));
        self.notify = NotifyMode::Call;
        self
    }

    pub(crate) fn callback(&self) -> Option<&RetentionCallback> {
        self.callback.as_ref()
    }

    /// Indices of `len` children to prune, in child-list order.
    pub(crate) fn victims(&self, len: usize) -> std::ops::Range<usize> {
        let overflow = len.saturating_sub(self.max_size);
        match self.prune_from {
            PruneFrom::Forward => len - overflow..len,
            PruneFrom::Backward => 0..overflow,
        }
    }
}

impl fmt::Debug for RetentionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetentionPolicy")
            .field("max_size", &self.max_size)
            .field("prune_from", &self.prune_from)
            .field("prune_type", &self.prune_type)
            .field("notify", &self.notify)
            .field("callback", &self.callback.is_some())
            .finish()
    }
}

/// Retention for a newly created container.
#[derive(Debug, Clone, Default)]
pub enum Retention {
    #[default]
    Unbounded,
    /// Copy the parent's policy, if it has one.
    Inherit,
    Policy(RetentionPolicy),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_prunes_newest() {
        let policy = RetentionPolicy::new(2);
        assert_eq!(policy.victims(4), 2..4);
        assert_eq!(policy.victims(2), 2..2);
    }

    #[test]
    fn backward_prunes_oldest() {
        let policy = RetentionPolicy::new(2).prune_from(PruneFrom::Backward);
        assert_eq!(policy.victims(3), 0..1);
        assert!(policy.victims(1).is_empty());
    }

    #[test]
    fn callback_switches_notify_mode() {
        let policy = RetentionPolicy::new(1).on_prune(|_| {});
        assert_eq!(policy.notify, NotifyMode::Call);
        assert!(policy.callback().is_some());
        assert!(format!("{policy:?}").contains("callback: true"));
    }
}
