use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::value::ContainerId;

/// Which previously visited containers count as circular.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CyclePolicy {
    /// Every container visited earlier in the pass, including fully processed
    /// siblings. A shared but acyclic container renders as circular on its
    /// second occurrence.
    #[default]
    Pass,
    /// Only containers on the current path from the root.
    Ancestors,
}

/// Per-pass registry of visited container identities.
#[derive(Debug, Clone)]
pub struct CycleTracker {
    policy: CyclePolicy,
    visited: HashSet<ContainerId>,
}

impl CycleTracker {
    /// Creates an empty tracker.
    pub fn new(policy: CyclePolicy) -> Self {
        Self {
            policy,
            visited: HashSet::new(),
        }
    }

    /// Policy this tracker applies on [`CycleTracker::leave`].
    pub fn policy(&self) -> CyclePolicy {
        self.policy
    }

    /// Whether `id` has already been marked.
    pub fn seen(&self, id: ContainerId) -> bool {
        self.visited.contains(&id)
    }

    /// Marks `id` as visited; called before descending into the container.
    pub fn mark(&mut self, id: ContainerId) {
        self.visited.insert(id);
    }

    /// Called once the container's subtree is finished.
    pub fn leave(&mut self, id: ContainerId) {
        if self.policy == CyclePolicy::Ancestors {
            self.visited.remove(&id);
        }
    }

    /// Number of identities currently marked.
    pub fn len(&self) -> usize {
        self.visited.len()
    }

    /// Whether nothing is marked.
    pub fn is_empty(&self) -> bool {
        self.visited.is_empty()
    }
}
