use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::snapshots::error::RootMismatchSnafu;
use crate::snapshots::{LitterConfig, PathSnapshot, TreeSnapshot, UnexpectedLitterError};

/// Paths present in only one of two compared snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnapshotComparison {
    only_a: HashSet<PathSnapshot>,
    only_b: HashSet<PathSnapshot>,
}

impl SnapshotComparison {
    pub fn new(
        only_a: impl IntoIterator<Item = PathSnapshot>,
        only_b: impl IntoIterator<Item = PathSnapshot>,
    ) -> Self {
        Self {
            only_a: only_a.into_iter().collect(),
            only_b: only_b.into_iter().collect(),
        }
    }

    /// Paths found only in snapshot A, i.e. deleted between A and B.
    pub fn only_a(&self) -> &HashSet<PathSnapshot> {
        &self.only_a
    }

    /// Paths found only in snapshot B, i.e. added between A and B.
    pub fn only_b(&self) -> &HashSet<PathSnapshot> {
        &self.only_b
    }

    /// Whether snapshots A and B match each other.
    pub fn matches(&self) -> bool {
        self.only_a.is_empty() && self.only_b.is_empty()
    }

    /// Added paths, sorted.
    pub fn added(&self) -> Vec<&Path> {
        sorted_paths(&self.only_b)
    }

    /// Deleted paths, sorted.
    pub fn deleted(&self) -> Vec<&Path> {
        sorted_paths(&self.only_a)
    }
}

fn sorted_paths(paths: &HashSet<PathSnapshot>) -> Vec<&Path> {
    let mut sorted: Vec<&PathSnapshot> = paths.iter().collect();
    sorted.sort();
    sorted.into_iter().map(PathSnapshot::path).collect()
}

/// Computes the difference between two snapshots of the same tree.
///
/// Ignore rules are applied again here, so paths captured under an older or looser
/// rule set never show up in a comparison.
#[derive(Debug, Clone)]
pub struct SnapshotComparator {
    config: Arc<LitterConfig>,
}

impl SnapshotComparator {
    pub fn new(config: Arc<LitterConfig>) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Arc<LitterConfig> {
        &self.config
    }

    pub fn compare(
        &self,
        snapshot_a: &TreeSnapshot,
        snapshot_b: &TreeSnapshot,
    ) -> Result<SnapshotComparison, UnexpectedLitterError> {
        if snapshot_a.root() != snapshot_b.root() {
            return RootMismatchSnafu {
                root_a: snapshot_a.root(),
                root_b: snapshot_b.root(),
            }
            .fail();
        }

        let only_a = self.difference(snapshot_a.paths(), snapshot_b.paths());
        let only_b = self.difference(snapshot_b.paths(), snapshot_a.paths());
        debug!(
            "Compared snapshots of {}: {} deleted, {} added",
            snapshot_a.root().display(),
            only_a.len(),
            only_b.len()
        );

        Ok(SnapshotComparison::new(only_a, only_b))
    }

    fn difference(
        &self,
        left: &HashSet<PathSnapshot>,
        right: &HashSet<PathSnapshot>,
    ) -> Vec<PathSnapshot> {
        left.difference(right)
            .filter(|path| !self.config.is_ignored(path.path()))
            .cloned()
            .collect()
    }
}
