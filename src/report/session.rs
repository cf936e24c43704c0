use std::path::Path;

use snafu::{ResultExt, Snafu};
use tracing::{debug, info};

use crate::report::ProblematicTestLitterError;
use crate::snapshots::{
    LitterConfig, SnapshotComparator, SnapshotComparison, TreeSnapshot, TreeSnapshotFactory,
    UnexpectedLitterError,
};

/// State carried across a run: the factory and comparator built from one config, plus
/// the most recent snapshot of the root.
#[derive(Debug)]
pub struct LitterSession {
    factory: TreeSnapshotFactory,
    comparator: SnapshotComparator,
    snapshot: TreeSnapshot,
}

impl LitterSession {
    /// Takes the initial snapshot of `root`.
    pub fn start(config: LitterConfig, root: &Path) -> Result<Self, UnexpectedLitterError> {
        let (factory, comparator) = config.into_parts();
        let snapshot = factory.create_snapshot(root)?;
        info!("Initial snapshot holds {} paths", snapshot.len());

        Ok(Self {
            factory,
            comparator,
            snapshot,
        })
    }

    pub fn snapshot(&self) -> &TreeSnapshot {
        &self.snapshot
    }

    /// Re-snapshots the root, compares it against the previous snapshot and calls
    /// `mismatch_cb` when they differ.
    ///
    /// The new snapshot replaces the stored one before comparing, so litter left by one
    /// test is only ever reported for that test.
    pub fn run_snapshot_comparison<F>(
        &mut self,
        test_name: &str,
        mismatch_cb: F,
    ) -> Result<(), LitterCheckError>
    where
        F: FnOnce(&str, &SnapshotComparison) -> Result<(), ProblematicTestLitterError>,
    {
        let new_snapshot = self
            .factory
            .create_snapshot(self.snapshot.root())
            .context(UnexpectedSnafu)?;
        let original_snapshot = std::mem::replace(&mut self.snapshot, new_snapshot);

        let comparison = self
            .comparator
            .compare(&original_snapshot, &self.snapshot)
            .context(UnexpectedSnafu)?;

        if comparison.matches() {
            debug!("No litter from test '{}'", test_name);
            return Ok(());
        }
        mismatch_cb(test_name, &comparison).context(LitterSnafu)
    }
}

#[derive(Debug, Snafu)]
pub enum LitterCheckError {
    #[snafu(display("Snapshot comparison could not be performed"))]
    UnexpectedError { source: UnexpectedLitterError },
    #[snafu(display("Test left litter behind"))]
    LitterError { source: ProblematicTestLitterError },
}
