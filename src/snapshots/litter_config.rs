use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::snapshots::{IgnoreSpec, SnapshotComparator, TreeSnapshotFactory};

/// Tool and build directories that never count as litter.
pub const DEFAULT_IGNORED_NAMES: [&str; 4] = ["__pycache__", "venv", ".venv", ".pytest_cache"];

/// The set of ignore rules shared by snapshot capture and comparison.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LitterConfig {
    ignore_specs: HashSet<IgnoreSpec>,
}

impl LitterConfig {
    pub fn new(ignore_specs: impl IntoIterator<Item = IgnoreSpec>) -> Self {
        Self {
            ignore_specs: ignore_specs.into_iter().collect(),
        }
    }

    /// Builds the configuration used by the runner: the basetemp directory (resolved
    /// against `root`), the default ignored names, then any `extra` rules.
    pub fn with_defaults(
        root: &Path,
        basetemp: Option<&Path>,
        extra: impl IntoIterator<Item = IgnoreSpec>,
    ) -> Self {
        let basetemp_spec = basetemp.map(|basetemp| IgnoreSpec::directory(root.join(basetemp)));
        let default_specs = DEFAULT_IGNORED_NAMES.into_iter().map(IgnoreSpec::name);

        let config = Self::new(basetemp_spec.into_iter().chain(default_specs).chain(extra));
        debug!("Using {} ignore rules", config.ignore_specs.len());
        config
    }

    pub fn ignore_specs(&self) -> &HashSet<IgnoreSpec> {
        &self.ignore_specs
    }

    pub fn is_ignored(&self, path: &Path) -> bool {
        self.ignore_specs.iter().any(|spec| spec.matches(path))
    }

    /// Splits the configuration into a factory and a comparator sharing the same rules.
    pub fn into_parts(self) -> (TreeSnapshotFactory, SnapshotComparator) {
        let shared = Arc::new(self);
        (
            TreeSnapshotFactory::new(shared.clone()),
            SnapshotComparator::new(shared),
        )
    }
}
