use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use snafu::ResultExt;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::ext::BestEffortPathExt;
use crate::snapshots::error::{NotADirectorySnafu, ReadRootSnafu};
use crate::snapshots::{LitterConfig, PathSnapshot, UnexpectedLitterError};

/// All non-ignored paths below a root directory at one point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeSnapshot {
    root: PathBuf,
    paths: HashSet<PathSnapshot>,
}

impl TreeSnapshot {
    /// Fails when `root` is not an existing directory.
    pub fn new(
        root: impl Into<PathBuf>,
        paths: impl IntoIterator<Item = impl Into<PathSnapshot>>,
    ) -> Result<Self, UnexpectedLitterError> {
        let root = root.into();
        if !root.is_dir() {
            return NotADirectorySnafu { root }.fail();
        }

        Ok(Self {
            root,
            paths: paths.into_iter().map(Into::into).collect(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn paths(&self) -> &HashSet<PathSnapshot> {
        &self.paths
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn contains(&self, path: impl Into<PathBuf>) -> bool {
        self.paths.contains(&PathSnapshot::new(path))
    }
}

/// Captures [`TreeSnapshot`]s by walking a directory tree.
#[derive(Debug, Clone)]
pub struct TreeSnapshotFactory {
    config: Arc<LitterConfig>,
}

impl TreeSnapshotFactory {
    pub fn new(config: Arc<LitterConfig>) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Arc<LitterConfig> {
        &self.config
    }

    /// Walks `root` depth first and records every path not excluded by the ignore rules.
    ///
    /// Ignored directories are not descended into. Symlinks to directories are
    /// followed, except when they point back at one of their ancestors; such links and
    /// dangling links are recorded without their contents. A subdirectory that cannot
    /// be listed contributes no children; the root itself must be listable.
    pub fn create_snapshot(&self, root: &Path) -> Result<TreeSnapshot, UnexpectedLitterError> {
        if !root.is_dir() {
            return NotADirectorySnafu { root }.fail();
        }
        debug!("Creating snapshot of {}", root.best_effort_path_display());

        let mut paths = HashSet::new();
        let walker = WalkDir::new(root)
            .min_depth(1)
            .follow_links(true)
            .into_iter()
            .filter_entry(|entry| {
                entry.depth() == 0
                    || (entry.file_name() != "." && !self.config.is_ignored(entry.path()))
            });

        for entry in walker {
            match entry {
                Ok(entry) => {
                    paths.insert(PathSnapshot::new(entry.into_path()));
                }
                Err(error) if error.depth() == 0 => {
                    return Err(std::io::Error::from(error)).context(ReadRootSnafu { root });
                }
                Err(error) => self.record_unwalkable(&error, &mut paths),
            }
        }

        debug!("Captured {} paths", paths.len());
        TreeSnapshot::new(root, paths)
    }

    /// Keeps symlinks the walk could not resolve (loops, dangling targets) as plain paths.
    fn record_unwalkable(&self, error: &walkdir::Error, paths: &mut HashSet<PathSnapshot>) {
        let Some(path) = error.path() else {
            warn!("Skipping unreadable entry: {}", error);
            return;
        };
        if self.config.is_ignored(path) {
            return;
        }

        if let Some(ancestor) = error.loop_ancestor() {
            debug!(
                "Not following {} back to {}",
                path.best_effort_path_display(),
                ancestor.best_effort_path_display()
            );
        } else {
            warn!("Skipping {}: {}", path.best_effort_path_display(), error);
        }
        if path.is_symlink() {
            paths.insert(PathSnapshot::new(path));
        }
    }
}
