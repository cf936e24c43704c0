//! Capturing and comparing snapshots of directory trees.
//!
//! A [`TreeSnapshotFactory`] records every path below a root that is not excluded by
//! the [`IgnoreSpec`]s of a [`LitterConfig`]. A [`SnapshotComparator`] built from the
//! same config reports which paths appeared or disappeared between two snapshots.

mod comparator;
mod error;
mod ignore_spec;
mod litter_config;
mod path_snapshot;
mod tree_snapshot;

pub use comparator::{SnapshotComparator, SnapshotComparison};
pub use error::UnexpectedLitterError;
pub use ignore_spec::{IgnorePattern, IgnoreSpec};
pub use litter_config::{DEFAULT_IGNORED_NAMES, LitterConfig};
pub use path_snapshot::PathSnapshot;
pub use tree_snapshot::{TreeSnapshot, TreeSnapshotFactory};
