use std::path::PathBuf;

use snafu::Snafu;

use crate::ext::BestEffortPathExt;

/// Misuse of the snapshot API. Never a detected litter condition.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum UnexpectedLitterError {
    #[snafu(display("'{}' is not a directory", root.best_effort_path_display()))]
    NotADirectory { root: PathBuf },
    #[snafu(display("Failed to list the snapshot root '{}'", root.best_effort_path_display()))]
    ReadRoot {
        root: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display(
        "Comparing a snapshot of {} vs one of {}",
        root_a.best_effort_path_display(),
        root_b.best_effort_path_display()
    ))]
    RootMismatch { root_a: PathBuf, root_b: PathBuf },
}
