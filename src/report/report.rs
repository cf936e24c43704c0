use std::path::Path;

use snafu::Snafu;

use crate::snapshots::SnapshotComparison;

/// Raised when a test leaves the file tree different from how it found it.
#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
#[snafu(display("{}", message))]
pub struct ProblematicTestLitterError {
    test_name: String,
    message: String,
}

impl ProblematicTestLitterError {
    pub fn test_name(&self) -> &str {
        &self.test_name
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// `The test '<name>' added '<p1>', '<p2>' and deleted '<p3>'`, leaving out the side
/// that has no paths.
pub fn format_test_snapshot_mismatch_message<A, D>(
    test_name: &str,
    paths_added: &[A],
    paths_deleted: &[D],
) -> String
where
    A: AsRef<Path>,
    D: AsRef<Path>,
{
    let mut message = format!("The test '{test_name}'");
    if !paths_added.is_empty() {
        message.push_str(" added ");
        message.push_str(&to_human_readable(paths_added));
        if !paths_deleted.is_empty() {
            message.push_str(" and");
        }
    }
    if !paths_deleted.is_empty() {
        message.push_str(" deleted ");
        message.push_str(&to_human_readable(paths_deleted));
    }
    message
}

fn to_human_readable<P: AsRef<Path>>(paths: &[P]) -> String {
    paths
        .iter()
        .map(|path| format!("'{}'", path.as_ref().display()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Mismatch callback turning a comparison into a [`ProblematicTestLitterError`].
pub fn raise_test_error_from_comparison(
    test_name: &str,
    comparison: &SnapshotComparison,
) -> Result<(), ProblematicTestLitterError> {
    Err(ProblematicTestLitterError {
        test_name: test_name.to_string(),
        message: format_test_snapshot_mismatch_message(
            test_name,
            &comparison.added(),
            &comparison.deleted(),
        ),
    })
}
