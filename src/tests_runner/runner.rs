use std::path::PathBuf;

use colored::Color;
use snafu::prelude::*;
use tracing::{debug, info};

use crate::report::{
    LitterCheckError, LitterSession, ProblematicTestLitterError, raise_test_error_from_comparison,
};
use crate::tests_runner::{TestCase, TestCaseError};

/// Colors cycled through for the output prefix of consecutive tests
const PREFIX_COLORS: [Color; 6] = [
    Color::Cyan,
    Color::Magenta,
    Color::Blue,
    Color::Yellow,
    Color::Green,
    Color::BrightCyan,
];

/// Result of running one test and checking it for litter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestOutcome {
    pub name: String,
    pub exit_ok: bool,
    pub litter: Option<ProblematicTestLitterError>,
}

impl TestOutcome {
    pub fn passed(&self) -> bool {
        self.exit_ok && self.litter.is_none()
    }
}

/// Picks the tests named in `selection`, in the order given, or every test when the
/// selection is empty.
pub fn select_tests(tests: &[TestCase], selection: &[String]) -> Result<Vec<TestCase>, RunnerError> {
    if selection.is_empty() {
        return Ok(tests.to_vec());
    }

    selection
        .iter()
        .map(|name| {
            tests
                .iter()
                .find(|test| test.name() == name)
                .cloned()
                .context(UnknownTestSnafu { test_name: name })
        })
        .collect()
}

/// Runs tests one after another, snapshotting the root after each of them.
pub struct TestRunner {
    root: PathBuf,
    session: LitterSession,
    tests: Vec<TestCase>,
}

impl TestRunner {
    pub fn new(session: LitterSession, tests: Vec<TestCase>) -> Self {
        let root = session.snapshot().root().to_path_buf();
        Self {
            root,
            session,
            tests,
        }
    }

    pub async fn run(mut self) -> Result<Vec<TestOutcome>, RunnerError> {
        debug!("Running {} tests from {}", self.tests.len(), self.root.display());
        let mut outcomes = Vec::with_capacity(self.tests.len());

        for (index, test) in self.tests.iter().enumerate() {
            info!("Running test '{}'", test.name());
            let color = PREFIX_COLORS[index % PREFIX_COLORS.len()];
            let exit_ok = test.run(&self.root, color).await.context(TestCaseSnafu)?;

            let litter = match self
                .session
                .run_snapshot_comparison(test.name(), raise_test_error_from_comparison)
            {
                Ok(()) => None,
                Err(LitterCheckError::LitterError { source }) => Some(source),
                Err(error) => return Err(error).context(LitterCheckSnafu),
            };

            outcomes.push(TestOutcome {
                name: test.name().to_string(),
                exit_ok,
                litter,
            });
        }

        Ok(outcomes)
    }
}

#[derive(Debug, Snafu)]
pub enum RunnerError {
    #[snafu(display("Unknown test '{}'", test_name))]
    UnknownTestError { test_name: String },
    #[snafu(display("Failed to run test"))]
    TestCaseError { source: TestCaseError },
    #[snafu(display("Failed to check for litter"))]
    LitterCheckError { source: LitterCheckError },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshots::{IgnoreSpec, LitterConfig};
    use rstest::*;
    use tempfile::TempDir;

    fn tests() -> Vec<TestCase> {
        vec![
            TestCase::new("first", "true"),
            TestCase::new("second", "true"),
            TestCase::new("third", "true"),
        ]
    }

    #[rstest]
    #[case(vec![], vec!["first", "second", "third"])]
    #[case(vec!["third", "first"], vec!["third", "first"])]
    fn select_tests_by_name(#[case] selection: Vec<&str>, #[case] expected: Vec<&str>) {
        let selection: Vec<String> = selection.into_iter().map(String::from).collect();
        let selected = select_tests(&tests(), &selection).expect("known tests");

        let names: Vec<&str> = selected.iter().map(TestCase::name).collect();
        assert_eq!(names, expected);
    }

    #[test]
    fn select_unknown_test_fails() {
        let result = select_tests(&tests(), &["missing".to_string()]);
        match result {
            Err(RunnerError::UnknownTestError { test_name }) => assert_eq!(test_name, "missing"),
            other => panic!("Expected UnknownTestError, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[compio::test]
    async fn run_reports_litter_per_test() {
        let root = TempDir::new().expect("Failed to create temp directory");
        std::fs::write(root.path().join("existing"), b"").unwrap();
        let config = LitterConfig::new([IgnoreSpec::name("scratch")]);
        let session = LitterSession::start(config, root.path()).expect("valid root");

        let outcomes = TestRunner::new(
            session,
            vec![
                TestCase::new("clean", "true"),
                TestCase::new("littering", "touch new_file"),
                TestCase::new("scratch_user", "mkdir -p scratch/inner"),
                TestCase::new("deleting", "rm existing"),
                TestCase::new("broken", "exit 1"),
            ],
        )
        .run()
        .await
        .expect("all tests ran");

        let passed: Vec<(&str, bool)> = outcomes
            .iter()
            .map(|outcome| (outcome.name.as_str(), outcome.passed()))
            .collect();
        assert_eq!(
            passed,
            [
                ("clean", true),
                ("littering", false),
                ("scratch_user", true),
                ("deleting", false),
                ("broken", false),
            ]
        );

        let littering = outcomes[1].litter.as_ref().expect("litter found");
        assert_eq!(
            littering.message(),
            format!(
                "The test 'littering' added '{}'",
                root.path().join("new_file").display()
            )
        );
        let deleting = outcomes[3].litter.as_ref().expect("litter found");
        assert_eq!(
            deleting.message(),
            format!(
                "The test 'deleting' deleted '{}'",
                root.path().join("existing").display()
            )
        );
        assert!(outcomes[4].litter.is_none());
        assert!(!outcomes[4].exit_ok);
    }
}
