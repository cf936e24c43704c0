use std::path::PathBuf;

use snafu::Snafu;
use snafu::prelude::*;
use tracing::debug;

use crate::application::{RuntimeConfig, print_summary};
use crate::config::{LitterFile, LitterFileError};
use crate::report::LitterSession;
use crate::snapshots::{LitterConfig, UnexpectedLitterError};
use crate::tests_runner::{RunnerError, TestOutcome, TestRunner, select_tests};

pub struct Application;

impl Application {
    /// Runs the selected tests, prints a summary and fails if any test failed or
    /// left litter behind.
    pub async fn run(app_config: impl Into<RuntimeConfig>) -> Result<(), ApplicationError> {
        let app_config: RuntimeConfig = app_config.into();
        let outcomes = Self::run_tests(&app_config).await?;
        print_summary(&outcomes);

        let failed = outcomes.iter().filter(|outcome| !outcome.passed()).count();
        ensure!(
            failed == 0,
            TestsFailedSnafu {
                failed,
                total: outcomes.len()
            }
        );
        Ok(())
    }

    pub async fn run_tests(app_config: &RuntimeConfig) -> Result<Vec<TestOutcome>, ApplicationError> {
        let root = app_config.root.canonicalize().context(RootSnafu {
            root: app_config.root.clone(),
        })?;
        let litter_file = LitterFile::read(&root).await.context(LitterFileSnafu)?;
        debug!("Loaded config: {:?}", litter_file);

        let basetemp = app_config.basetemp.as_deref().or(litter_file.basetemp());
        let config = LitterConfig::with_defaults(&root, basetemp, litter_file.ignore_specs(&root));
        let tests = select_tests(litter_file.tests(), &app_config.tests).context(RunnerSnafu)?;

        let session = LitterSession::start(config, &root).context(SnapshotSnafu)?;
        TestRunner::new(session, tests)
            .run()
            .await
            .context(RunnerSnafu)
    }
}

#[derive(Debug, Snafu)]
pub enum ApplicationError {
    #[snafu(display("Cannot use '{}' as the root directory", root.display()))]
    RootError {
        root: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("Critical failure encountered during configuration stage"))]
    LitterFileError { source: LitterFileError },
    #[snafu(display("Critical failure encountered while taking the initial snapshot"))]
    SnapshotError { source: UnexpectedLitterError },
    #[snafu(display("Critical failure encountered while running tests"))]
    RunnerError { source: RunnerError },
    #[snafu(display("{} of {} tests failed", failed, total))]
    TestsFailed { failed: usize, total: usize },
}
