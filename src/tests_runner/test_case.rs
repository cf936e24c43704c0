use std::{borrow::Cow, path::Path, pin::pin, process::Stdio};

use colored::{Color, Colorize};
use compio::{io::compat::AsyncStream, process::Command};
use futures::{AsyncBufReadExt, Stream, StreamExt, io::BufReader};
use hashlink::LinkedHashMap;
use saphyr::{Scalar, Yaml};
use snafu::{ResultExt, Snafu};
use tracing::{debug, info, warn};

/// A named shell command whose filesystem side effects are checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCase {
    name: String,
    command: String,
}

impl TestCase {
    pub fn new(name: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            command: command.into(),
        }
    }

    pub fn from_test_yaml(test_name: &str, test_data: &LinkedHashMap<Yaml, Yaml>) -> Option<Self> {
        debug!("Parsing test '{}'", test_name);

        let Some(command) = test_data
            .get(&Yaml::Value(Scalar::String(Cow::Borrowed("command"))))
            .and_then(|command| command.as_str())
        else {
            warn!("Test '{}' has no command. Skipping.", test_name);
            return None;
        };

        Some(Self::new(test_name, command))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    /// Runs the command from `working_dir`, echoing its output prefixed with the test
    /// name. Returns whether the command exited successfully.
    pub async fn run(&self, working_dir: &Path, color: Color) -> Result<bool, TestCaseError> {
        let mut cmd = self.create_command(working_dir);

        let mut handle = cmd.spawn().context(SpawnSnafu {
            command: self.command.clone(),
            test_name: self.name.clone(),
        })?;

        let stdout = handle.stdout.take();
        let stderr = handle.stderr.take();
        let forward_stdout = async {
            if let Some(stdout) = stdout {
                let lines = BufReader::new(AsyncStream::new(stdout)).lines();
                forward_lines(lines, &self.name, color).await;
            }
        };
        let forward_stderr = async {
            if let Some(stderr) = stderr {
                let lines = BufReader::new(AsyncStream::new(stderr)).lines();
                forward_lines(lines, &self.name, color).await;
            }
        };
        futures::join!(forward_stdout, forward_stderr);

        let status = handle.wait().await.context(WaitSnafu {
            command: self.command.clone(),
            test_name: self.name.clone(),
        })?;

        if status.success() {
            info!("Test '{}' completed successfully", self.name);
        } else {
            warn!(
                "Command '{}' for test '{}' failed with exit code {}",
                self.command,
                self.name,
                status.code().unwrap_or(-1)
            );
        }
        Ok(status.success())
    }

    /// Returns the shell and its arguments used to run the command.
    fn full_command(&self) -> (&'static str, Vec<&str>) {
        #[cfg(target_family = "windows")]
        {
            let args = vec!["/C", self.command.as_str()];
            ("cmd", args)
        }
        #[cfg(target_family = "unix")]
        {
            let args = vec!["-c", self.command.as_str()];
            ("sh", args)
        }
    }

    fn create_command(&self, working_dir: &Path) -> Command {
        let (command, args) = self.full_command();
        let mut cmd = Command::new(command);
        cmd.args(args);
        cmd.current_dir(working_dir);
        let _ = cmd.stdout(Stdio::piped());
        let _ = cmd.stderr(Stdio::piped());
        cmd
    }
}

async fn forward_lines(lines: impl Stream<Item = std::io::Result<String>>, test_name: &str, color: Color) {
    let mut lines = pin!(lines);
    while let Some(line_result) = lines.next().await {
        match line_result {
            Ok(line) => {
                if !line.trim().is_empty() {
                    print_from_test(test_name, color, line.trim_end());
                }
            }
            Err(e) => {
                debug!("Error reading output of test '{}': {}", test_name, e);
            }
        }
    }
}

fn print_from_test(test_name: &str, color: Color, line: &str) {
    println!("{} {}", format!("[{test_name}]").color(color).bold(), line);
}

#[derive(Debug, Snafu)]
pub enum TestCaseError {
    #[snafu(display("Failed to spawn command '{}' for test '{}'", command, test_name))]
    SpawnError {
        command: String,
        test_name: String,
        source: std::io::Error,
    },
    #[snafu(display("Failed to wait for command '{}' for test '{}'", command, test_name))]
    WaitError {
        command: String,
        test_name: String,
        source: std::io::Error,
    },
}
