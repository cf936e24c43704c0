mod runner;
mod test_case;

pub use runner::{RunnerError, TestOutcome, TestRunner, select_tests};
pub use test_case::{TestCase, TestCaseError};
