use colored::Colorize;

use crate::tests_runner::TestOutcome;

pub fn summary_line(outcome: &TestOutcome) -> String {
    match (&outcome.litter, outcome.exit_ok) {
        (Some(litter), true) => format!("{} {}", "LITTER".red().bold(), litter),
        (Some(litter), false) => format!(
            "{} {} {}",
            "FAILED".red().bold(),
            "LITTER".red().bold(),
            litter
        ),
        (None, false) => format!("{} {}", "FAILED".red().bold(), outcome.name),
        (None, true) => format!("{} {}", "PASSED".green().bold(), outcome.name),
    }
}

pub fn print_summary(outcomes: &[TestOutcome]) {
    println!();
    for outcome in outcomes {
        println!("{}", summary_line(outcome));
    }

    let failed = outcomes.iter().filter(|outcome| !outcome.passed()).count();
    let totals = format!("{} passed, {} failed", outcomes.len() - failed, failed);
    if failed == 0 {
        println!("{}", totals.green());
    } else {
        println!("{}", totals.red());
    }
}
