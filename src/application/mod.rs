mod application;
mod runtime_config;
mod summary;

pub use application::{Application, ApplicationError};
pub use runtime_config::RuntimeConfig;
pub use summary::{print_summary, summary_line};
