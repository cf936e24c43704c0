mod report;
mod session;

pub use report::{
    ProblematicTestLitterError, format_test_snapshot_mismatch_message,
    raise_test_error_from_comparison,
};
pub use session::{LitterCheckError, LitterSession};
