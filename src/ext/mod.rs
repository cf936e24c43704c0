mod best_effort_path_ext;

pub use best_effort_path_ext::{BestEffortPathExt, best_effort_path_display, normalize_path};
