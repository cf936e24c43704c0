mod config;

pub use config::{LitterFile, LitterFileError, get_config_file_path};
