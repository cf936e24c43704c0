use std::{
    borrow::Cow,
    path::{Path, PathBuf},
};

use compio::fs;
use hashlink::LinkedHashMap;
use saphyr::{LoadableYamlNode, Scalar, Yaml};
use snafu::prelude::*;
use tracing::debug;

use crate::{
    ext::BestEffortPathExt,
    snapshots::IgnoreSpec,
    tests_runner::TestCase,
};

const CONFIG_FILE_NAME: &str = "litter.yaml";

pub fn get_config_file_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE_NAME)
}

fn yaml_key(name: &str) -> Yaml<'_> {
    Yaml::Value(Scalar::String(Cow::Borrowed(name)))
}

/// Contents of `litter.yaml`: extra ignore rules, the basetemp directory and the tests
/// to run, in file order.
#[derive(Debug, Clone, Default)]
pub struct LitterFile {
    basetemp: Option<PathBuf>,
    ignored_directories: Vec<PathBuf>,
    ignored_names: Vec<String>,
    ignored_patterns: Vec<IgnoreSpec>,
    tests: Vec<TestCase>,
}

impl LitterFile {
    pub async fn read(root: &Path) -> Result<Self, LitterFileError> {
        Self::from_path(get_config_file_path(root)).await
    }

    pub async fn from_path(path: PathBuf) -> Result<Self, LitterFileError> {
        debug!("Reading config file: {}", path.best_effort_path_display());
        let bytes = fs::read(&path).await.context(ReadSnafu {
            file_path: path.best_effort_path_display(),
        })?;
        debug!("Successfully read config file: {} bytes", bytes.len());

        let contents = String::from_utf8(bytes).context(EncodingSnafu {
            file_path: path.best_effort_path_display(),
        })?;
        contents.as_str().try_into()
    }

    pub fn basetemp(&self) -> Option<&Path> {
        self.basetemp.as_deref()
    }

    /// Ignore rules declared in the file. Relative directories are resolved against `root`.
    pub fn ignore_specs(&self, root: &Path) -> Vec<IgnoreSpec> {
        let directories = self
            .ignored_directories
            .iter()
            .map(|directory| IgnoreSpec::directory(root.join(directory)));
        let names = self.ignored_names.iter().map(IgnoreSpec::name);

        directories
            .chain(names)
            .chain(self.ignored_patterns.iter().cloned())
            .collect()
    }

    pub fn tests(&self) -> &[TestCase] {
        &self.tests
    }

    fn parse_basetemp(top_level: &LinkedHashMap<Yaml, Yaml>) -> Result<Option<PathBuf>, LitterFileError> {
        match top_level.get(&yaml_key("basetemp")) {
            None => Ok(None),
            Some(value) => value
                .as_str()
                .map(|basetemp| Some(PathBuf::from(basetemp)))
                .context(InvalidValueSnafu { key: "basetemp" }),
        }
    }

    fn parse_string_list(
        section: &LinkedHashMap<Yaml, Yaml>,
        key: &'static str,
    ) -> Result<Vec<String>, LitterFileError> {
        let Some(value) = section.get(&yaml_key(key)) else {
            return Ok(Vec::new());
        };

        value
            .as_sequence()
            .context(IgnoreListNotSequenceSnafu { key })?
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_string)
                    .context(InvalidValueSnafu { key })
            })
            .collect()
    }

    fn parse_tests(top_level: &LinkedHashMap<Yaml, Yaml>) -> Result<Vec<TestCase>, LitterFileError> {
        let empty = Yaml::Mapping(LinkedHashMap::new());
        let tests = top_level
            .get(&yaml_key("tests"))
            .unwrap_or(&empty)
            .as_mapping()
            .ok_or(LitterFileError::TestsNotMap)?
            .iter()
            .filter_map(|(key, value)| {
                if let Yaml::Value(Scalar::String(test_name)) = key {
                    if let Yaml::Mapping(test_data) = value {
                        return Some((test_name, test_data));
                    }
                }
                debug!("Skipping invalid test entry: {:?}", key);
                None
            })
            .filter_map(|(test_name, test_data)| TestCase::from_test_yaml(test_name, test_data))
            .collect::<Vec<_>>();

        Ok(tests)
    }
}

impl TryFrom<&str> for LitterFile {
    type Error = LitterFileError;

    fn try_from(contents: &str) -> Result<Self, Self::Error> {
        let contents_vec =
            Yaml::load_from_str(contents).map_err(|e| LitterFileError::ParseError { source: e })?;
        let contents = contents_vec
            .first()
            .ok_or(LitterFileError::MalformedConfig)?;

        let top_level = contents
            .as_mapping()
            .ok_or(LitterFileError::TopLevelNotMap)?;

        let basetemp = Self::parse_basetemp(top_level)?;

        let empty = Yaml::Mapping(LinkedHashMap::new());
        let ignore = top_level
            .get(&yaml_key("ignore"))
            .unwrap_or(&empty)
            .as_mapping()
            .ok_or(LitterFileError::IgnoreNotMap)?;

        let ignored_directories = Self::parse_string_list(ignore, "directories")?
            .into_iter()
            .map(PathBuf::from)
            .collect();
        let ignored_names = Self::parse_string_list(ignore, "names")?;
        let ignored_patterns = Self::parse_string_list(ignore, "patterns")?
            .into_iter()
            .map(|pattern| {
                IgnoreSpec::regex(&pattern).context(InvalidPatternSnafu { pattern: pattern.clone() })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let tests = Self::parse_tests(top_level)?
            .into_iter()
            .try_fold(Vec::<TestCase>::new(), |mut acc, test| {
                if acc.iter().any(|seen| seen.name() == test.name()) {
                    // For now unreachable, as Saphyr rejects duplicate keys
                    Err(LitterFileError::DuplicateTest {
                        test_name: test.name().to_string(),
                    })
                } else {
                    acc.push(test);
                    Ok(acc)
                }
            })?;

        Ok(LitterFile {
            basetemp,
            ignored_directories,
            ignored_names,
            ignored_patterns,
            tests,
        })
    }
}

#[derive(Debug, Snafu)]
pub enum LitterFileError {
    #[snafu(display("Failed to read the config file: {}", file_path))]
    ReadError {
        file_path: String,
        source: std::io::Error,
    },
    #[snafu(display("The config file {} is not valid UTF-8", file_path))]
    EncodingError {
        file_path: String,
        source: std::string::FromUtf8Error,
    },
    #[snafu(display("Failed to parse the config file"))]
    ParseError { source: saphyr::ScanError },
    #[snafu(display("Improperly formatted config file"))]
    MalformedConfig,
    #[snafu(display("Top level of config should be a map"))]
    TopLevelNotMap,
    #[snafu(display("Ignore section should be a map"))]
    IgnoreNotMap,
    #[snafu(display("Ignore list '{}' should be a sequence", key))]
    IgnoreListNotSequence { key: &'static str },
    #[snafu(display("Value of '{}' should be a string", key))]
    InvalidValue { key: &'static str },
    #[snafu(display("Invalid ignore pattern '{}'", pattern))]
    InvalidPattern {
        pattern: String,
        source: regex::Error,
    },
    #[snafu(display("Tests section should be a map"))]
    TestsNotMap,
    #[snafu(display("Test '{}' is defined multiple times", test_name))]
    DuplicateTest { test_name: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn parse(contents: &str) -> Result<LitterFile, LitterFileError> {
        contents.try_into()
    }

    #[compio::test]
    async fn config_returns_error_on_nonexistent_file() {
        let result = LitterFile::from_path(Path::new("nonexistent.yaml").to_path_buf()).await;
        assert!(matches!(result, Err(LitterFileError::ReadError { .. })));
    }

    #[compio::test]
    async fn config_is_read_from_root() {
        let root = TempDir::new().expect("Failed to create temp directory");
        std::fs::write(
            get_config_file_path(root.path()),
            "tests:\n  unit:\n    command: \"true\"\n",
        )
        .expect("Failed to write config");

        let config = LitterFile::read(root.path()).await.expect("valid config");

        assert_eq!(config.tests().len(), 1);
        assert_eq!(config.tests()[0].name(), "unit");
        assert_eq!(config.tests()[0].command(), "true");
    }

    #[test]
    fn config_returns_error_on_invalid_yaml() {
        let result = parse("invalid: yaml: content: [unclosed");
        assert!(matches!(result, Err(LitterFileError::ParseError { .. })));
    }

    #[test]
    fn config_returns_error_on_empty_file() {
        assert!(matches!(parse(""), Err(LitterFileError::MalformedConfig)));
    }

    #[test]
    fn config_returns_error_when_top_level_is_not_map() {
        assert!(matches!(
            parse("- item1\n- item2"),
            Err(LitterFileError::TopLevelNotMap)
        ));
        assert!(matches!(
            parse("just a string"),
            Err(LitterFileError::TopLevelNotMap)
        ));
    }

    #[test]
    fn config_returns_error_when_tests_is_not_map() {
        assert!(matches!(
            parse("tests:\n  - invalid_test_format"),
            Err(LitterFileError::TestsNotMap)
        ));
    }

    #[test]
    fn config_returns_error_when_ignore_is_not_map() {
        assert!(matches!(
            parse("ignore:\n  - venv"),
            Err(LitterFileError::IgnoreNotMap)
        ));
    }

    #[test]
    fn config_returns_error_when_ignore_list_is_not_sequence() {
        assert!(matches!(
            parse("ignore:\n  names: venv"),
            Err(LitterFileError::IgnoreListNotSequence { key: "names" })
        ));
    }

    #[test]
    fn config_returns_error_on_non_string_ignore_entry() {
        assert!(matches!(
            parse("ignore:\n  directories:\n    - {nested: map}"),
            Err(LitterFileError::InvalidValue { key: "directories" })
        ));
    }

    #[test]
    fn config_returns_error_on_invalid_pattern() {
        let result = parse("ignore:\n  patterns:\n    - '(unclosed'");
        match result {
            Err(LitterFileError::InvalidPattern { pattern, .. }) => assert_eq!(pattern, "(unclosed"),
            other => panic!("Expected InvalidPattern, got {other:?}"),
        }
    }

    #[test]
    fn config_returns_error_on_non_string_basetemp() {
        assert!(matches!(
            parse("basetemp:\n  - a"),
            Err(LitterFileError::InvalidValue { key: "basetemp" })
        ));
    }

    #[test]
    fn config_handles_missing_sections() {
        let config = parse("other_config: value").expect("valid config");
        assert!(config.tests().is_empty());
        assert!(config.basetemp().is_none());
        assert!(config.ignore_specs(Path::new("/root")).is_empty());
    }

    #[test]
    fn config_handles_empty_tests_section() {
        let config = parse("tests: {}").expect("valid config");
        assert!(config.tests().is_empty());
    }

    #[test]
    fn config_reads_ignore_rules() {
        let config = parse(
            r#"
basetemp: tmp/basetemp
ignore:
  directories: [build/scratch, /abs/dir]
  names: [target, .git]
  patterns: ['.*\.log']
"#,
        )
        .expect("valid config");
        let root = Path::new("/project");
        let specs = config.ignore_specs(root);

        assert_eq!(config.basetemp(), Some(Path::new("tmp/basetemp")));
        assert_eq!(specs.len(), 5);
        assert!(specs.contains(&IgnoreSpec::directory("/project/build/scratch")));
        assert!(specs.contains(&IgnoreSpec::directory("/abs/dir")));
        assert!(specs.contains(&IgnoreSpec::name("target")));
        assert!(specs.contains(&IgnoreSpec::name(".git")));
        assert!(specs.contains(&IgnoreSpec::regex(r".*\.log").unwrap()));
    }

    #[test]
    fn config_keeps_test_order() {
        let config = parse(
            r#"
tests:
  zeta:
    command: "echo z"
  alpha:
    command: "echo a"
  mid:
    command: "echo m"
"#,
        )
        .expect("valid config");

        let names: Vec<&str> = config.tests().iter().map(TestCase::name).collect();
        assert_eq!(names, ["zeta", "alpha", "mid"]);
        assert_eq!(config.tests()[1].command(), "echo a");
    }

    #[test]
    fn config_skips_invalid_test_entries() {
        let config = parse(
            r#"
tests:
  123: "invalid numeric key"
  valid_test:
    command: "echo hello"
  "another_invalid": "string value instead of map"
  no_command: {}
  null_test: null
"#,
        )
        .expect("valid config");

        let names: Vec<&str> = config.tests().iter().map(TestCase::name).collect();
        assert_eq!(names, ["valid_test"]);
    }

    #[test]
    fn config_handles_unicode_and_special_test_names() {
        let config = parse(
            r#"
tests:
  "test with spaces":
    command: "echo spaces"
  "тест":
    command: "echo unicode"
"#,
        )
        .expect("valid config");

        let names: Vec<&str> = config.tests().iter().map(TestCase::name).collect();
        assert_eq!(names, ["test with spaces", "тест"]);
    }
}
