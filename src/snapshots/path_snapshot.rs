use std::cmp::Ordering;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

use derive_more::{Display, From};

/// A single captured path.
///
/// Identity is the literal path string: `a/b` and `a//b` are different snapshots even
/// though `Path` would call them equal.
#[derive(Debug, Clone, Display, From)]
#[display("{}", path.display())]
pub struct PathSnapshot {
    path: PathBuf,
}

impl PathSnapshot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PartialEq for PathSnapshot {
    fn eq(&self, other: &Self) -> bool {
        self.path.as_os_str() == other.path.as_os_str()
    }
}

impl Eq for PathSnapshot {}

impl Hash for PathSnapshot {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.path.as_os_str().hash(state);
    }
}

impl PartialOrd for PathSnapshot {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PathSnapshot {
    fn cmp(&self, other: &Self) -> Ordering {
        self.path.as_os_str().cmp(other.path.as_os_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn displays_the_literal_path() {
        let snapshot = PathSnapshot::new("some/dir/file.txt");
        assert_eq!(snapshot.to_string(), "some/dir/file.txt");
        assert_eq!(snapshot.path(), Path::new("some/dir/file.txt"));
    }

    #[test]
    fn equality_follows_the_path_string() {
        assert_eq!(PathSnapshot::new("a/b"), PathSnapshot::from(PathBuf::from("a/b")));
        assert_ne!(PathSnapshot::new("a/b"), PathSnapshot::new("a//b"));
        assert_ne!(PathSnapshot::new("a/b"), PathSnapshot::new("a/b/"));
    }

    #[test]
    fn same_path_deduplicates_in_a_set() {
        let set: HashSet<PathSnapshot> = ["x", "y", "x"].into_iter().map(PathSnapshot::new).collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn orders_by_path_string() {
        let mut snapshots = vec![PathSnapshot::new("b"), PathSnapshot::new("a/z"), PathSnapshot::new("a")];
        snapshots.sort();
        let rendered: Vec<String> = snapshots.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, ["a", "a/z", "b"]);
    }
}
