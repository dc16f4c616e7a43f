use std::path::{Path, PathBuf};

use serde::{Serialize, Serializer};

/// One regular file found under a tree root.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct FileRecord {
    #[serde(serialize_with = "serialize_lossy")]
    pub relative_path: PathBuf,
    pub name: String,
    pub length: u64,
}

impl FileRecord {
    pub fn new(relative_path: impl Into<PathBuf>, length: u64) -> Self {
        let relative_path = relative_path.into();
        let name = file_name_of(&relative_path);
        Self {
            relative_path,
            name,
            length,
        }
    }

    /// Equality of two records sharing a relative path under the active policy.
    pub fn matches_length(&self, other: &FileRecord, check_length: bool) -> bool {
        !check_length || self.length == other.length
    }

    /// Same file name (and length when checked), regardless of location.
    pub fn is_similar_to(&self, other: &FileRecord, check_length: bool) -> bool {
        self.name == other.name && self.matches_length(other, check_length)
    }
}

fn serialize_lossy<S: Serializer>(path: &Path, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&path.to_string_lossy())
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_is_last_component() {
        let record = FileRecord::new("dir1/sub/x.txt", 5);
        assert_eq!(record.name, "x.txt");
        assert_eq!(record.relative_path, PathBuf::from("dir1/sub/x.txt"));
    }

    #[test]
    fn similarity_ignores_location() {
        let a = FileRecord::new("dir1/x.txt", 5);
        let b = FileRecord::new("dir2/x.txt", 5);
        let c = FileRecord::new("dir2/x.txt", 6);

        assert!(a.is_similar_to(&b, true));
        assert!(!a.is_similar_to(&c, true));
        assert!(a.is_similar_to(&c, false));
        assert!(!a.is_similar_to(&FileRecord::new("dir1/y.txt", 5), false));
    }

    #[test]
    fn serializes_relative_path_as_string() {
        let value = serde_json::to_value(FileRecord::new("dir1/x.txt", 5)).expect("serialize");

        assert_eq!(value["relative_path"], "dir1/x.txt");
        assert_eq!(value["name"], "x.txt");
        assert_eq!(value["length"], 5);
    }

    #[cfg(unix)]
    #[test]
    fn serializes_non_utf8_path_lossily() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let path = Path::new("dir").join(OsStr::from_bytes(b"bad\xff.txt"));
        let value = serde_json::to_value(FileRecord::new(path, 1)).expect("serialize");

        assert_eq!(value["relative_path"], "dir/bad\u{FFFD}.txt");
        assert_eq!(value["name"], "bad\u{FFFD}.txt");
    }
}
