use std::fs;
use std::path::{Path, PathBuf};

use glob::Pattern;
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

use crate::error::ScanError;
use crate::record::FileRecord;

pub type Records<'a> = Box<dyn Iterator<Item = Result<FileRecord, ScanError>> + 'a>;

/// Produces the file records found under a root, lazily.
pub trait Enumerator: Send + Sync {
    fn enumerate<'a>(&'a self, root: &'a Path) -> Records<'a>;
}

/// Recursive walk of a local directory tree.
#[derive(Debug, Default, Clone)]
pub struct DirScanner {
    ignore_patterns: Vec<Pattern>,
}

impl DirScanner {
    pub fn new(ignore_patterns: Vec<Pattern>) -> Self {
        Self { ignore_patterns }
    }
}

fn is_ignored(rel: &Path, patterns: &[Pattern]) -> bool {
    if patterns.is_empty() {
        return false;
    }
    let name = rel.file_name().and_then(|s| s.to_str()).unwrap_or("");
    let s_rel = rel.to_string_lossy().replace('\\', "/");
    patterns
        .iter()
        .any(|pat| pat.matches(&s_rel) || pat.matches(name))
}

fn to_record(entry: &DirEntry, root: &Path) -> Result<FileRecord, ScanError> {
    let path = entry.path();
    let rel = path.strip_prefix(root).map_err(|_| ScanError::Prefix {
        path: path.to_path_buf(),
        root: root.to_path_buf(),
    })?;
    // Follows symlinks, so a linked file reports its target's length.
    let metadata = fs::metadata(path).map_err(|source| ScanError::Metadata {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(FileRecord::new(rel, metadata.len()))
}

impl Enumerator for DirScanner {
    fn enumerate<'a>(&'a self, root: &'a Path) -> Records<'a> {
        debug!("Enumerating files under {:?}", root);

        let walker = WalkDir::new(root)
            .follow_links(false)
            .into_iter()
            .filter_entry(move |e| match e.path().strip_prefix(root) {
                Ok(rel) if rel != Path::new("") => !is_ignored(rel, &self.ignore_patterns),
                _ => true,
            });

        Box::new(walker.filter_map(move |entry| match entry {
            Ok(entry) if entry.depth() == 0 => {
                (!entry.path().is_dir()).then(|| {
                    Err(ScanError::NotADirectory {
                        root: root.to_path_buf(),
                    })
                })
            }
            Ok(entry) if entry.path().is_file() => Some(to_record(&entry, root)),
            Ok(_) => None,
            Err(source) => Some(Err(ScanError::Walk {
                root: root.to_path_buf(),
                source,
            })),
        }))
    }
}

/// Fixed record lists keyed by root, for callers that already hold a listing.
#[derive(Debug, Default, Clone)]
pub struct StaticEnumerator {
    trees: Vec<(PathBuf, Vec<FileRecord>)>,
}

impl StaticEnumerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tree(mut self, root: impl Into<PathBuf>, records: Vec<FileRecord>) -> Self {
        self.trees.push((root.into(), records));
        self
    }
}

impl Enumerator for StaticEnumerator {
    fn enumerate<'a>(&'a self, root: &'a Path) -> Records<'a> {
        let records = self
            .trees
            .iter()
            .find(|(r, _)| r == root)
            .map(|(_, records)| records.as_slice())
            .unwrap_or(&[]);
        Box::new(records.iter().cloned().map(Ok))
    }
}
