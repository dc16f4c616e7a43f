use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Which tree a record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Source,
    Target,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Source => f.write_str("source"),
            Side::Target => f.write_str("target"),
        }
    }
}

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("failed to walk {root:?}: {source}")]
    Walk {
        root: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("{root:?} is not a directory")]
    NotADirectory { root: PathBuf },

    #[error("failed to read metadata of {path:?}: {source}")]
    Metadata {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path:?} is not under root {root:?}")]
    Prefix { path: PathBuf, root: PathBuf },
}

#[derive(Error, Debug)]
pub enum CompareError {
    #[error("duplicate relative path in {side} tree: {path:?}")]
    DuplicateKey { side: Side, path: PathBuf },

    #[error(transparent)]
    Enumeration(#[from] ScanError),
}

pub type Result<T> = std::result::Result<T, CompareError>;
