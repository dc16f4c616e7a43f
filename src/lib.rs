//
// lib.rs
// dircompare
//
// Library entry that re-exports the comparator, its enumeration and reporting collaborators, and the CLI option parsing used by the binary.
//
// Thales Matheus Mendonça Santos - November 2025
//
// Public crate interface: re-export modules used by the binary and tests.
pub mod cli;
pub mod comparator;
pub mod error;
pub mod record;
pub mod report;
pub mod scanner;

pub use cli::{build_options, resolve_roots, Args, Options};
pub use comparator::{classify, Comparator, Comparison, FileIndex};
pub use error::{CompareError, ScanError, Side};
pub use record::FileRecord;
pub use report::{ConsoleReporter, LogReporter, Reporter, SilentReporter, Summary};
pub use scanner::{DirScanner, Enumerator, Records, StaticEnumerator};
