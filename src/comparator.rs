use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use tracing::debug;

use crate::error::{CompareError, Result, Side};
use crate::record::FileRecord;
use crate::report::{Reporter, SilentReporter, Summary, PROGRESS_INTERVAL};
use crate::scanner::{DirScanner, Enumerator};

pub type FileIndex = BTreeMap<PathBuf, FileRecord>;

/// Outcome of one classification pass. Every collection is keyed by
/// relative path, so iteration order is sorted and reproducible.
#[derive(Debug, Clone, Default)]
pub struct Comparison {
    pub source_index: FileIndex,
    pub target_index: FileIndex,
    pub identical: FileIndex,
    pub different: FileIndex,
    pub missing: FileIndex,
    pub extra: FileIndex,
    /// (missing, extra) pairs sharing a name, outer order by missing path.
    pub similar: Vec<(FileRecord, FileRecord)>,
    pub elapsed: Duration,
}

impl Comparison {
    pub fn summary(&self) -> Summary {
        Summary {
            source: self.source_index.len(),
            target: self.target_index.len(),
            identical: self.identical.len(),
            different: self.different.len(),
            missing: self.missing.len(),
            extra: self.extra.len(),
            similar: self.similar.len(),
        }
    }

    pub fn similar_paths(&self) -> Vec<(PathBuf, PathBuf)> {
        self.similar
            .iter()
            .map(|(m, e)| (m.relative_path.clone(), e.relative_path.clone()))
            .collect()
    }
}

fn keys(index: &FileIndex) -> Vec<PathBuf> {
    index.keys().cloned().collect()
}

fn insert_unique(index: &mut FileIndex, record: FileRecord, side: Side) -> Result<()> {
    match index.entry(record.relative_path.clone()) {
        Entry::Occupied(slot) => Err(CompareError::DuplicateKey {
            side,
            path: slot.key().clone(),
        }),
        Entry::Vacant(slot) => {
            slot.insert(record);
            Ok(())
        }
    }
}

fn similar_pairs(
    missing: &FileIndex,
    extra: &FileIndex,
    check_length: bool,
) -> Vec<(FileRecord, FileRecord)> {
    missing
        .values()
        .flat_map(|m| {
            extra
                .values()
                .filter(move |e| m.is_similar_to(e, check_length))
                .map(move |e| (m.clone(), e.clone()))
        })
        .collect()
}

/// Classifies every source record against the target records.
///
/// The target sequence is indexed first, then the source sequence is
/// consumed once in order. The first enumeration error or duplicate
/// relative path aborts the pass.
pub fn classify<S, T, SE, TE>(
    source: S,
    target: T,
    check_length: bool,
    reporter: &mut dyn Reporter,
) -> Result<Comparison>
where
    S: IntoIterator<Item = std::result::Result<FileRecord, SE>>,
    T: IntoIterator<Item = std::result::Result<FileRecord, TE>>,
    SE: Into<CompareError>,
    TE: Into<CompareError>,
{
    reporter.started();
    let started = Instant::now();

    let mut target_index = FileIndex::new();
    for record in target {
        let record = record.map_err(Into::<CompareError>::into)?;
        insert_unique(&mut target_index, record, Side::Target)?;
    }
    debug!("Indexed {} target files", target_index.len());

    let mut source_index = FileIndex::new();
    let mut identical = FileIndex::new();
    let mut different = FileIndex::new();
    let mut missing = FileIndex::new();
    let mut extra = target_index.clone();

    for record in source {
        let record = record.map_err(Into::<CompareError>::into)?;
        insert_unique(&mut source_index, record.clone(), Side::Source)?;

        let key = record.relative_path.clone();
        match target_index.get(&key) {
            Some(target_record) => {
                extra.remove(&key);
                if record.matches_length(target_record, check_length) {
                    identical.insert(key, record);
                } else {
                    different.insert(key, record);
                }
            }
            None => {
                missing.insert(key, record);
            }
        }

        let processed = identical.len() + different.len() + missing.len();
        if processed % PROGRESS_INTERVAL == 0 {
            reporter.progress(processed);
        }
    }

    let similar = similar_pairs(&missing, &extra, check_length);
    let elapsed = started.elapsed();

    let comparison = Comparison {
        source_index,
        target_index,
        identical,
        different,
        missing,
        extra,
        similar,
        elapsed,
    };

    reporter.finished(elapsed);
    reporter.summary(&comparison.summary());
    Ok(comparison)
}

struct State {
    reporter: Box<dyn Reporter>,
    last: Option<Arc<Comparison>>,
}

/// Compares a source tree against a target tree.
///
/// `run` and every accessor share one lock: runs never overlap, and readers
/// only ever see the last fully built [`Comparison`]. Accessors return empty
/// lists until a run has succeeded.
pub struct Comparator {
    source_root: PathBuf,
    target_root: PathBuf,
    check_length: bool,
    enumerator: Box<dyn Enumerator>,
    state: Mutex<State>,
}

impl Comparator {
    pub fn new(source_root: impl Into<PathBuf>, target_root: impl Into<PathBuf>) -> Self {
        Self {
            source_root: source_root.into(),
            target_root: target_root.into(),
            check_length: false,
            enumerator: Box::new(DirScanner::default()),
            state: Mutex::new(State {
                reporter: Box::new(SilentReporter),
                last: None,
            }),
        }
    }

    pub fn with_check_length(mut self, enabled: bool) -> Self {
        self.check_length = enabled;
        self
    }

    pub fn with_enumerator(mut self, enumerator: impl Enumerator + 'static) -> Self {
        self.enumerator = Box::new(enumerator);
        self
    }

    pub fn with_reporter(mut self, reporter: impl Reporter + 'static) -> Self {
        self.state
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .reporter = Box::new(reporter);
        self
    }

    pub fn source_root(&self) -> &Path {
        &self.source_root
    }

    pub fn target_root(&self) -> &Path {
        &self.target_root
    }

    pub fn check_length(&self) -> bool {
        self.check_length
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs a full comparison, blocking while another run is in flight.
    /// On failure the previously published result stays in place.
    pub fn run(&self) -> Result<Arc<Comparison>> {
        let mut state = self.lock();
        debug!(
            source = ?self.source_root,
            target = ?self.target_root,
            check_length = self.check_length,
            "Running comparison"
        );

        let source = self.enumerator.enumerate(&self.source_root);
        let target = self.enumerator.enumerate(&self.target_root);
        let comparison = Arc::new(classify(
            source,
            target,
            self.check_length,
            state.reporter.as_mut(),
        )?);

        state.last = Some(Arc::clone(&comparison));
        Ok(comparison)
    }

    /// Snapshot of the last successful run.
    pub fn last(&self) -> Option<Arc<Comparison>> {
        self.lock().last.clone()
    }

    fn read<R: Default>(&self, f: impl FnOnce(&Comparison) -> R) -> R {
        self.lock().last.as_deref().map(f).unwrap_or_default()
    }

    pub fn source_files(&self) -> Vec<PathBuf> {
        self.read(|c| keys(&c.source_index))
    }

    pub fn target_files(&self) -> Vec<PathBuf> {
        self.read(|c| keys(&c.target_index))
    }

    pub fn identical_files(&self) -> Vec<PathBuf> {
        self.read(|c| keys(&c.identical))
    }

    pub fn different_files(&self) -> Vec<PathBuf> {
        self.read(|c| keys(&c.different))
    }

    pub fn missing_files(&self) -> Vec<PathBuf> {
        self.read(|c| keys(&c.missing))
    }

    pub fn extra_files(&self) -> Vec<PathBuf> {
        self.read(|c| keys(&c.extra))
    }

    pub fn similar_files(&self) -> Vec<(PathBuf, PathBuf)> {
        self.read(Comparison::similar_paths)
    }
}
