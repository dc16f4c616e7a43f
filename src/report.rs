use std::time::Duration;

use serde::Serialize;
use tracing::info;

/// A progress line is emitted every time this many source files are classified.
pub const PROGRESS_INTERVAL: usize = 1000;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub source: usize,
    pub target: usize,
    pub identical: usize,
    pub different: usize,
    pub missing: usize,
    pub extra: usize,
    pub similar: usize,
}

impl Summary {
    pub fn lines(&self) -> Vec<String> {
        vec![
            format!("{} source files.", self.source),
            format!("{} target files.", self.target),
            format!("{} identical files.", self.identical),
            format!("{} different files.", self.different),
            format!("{} missing files.", self.missing),
            format!("{} extra files.", self.extra),
            format!("{} similar files.", self.similar),
        ]
    }
}

/// Sink for the side output of a comparison run.
pub trait Reporter: Send {
    fn started(&mut self) {}

    fn progress(&mut self, _processed: usize) {}

    fn finished(&mut self, _elapsed: Duration) {}

    fn summary(&mut self, _summary: &Summary) {}
}

#[derive(Debug, Default)]
pub struct SilentReporter;

impl Reporter for SilentReporter {}

/// Plain text on stdout.
#[derive(Debug, Default)]
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn started(&mut self) {
        println!("Starting comparison...");
    }

    fn progress(&mut self, processed: usize) {
        println!("\t{processed}");
    }

    fn finished(&mut self, elapsed: Duration) {
        println!("Comparison run in {} ms.", elapsed.as_millis());
    }

    fn summary(&mut self, summary: &Summary) {
        println!("Process summary:");
        for line in summary.lines() {
            println!("\t- {line}");
        }
        println!();
    }
}

/// Same events as [`ConsoleReporter`], routed through `tracing`.
#[derive(Debug, Default)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn started(&mut self) {
        info!("Starting comparison");
    }

    fn progress(&mut self, processed: usize) {
        info!(processed, "Comparison progress");
    }

    fn finished(&mut self, elapsed: Duration) {
        info!(elapsed_ms = elapsed.as_millis() as u64, "Comparison finished");
    }

    fn summary(&mut self, summary: &Summary) {
        info!(
            source = summary.source,
            target = summary.target,
            identical = summary.identical,
            different = summary.different,
            missing = summary.missing,
            extra = summary.extra,
            similar = summary.similar,
            "Process summary"
        );
    }
}
