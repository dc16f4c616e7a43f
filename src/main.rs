use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::error;
use tracing_subscriber::EnvFilter;

use dircompare::{
    build_options, resolve_roots, Args, Comparator, Comparison, ConsoleReporter, DirScanner,
    FileRecord, LogReporter, Options, Summary,
};

#[derive(Serialize)]
struct SimilarPair<'a> {
    missing: &'a FileRecord,
    extra: &'a FileRecord,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    source_root: String,
    target_root: String,
    check_length: bool,
    elapsed_ms: u128,
    summary: Summary,
    identical: Vec<&'a FileRecord>,
    different: Vec<&'a FileRecord>,
    missing: Vec<&'a FileRecord>,
    extra: Vec<&'a FileRecord>,
    similar: Vec<SimilarPair<'a>>,
}

impl<'a> JsonReport<'a> {
    fn new(comparator: &Comparator, comparison: &'a Comparison) -> Self {
        Self {
            source_root: comparator.source_root().to_string_lossy().into_owned(),
            target_root: comparator.target_root().to_string_lossy().into_owned(),
            check_length: comparator.check_length(),
            elapsed_ms: comparison.elapsed.as_millis(),
            summary: comparison.summary(),
            identical: comparison.identical.values().collect(),
            different: comparison.different.values().collect(),
            missing: comparison.missing.values().collect(),
            extra: comparison.extra.values().collect(),
            similar: comparison
                .similar
                .iter()
                .map(|(missing, extra)| SimilarPair { missing, extra })
                .collect(),
        }
    }
}

fn print_listing(comparison: &Comparison) {
    let sections = [
        ("Different", &comparison.different),
        ("Missing", &comparison.missing),
        ("Extra", &comparison.extra),
    ];
    for (title, index) in sections {
        println!("{title} ({}):", index.len());
        for path in index.keys() {
            println!("\t{}", path.display());
        }
    }

    println!("Similar ({}):", comparison.similar.len());
    for (missing, extra) in &comparison.similar {
        println!(
            "\t{} -> {}",
            missing.relative_path.display(),
            extra.relative_path.display()
        );
    }
}

fn run(args: &Args, opts: Options) -> Result<()> {
    let (source_root, target_root) = resolve_roots(args)?;

    let comparator = Comparator::new(source_root, target_root)
        .with_check_length(opts.check_length)
        .with_enumerator(DirScanner::new(opts.ignore_patterns));
    let comparator = if opts.json {
        comparator.with_reporter(LogReporter)
    } else {
        comparator.with_reporter(ConsoleReporter)
    };

    let comparison = comparator.run().context("Comparison failed")?;

    if opts.json {
        let report = JsonReport::new(&comparator, &comparison);
        let json =
            serde_json::to_string_pretty(&report).context("Failed to serialize JSON report")?;
        println!("{json}");
    } else if opts.list {
        print_listing(&comparison);
    }

    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let result = build_options(&args).and_then(|opts| run(&args, opts));

    if let Err(e) = result {
        error!("{:#}", e);
        std::process::exit(1);
    }
}
