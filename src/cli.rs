use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use glob::Pattern;

#[derive(Parser, Debug)]
#[command(author, version, about = "Classify the files of two directory trees", long_about = None)]
pub struct Args {
    /// Source directory
    pub source_dir: PathBuf,

    /// Target directory
    pub target_dir: PathBuf,

    /// Treat files sharing a relative path as different when their sizes differ
    #[arg(short = 'l', long)]
    pub check_length: bool,

    /// Glob patterns to ignore (can be repeated or comma separated)
    #[arg(short, long, value_delimiter = ',', num_args = 1..)]
    pub ignore: Vec<String>,

    /// List the paths in every non-identical category after the summary
    #[arg(long)]
    pub list: bool,

    /// Print the full result as JSON on stdout
    #[arg(long, conflicts_with = "list")]
    pub json: bool,
}

#[derive(Debug)]
pub struct Options {
    pub check_length: bool,
    pub ignore_patterns: Vec<Pattern>,
    pub list: bool,
    pub json: bool,
}

pub fn build_options(args: &Args) -> Result<Options> {
    let patterns = args
        .ignore
        .iter()
        .map(|s| Pattern::new(s).with_context(|| format!("Invalid glob pattern: {s}")))
        .collect::<Result<Vec<_>>>()?;

    Ok(Options {
        check_length: args.check_length,
        ignore_patterns: patterns,
        list: args.list,
        json: args.json,
    })
}

fn resolve_dir(path: &Path, label: &str) -> Result<PathBuf> {
    let root = path
        .canonicalize()
        .with_context(|| format!("Invalid {label}: {path:?}"))?;
    if !root.is_dir() {
        bail!("{label} is not a directory: {root:?}");
    }
    Ok(root)
}

/// Canonical source and target roots, both existing directories and distinct.
pub fn resolve_roots(args: &Args) -> Result<(PathBuf, PathBuf)> {
    let source_root = resolve_dir(&args.source_dir, "source_dir")?;
    let target_root = resolve_dir(&args.target_dir, "target_dir")?;

    if source_root == target_root {
        bail!("source_dir and target_dir cannot be the same directory.");
    }
    Ok((source_root, target_root))
}
