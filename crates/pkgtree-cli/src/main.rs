//! pkgtree - Recreate Java package directories from recovered source files
//!
//! This tool reads files whose original paths were lost (for example the
//! output of PhotoRec), detects their `package` declaration and principal
//! type, and files them under `<dest>/<package path>/<Type>.java`.

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use pkgtree_core::{
    DryRunPlacer, Extractor, ExtractorConfig, Outcome, Placer, Recoverer, RunStats, TextEncoding,
    TreePlacer,
};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, trace, warn, Level};
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

/// Recreate directory structures for Java packages
#[derive(Parser, Debug)]
#[command(name = "pkgtree")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Java files or directories to scan for Java files
    #[arg(value_name = "FILE")]
    inputs: Vec<PathBuf>,

    /// Directory where the package directories are recreated
    #[arg(short, long, value_name = "DIR")]
    dest: PathBuf,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Encodings to try, in order
    #[arg(
        long,
        value_enum,
        value_delimiter = ',',
        default_values = ["utf-8", "latin-1"]
    )]
    encoding: Vec<EncodingArg>,

    /// Log files that fail and continue with the rest instead of stopping
    #[arg(long)]
    keep_going: bool,

    /// Dry run - don't write files, just show where they would go
    #[arg(long)]
    dry_run: bool,
}

/// Text encodings accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum EncodingArg {
    /// Strict UTF-8
    #[value(name = "utf-8", alias = "utf8")]
    Utf8,
    /// Windows-1252
    #[value(name = "windows-1252", alias = "cp1252")]
    Windows1252,
    /// ISO-8859-1, accepts any input
    #[value(name = "latin-1", alias = "latin1", alias = "iso-8859-1")]
    Latin1,
}

impl From<EncodingArg> for TextEncoding {
    fn from(arg: EncodingArg) -> Self {
        match arg {
            EncodingArg::Utf8 => TextEncoding::Utf8,
            EncodingArg::Windows1252 => TextEncoding::Windows1252,
            EncodingArg::Latin1 => TextEncoding::Latin1,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_target(false)
        .init();

    debug!("pkgtree-core {}", pkgtree_core::VERSION);

    let stats = recover_all(&cli)?;
    if stats.failed > 0 {
        bail!("{} file(s) could not be recovered", stats.failed);
    }
    Ok(())
}

/// Builds the pipeline from the command line and runs every input through it
fn recover_all(cli: &Cli) -> Result<RunStats> {
    if cli.inputs.is_empty() {
        warn!("No input files or directories given");
    }

    let config = ExtractorConfig::new().encodings(cli.encoding.iter().copied().map(Into::into));
    let extractor = Extractor::with_config(config);

    if cli.dry_run {
        run(cli, &Recoverer::new(extractor, DryRunPlacer::new(&cli.dest)))
    } else {
        run(cli, &Recoverer::new(extractor, TreePlacer::new(&cli.dest)))
    }
}

/// Recover each input file in turn, stopping at the first error unless
/// `--keep-going` was given
fn run<P: Placer>(cli: &Cli, recoverer: &Recoverer<P>) -> Result<RunStats> {
    let mut stats = RunStats::new();

    for path in input_files(&cli.inputs) {
        trace!("Scanning file {}", path.display());

        match recoverer.recover_file(&path) {
            Ok(outcome) => {
                if cli.dry_run {
                    if let Outcome::Placed { ref placed, .. } = outcome {
                        println!("Would write: {} -> {}", path.display(), placed.path.display());
                    }
                }
                stats.record(&outcome);
            }
            Err(e) if cli.keep_going => {
                if e.is_input_error() {
                    warn!("Skipping {}: {}", path.display(), e);
                } else {
                    warn!("Failed to place {}: {}", path.display(), e);
                }
                stats.record_failure();
            }
            Err(e) => {
                stats.record_failure();
                error!("Stopping after {}", stats);
                return Err(e).with_context(|| format!("Failed to recover {}", path.display()));
            }
        }

        debug!("Scanned {} files", stats.scanned);
    }

    info!("Summary: {}", stats);
    Ok(stats)
}

/// Expands directories recursively (following symlinks) and passes every
/// other path through unchanged
fn input_files(inputs: &[PathBuf]) -> impl Iterator<Item = PathBuf> + '_ {
    inputs.iter().flat_map(|input| -> Box<dyn Iterator<Item = PathBuf>> {
        if input.is_dir() {
            Box::new(walk_dir(input))
        } else {
            Box::new(std::iter::once(input.clone()))
        }
    })
}

/// Regular files below `dir`; unreadable entries are logged and skipped
fn walk_dir(dir: &Path) -> impl Iterator<Item = PathBuf> {
    WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("Cannot traverse: {}", e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
}
