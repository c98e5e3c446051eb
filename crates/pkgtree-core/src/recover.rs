//! Per-file recovery: extraction followed by placement.

use crate::error::Result;
use crate::extract::{Extractor, PrincipalType};
use crate::place::{Placed, Placement, Placer};
use std::fmt;
use std::path::Path;
use tracing::{debug, info};

/// Result of recovering one file
#[derive(Debug, Clone)]
pub enum Outcome {
    /// The file declared a package and was placed
    Placed {
        /// Declared package
        package: String,
        /// Principal type guess that drove the name
        principal: PrincipalType,
        /// Where the file went
        placed: Placed,
    },
    /// No package declaration; nothing was written
    Skipped,
}

/// Runs files through an [`Extractor`] and a [`Placer`]
#[derive(Debug, Clone)]
pub struct Recoverer<P> {
    extractor: Extractor,
    placer: P,
}

impl<P: Placer> Recoverer<P> {
    /// Creates a recoverer from its two stages
    pub fn new(extractor: Extractor, placer: P) -> Self {
        Self { extractor, placer }
    }

    /// Recovers the file at `path`
    pub fn recover_file(&self, path: &Path) -> Result<Outcome> {
        let Some(extracted) = self.extractor.extract(path)? else {
            return Ok(Outcome::Skipped);
        };

        // Lossy: a non UTF-8 recovered name gets U+FFFD in its placed name
        let original_name = path
            .file_name()
            .map(|name| name.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        if extracted.principal.name().is_none() {
            debug!("No name detected for {}, using {}", path.display(), original_name);
        }

        let placed = self.placer.place(&Placement {
            package: &extracted.package,
            type_name: extracted.principal.name(),
            content: &extracted.content,
            original_name: &original_name,
        })?;
        info!("{} -> {}", path.display(), placed.path.display());

        Ok(Outcome::Placed {
            package: extracted.package,
            principal: extracted.principal,
            placed,
        })
    }
}

/// Counters accumulated by the driving loop
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Files handed to the recoverer
    pub scanned: usize,
    /// Files written (or reported, in a dry run)
    pub placed: usize,
    /// Placed files that needed a collision suffix
    pub renamed: usize,
    /// Files without a package declaration
    pub skipped: usize,
    /// Files that failed with an error
    pub failed: usize,
}

impl RunStats {
    /// Creates empty counters
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one recovered file
    pub fn record(&mut self, outcome: &Outcome) {
        self.scanned += 1;
        match outcome {
            Outcome::Placed { placed, .. } => {
                self.placed += 1;
                if placed.suffix.is_some() {
                    self.renamed += 1;
                }
            }
            Outcome::Skipped => self.skipped += 1,
        }
    }

    /// Counts one failed file
    pub fn record_failure(&mut self) {
        self.scanned += 1;
        self.failed += 1;
    }
}

impl fmt::Display for RunStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} scanned, {} placed ({} renamed), {} skipped, {} failed",
            self.scanned, self.placed, self.renamed, self.skipped, self.failed
        )
    }
}
