//! Placers backed by a destination directory.

use super::{Placed, Placement, Placer, PlacerConfig};
use crate::error::{Error, Result};
use std::cell::RefCell;
use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::PathBuf;
use tracing::{debug, trace};

/// Writes placements under a destination root.
///
/// Each candidate name is opened with exclusive creation, so an existing
/// file is never truncated, even if it appears between two attempts.
#[derive(Debug, Clone)]
pub struct TreePlacer {
    root: PathBuf,
    config: PlacerConfig,
}

impl TreePlacer {
    /// Creates a placer with default naming
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_config(root, PlacerConfig::default())
    }

    /// Creates a placer with custom naming
    pub fn with_config(root: impl Into<PathBuf>, config: PlacerConfig) -> Self {
        Self {
            root: root.into(),
            config,
        }
    }
}

impl Placer for TreePlacer {
    fn place(&self, placement: &Placement<'_>) -> Result<Placed> {
        let dir = self.root.join(self.config.relative_dir(placement.package));
        fs::create_dir_all(&dir).map_err(|e| Error::directory_create(&dir, e))?;

        let base = self.config.base_name(placement);
        let mut suffix = 0;
        loop {
            let path = dir.join(self.config.file_name(&base, suffix));
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(mut file) => {
                    file.write_all(placement.content.as_bytes())
                        .map_err(|e| Error::file_write(&path, e))?;
                    debug!("Wrote {}", path.display());
                    return Ok(Placed {
                        path,
                        suffix: (suffix > 0).then_some(suffix),
                    });
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    trace!("{} exists, trying next suffix", path.display());
                    suffix = self
                        .config
                        .next_suffix(suffix, &dir.join(self.config.file_name(&base, 0)))?;
                }
                Err(e) => return Err(Error::file_write(&path, e)),
            }
        }
    }
}

/// Reports where placements would go without touching the filesystem.
///
/// A name counts as taken if it exists on disk or was already reported by
/// this placer, so a preview of several files matches what a real run
/// would write.
#[derive(Debug, Clone)]
pub struct DryRunPlacer {
    root: PathBuf,
    config: PlacerConfig,
    reported: RefCell<HashSet<PathBuf>>,
}

impl DryRunPlacer {
    /// Creates a dry-run placer with default naming
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_config(root, PlacerConfig::default())
    }

    /// Creates a dry-run placer with custom naming
    pub fn with_config(root: impl Into<PathBuf>, config: PlacerConfig) -> Self {
        Self {
            root: root.into(),
            config,
            reported: RefCell::new(HashSet::new()),
        }
    }
}

impl Placer for DryRunPlacer {
    fn place(&self, placement: &Placement<'_>) -> Result<Placed> {
        let dir = self.root.join(self.config.relative_dir(placement.package));
        let base = self.config.base_name(placement);
        let mut suffix = 0;
        loop {
            let path = dir.join(self.config.file_name(&base, suffix));
            let taken = self.reported.borrow().contains(&path)
                || fs::symlink_metadata(&path).is_ok();
            if !taken {
                self.reported.borrow_mut().insert(path.clone());
                return Ok(Placed {
                    path,
                    suffix: (suffix > 0).then_some(suffix),
                });
            }
            suffix = self
                .config
                .next_suffix(suffix, &dir.join(self.config.file_name(&base, 0)))?;
        }
    }
}
