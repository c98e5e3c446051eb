//! Destination placement.
//!
//! A [`Placer`] turns an extracted `(package, type name, content)` triple into
//! exactly one file under a destination root. The package becomes a relative
//! directory (`com.example.app` → `com/example/app`) and the type name, or the
//! original file name when no type was found, becomes the base name.
//! Existing files are never overwritten: a name that is taken gets a
//! ` (1)`, ` (2)`, ... suffix before the extension.
//!
//! ## Extensibility
//!
//! [`TreePlacer`] writes to disk; [`DryRunPlacer`] only reports where a file
//! would go. Other sinks can implement [`Placer`].

mod tree;

use crate::error::{Error, Result};
use crate::DEFAULT_EXTENSION;
use std::path::{Path, PathBuf};

pub use tree::{DryRunPlacer, TreePlacer};

/// What to place and what to name it after
#[derive(Debug, Clone, Copy)]
pub struct Placement<'a> {
    /// Declared package
    pub package: &'a str,
    /// Principal type name, if one was detected
    pub type_name: Option<&'a str>,
    /// Text to write
    pub content: &'a str,
    /// File name of the source file, used when `type_name` is `None`
    pub original_name: &'a str,
}

/// Where a file ended up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placed {
    /// Full destination path
    pub path: PathBuf,
    /// Collision suffix used, `None` if the plain name was free
    pub suffix: Option<u32>,
}

/// Trait for placing extracted files into a destination tree
pub trait Placer {
    /// Places one file and returns where it went
    fn place(&self, placement: &Placement<'_>) -> Result<Placed>;
}

/// Configuration for destination naming
#[derive(Debug, Clone)]
pub struct PlacerConfig {
    /// Extension appended to every output file, including the dot
    pub extension: String,
    /// Replacement for `..` in package and base names
    pub filler: String,
    /// Highest collision suffix to try (`None` = up to `u32::MAX`)
    pub max_suffix: Option<u32>,
}

impl Default for PlacerConfig {
    fn default() -> Self {
        Self {
            extension: DEFAULT_EXTENSION.to_string(),
            filler: "_".to_string(),
            max_suffix: None,
        }
    }
}

impl PlacerConfig {
    /// Creates a new placer config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the output extension
    pub fn extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Sets the `..` replacement
    pub fn filler(mut self, filler: impl Into<String>) -> Self {
        self.filler = filler.into();
        self
    }

    /// Sets the highest collision suffix
    pub fn max_suffix(mut self, max: u32) -> Self {
        self.max_suffix = Some(max);
        self
    }

    /// Collapses every `..` into the filler
    pub fn sanitize(&self, name: &str) -> String {
        name.replace("..", &self.filler)
    }

    /// Relative directory for a package: `a.b.c` → `a/b/c`
    pub fn relative_dir(&self, package: &str) -> PathBuf {
        self.sanitize(package)
            .split('.')
            .filter(|segment| !segment.is_empty())
            .collect()
    }

    /// Base name for a placement, without extension
    pub fn base_name(&self, placement: &Placement<'_>) -> String {
        let chosen = placement.type_name.unwrap_or(placement.original_name);
        let base = self.sanitize(chosen);
        match base.strip_suffix(self.extension.as_str()) {
            Some(stem) if !stem.is_empty() => stem.to_string(),
            _ => base,
        }
    }

    /// File name for a base name and collision suffix (0 = no suffix)
    pub fn file_name(&self, base: &str, suffix: u32) -> String {
        if suffix == 0 {
            format!("{}{}", base, self.extension)
        } else {
            format!("{} ({}){}", base, suffix, self.extension)
        }
    }

    /// Returns the suffix to try after `current`, or an error when the
    /// configured ceiling or `u32::MAX` is reached
    pub(crate) fn next_suffix(&self, current: u32, unsuffixed: &Path) -> Result<u32> {
        let limit = self.max_suffix.unwrap_or(u32::MAX);
        if current >= limit {
            return Err(Error::name_collision_exhausted(unsuffixed));
        }
        Ok(current + 1)
    }
}
