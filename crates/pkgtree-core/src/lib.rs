//! # pkgtree-core
//!
//! A library for rebuilding Java package directories from source files that
//! lost their paths, typically files carved out of a disk image by a recovery
//! tool such as PhotoRec.
//!
//! This crate provides the core functionality for:
//! - Decoding recovered bytes with an ordered encoding fallback
//! - Detecting the declared package and the principal type of a file
//! - Writing the file under a package-derived directory without ever
//!   overwriting an existing file
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`extract`]: Decoding and package/type detection
//! - [`place`]: Destination naming and collision-safe writing
//! - [`recover`]: Per-file pipeline and run counters
//! - [`error`]: Error types and handling
//!
//! ## Example
//!
//! ```no_run
//! use pkgtree_core::{Extractor, Outcome, Recoverer, TreePlacer};
//! use std::path::Path;
//!
//! let recoverer = Recoverer::new(Extractor::new(), TreePlacer::new("./restored"));
//!
//! match recoverer.recover_file(Path::new("recup_dir.1/f0123456.txt"))? {
//!     Outcome::Placed { placed, .. } => println!("{}", placed.path.display()),
//!     Outcome::Skipped => println!("no package declaration"),
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Extensibility
//!
//! - [`Placer`]: Customize where and how extracted files are stored

#![deny(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unreachable_pub)]

pub mod error;
pub mod extract;
pub mod place;
pub mod recover;

// Re-export primary types for convenience
pub use error::{Error, Result};
pub use extract::{Extracted, Extractor, ExtractorConfig, PrincipalType, TextEncoding};
pub use place::{DryRunPlacer, Placed, Placement, Placer, PlacerConfig, TreePlacer};
pub use recover::{Outcome, Recoverer, RunStats};

/// Crate version for programmatic access
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Extension given to every placed file
pub const DEFAULT_EXTENSION: &str = ".java";
