//! Error types for the pkgtree-core library.
//!
//! Every variant is fatal for the file being processed. A file without a
//! package declaration is not an error at all; extraction reports it as
//! `Ok(None)`.

use crate::extract::TextEncoding;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for pkgtree operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for all pkgtree operations
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Failed to read input file
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        /// Path to the file that failed to read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// None of the configured encodings could decode the input
    #[error("cannot decode '{path}' with any of: {}", format_encodings(.tried))]
    Undecodable {
        /// Path to the undecodable file
        path: PathBuf,
        /// Encodings that were attempted, in order
        tried: Vec<TextEncoding>,
    },

    /// Failed to create output directory
    #[error("failed to create directory '{path}': {source}")]
    DirectoryCreate {
        /// Path to the directory that failed to create
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to create or write output file
    #[error("failed to write file '{path}': {source}")]
    FileWrite {
        /// Path to the file that failed to write
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Ran out of collision suffixes for a destination name
    #[error("no free name left for '{path}'")]
    NameCollisionExhausted {
        /// Unsuffixed destination path
        path: PathBuf,
    },
}

impl Error {
    /// Creates a new file read error
    pub fn file_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileRead {
            path: path.into(),
            source,
        }
    }

    /// Creates a new decoding error
    pub fn undecodable(path: impl Into<PathBuf>, tried: &[TextEncoding]) -> Self {
        Self::Undecodable {
            path: path.into(),
            tried: tried.to_vec(),
        }
    }

    /// Creates a new directory creation error
    pub fn directory_create(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::DirectoryCreate {
            path: path.into(),
            source,
        }
    }

    /// Creates a new file write error
    pub fn file_write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileWrite {
            path: path.into(),
            source,
        }
    }

    /// Creates a new collision exhaustion error
    pub fn name_collision_exhausted(path: impl Into<PathBuf>) -> Self {
        Self::NameCollisionExhausted { path: path.into() }
    }

    /// Returns true if the error happened on the input side (reading or
    /// decoding) rather than while writing to the destination tree
    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::FileRead { .. } | Self::Undecodable { .. })
    }
}

fn format_encodings(tried: &[TextEncoding]) -> String {
    tried
        .iter()
        .map(|e| e.label())
        .collect::<Vec<_>>()
        .join(", ")
}
