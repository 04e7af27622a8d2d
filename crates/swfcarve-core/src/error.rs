//! Error types for the swfcarve-core library.
//!
//! [`Error`] covers everything that is an actual failure: file I/O, bounded
//! reads past the end of a [`ByteSource`](crate::source::ByteSource), and
//! invalid configuration. Rejecting a candidate offset is *not* an error;
//! see [`Rejection`](crate::swf::Rejection) for that.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for swfcarve operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for all swfcarve operations
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

    /// Failed to write output file
    #[error("failed to write file '{path}': {source}")]
    FileWrite {
        /// Path to the file that failed to write
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
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

    /// A bounded read fell outside the source's extent
    #[error("read of {length} bytes at offset {offset} exceeds source extent of {extent} bytes")]
    OutOfRange {
        /// Requested start offset
        offset: u64,
        /// Requested length
        length: u64,
        /// Total length of the source
        extent: u64,
    },

    /// Configuration value outside its accepted range
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// Creates a new file read error
    pub fn file_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileRead {
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

    /// Creates a new directory creation error
    pub fn directory_create(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::DirectoryCreate {
            path: path.into(),
            source,
        }
    }

    /// Creates a new out-of-range read error
    pub fn out_of_range(offset: u64, length: u64, extent: u64) -> Self {
        Self::OutOfRange {
            offset,
            length,
            extent,
        }
    }

    /// Creates a new configuration error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Returns true if the caller can skip past this error and keep scanning
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::OutOfRange { .. } | Self::FileRead { .. })
    }
}
