//! Error taxonomy for disk image assembly.
//!
//! [`Error::SourceMissing`] and [`Error::AssemblyFailure`] are the two outcomes
//! callers are expected to branch on; the remaining variants cover argument
//! validation and the I/O performed while staging image contents.

use std::{fmt::Display, io, path::PathBuf};
use thiserror::Error;

/// Result type alias for bundler operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while preparing or assembling a disk image
#[derive(Error, Debug)]
pub enum Error {
    /// A source path listed in the image layout does not exist
    #[error("source not found: {}", .0.display())]
    SourceMissing(PathBuf),

    /// The disk image facility reported a failure
    #[error("disk image assembly failed: {0}")]
    AssemblyFailure(String),

    /// The volume label cannot be used by the host filesystem
    #[error("invalid volume name {name:?}: {reason}")]
    InvalidVolumeName {
        /// Rejected name
        name: String,
        /// Why it was rejected
        reason: String,
    },

    /// The image layout violates one of its invariants
    #[error("invalid image layout: {0}")]
    InvalidSpec(String),

    /// Parent directory of the output image does not exist
    #[error("output directory does not exist: {}", .0.display())]
    OutputDirectoryMissing(PathBuf),

    /// IO errors
    #[error("{0}")]
    IoError(#[from] io::Error),

    /// IO error with the operation and path that caused it
    #[error("{context} ({}): {source}", path.display())]
    Fs {
        /// Operation being performed
        context: String,
        /// Path involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// Directory traversal errors
    #[error("{0}")]
    WalkDir(#[from] walkdir::Error),

    /// Path prefix errors while mirroring directory trees
    #[error("{0}")]
    StripPrefix(#[from] std::path::StripPrefixError),

    /// Anything else, with a human readable message
    #[error("{0}")]
    GenericError(String),
}

/// Attach filesystem context to IO results.
pub trait ErrorExt<T> {
    /// Wrap the error with the operation and path it relates to.
    fn fs_context(self, context: &str, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, io::Error> {
    fn fs_context(self, context: &str, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|source| Error::Fs {
            context: context.to_string(),
            path: path.into(),
            source,
        })
    }
}

/// Prefix an error message with what was being attempted.
pub trait Context<T> {
    /// Add a fixed context message.
    fn context<C: Display>(self, context: C) -> Result<T>;

    /// Add a lazily built context message.
    fn with_context<C: Display, F: FnOnce() -> C>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> Context<T> for std::result::Result<T, E> {
    fn context<C: Display>(self, context: C) -> Result<T> {
        self.map_err(|e| wrap(e.into(), context))
    }

    fn with_context<C: Display, F: FnOnce() -> C>(self, f: F) -> Result<T> {
        self.map_err(|e| wrap(e.into(), f()))
    }
}

// SourceMissing and AssemblyFailure keep their variant so callers can still
// match on them after context has been added.
fn wrap(error: Error, context: impl Display) -> Error {
    match error {
        Error::SourceMissing(_) => error,
        Error::AssemblyFailure(message) => {
            Error::AssemblyFailure(format!("{context}: {message}"))
        }
        other => Error::GenericError(format!("{context}: {other}")),
    }
}

/// Return early with a [`Error::GenericError`] built from a format string.
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::bundler::Error::GenericError(format!($($arg)*)))
    };
}
