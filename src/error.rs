//! Error types for document operations.
//!
//! Only two things can go wrong with a document: the filesystem refuses a
//! read or write, or the user backs out of a path prompt. Both are handled
//! by the caller at the point of failure.
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure of a document operation.
///
/// A failed operation never changes the document.
#[derive(Debug, Error)]
pub enum DocumentError
{
    /// The file could not be opened, read or written.
    #[error("I/O error on {}: {source}", path.display())]
    Io
    {
        /// File the operation was working on
        path: PathBuf,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// The user dismissed a prompt without supplying a path.
    #[error("Operation cancelled")]
    UserCancelled,
}

impl DocumentError
{
    /// Wraps an I/O error together with the path it happened on.
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self
    {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Returns `true` for [`DocumentError::UserCancelled`].
    #[must_use]
    pub const fn is_cancelled(&self) -> bool
    {
        matches!(self, Self::UserCancelled)
    }
}
