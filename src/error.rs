//! # Error Handling
//!
//! This module defines the error type shared by the mirror registry, the
//! mirror file codec, and the mirror operations. It uses `thiserror` so each
//! failure mode carries its own message and context.
//!
//! ## Failure Modes
//!
//! - **`Usage`**: conflicting or missing command flags. Raised before any
//!   file is touched.
//! - **`Read`**: an existing `mirrors.yaml` could not be read or parsed. The
//!   requested mutation is abandoned and nothing is written.
//! - **`Write`**: the mirror file could not be written. Whether this is fatal
//!   is decided by the caller.
//! - **`Io`**: any other filesystem failure, such as checking whether the
//!   mirror file exists.
//! - **`Serialization`**: rendering the mirror list as JSON failed.
//!
//! A missing prefix or a missing file is not an error. Those are reported as
//! outcomes of the operation (see [`crate::operations`]).

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for mirror registry operations
#[derive(Error, Debug)]
pub enum Error {
    /// The command was invoked with an invalid combination of flags.
    #[error("Usage error: {message}")]
    Usage { message: String },

    /// The mirror file exists but could not be read or parsed.
    #[error("Error reading existing mirrors file {}: {message}", path.display())]
    Read { path: PathBuf, message: String },

    /// The mirror file could not be created or written.
    #[error("Error writing mirrors file {}: {message}", path.display())]
    Write { path: PathBuf, message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An error occurred during serialization.
    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

impl Error {
    /// Build a [`Error::Usage`] from any message.
    pub fn usage(message: impl Into<String>) -> Self {
        Error::Usage {
            message: message.into(),
        }
    }

    /// Whether this error was raised while writing the mirror file.
    pub fn is_write(&self) -> bool {
        matches!(self, Error::Write { .. })
    }
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
