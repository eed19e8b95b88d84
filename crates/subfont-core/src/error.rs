// src/error.rs
use std::path::PathBuf;
use thiserror::Error;

/// Every failure the subsetting pipeline can surface.
///
/// All variants abort the run; the only locally recovered condition is a
/// missing font under [`NotFoundPolicy::LogAndContinue`](crate::NotFoundPolicy),
/// which never reaches this type.
#[derive(Error, Debug)]
pub enum SubsetError {
    // Resolution
    #[error("font not found: \"{name}\"")]
    FontNotFound { name: String },

    // Subtitle documents
    #[error("malformed subtitle {}: {reason}", path.display())]
    MalformedDocument { path: PathBuf, reason: String },

    // Font files
    #[error("failed to decode font {}: {message}", path.display())]
    FontDecode { path: PathBuf, message: String },

    #[error("failed to subset {canonical_id}-{style_bits}: {message}")]
    Subsetting { canonical_id: String, style_bits: u8, message: String },

    #[error("failed to write font {}: {message}", path.display())]
    FontEncode { path: PathBuf, message: String },

    // Filesystem
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Configuration
    #[error("Invalid configuration: {field} = {value}")]
    InvalidConfiguration { field: String, value: String },
}

impl SubsetError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SubsetError::Io { path: path.into(), source }
    }
}

pub type SubsetResult<T> = Result<T, SubsetError>;
