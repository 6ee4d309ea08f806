use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::config::Capability;

/// Kind of an [`ArchiveError`], without the details.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    DirectoryCreateFailed,
    OpenFailed,
    ExtractFailed,
    UnsupportedFormat,
    MissingCapability,
    CreateFailed,
    ScanFailed,
    SourceNotFound,
    AddFailed,
}

/// Underlying failure reported by a codec crate or the filesystem.
#[derive(Debug, Error)]
pub enum Cause {
    #[error(transparent)]
    Io(#[from] io::Error),

    #[cfg(feature = "zip")]
    #[error(transparent)]
    Zip(#[from] zip::result::ZipError),

    #[cfg(feature = "rar")]
    #[error(transparent)]
    Rar(#[from] unrar::error::UnrarError),

    #[error(transparent)]
    Walk(#[from] walkdir::Error),
}

/// Error returned by every archive operation.
///
/// The `Display` output is the message shown to the user.
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("Archive file '{name}' not found.")]
    NotFound { name: String },

    #[error("Failed to create destination directory: {}", path.display())]
    DirectoryCreateFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Unable to open {format} archive: {}", path.display())]
    OpenFailed {
        format: &'static str,
        path: PathBuf,
        #[source]
        source: Cause,
    },

    #[error("Failed to extract archive: {}", path.display())]
    ExtractFailed {
        path: PathBuf,
        #[source]
        source: Cause,
    },

    #[error("Unsupported archive format: {extension}")]
    UnsupportedFormat { extension: String },

    #[error("{capability} support is not available.")]
    MissingCapability { capability: Capability },

    #[error("Failed to create zip archive: {}", path.display())]
    CreateFailed {
        path: PathBuf,
        #[source]
        source: Cause,
    },

    #[error("Failed to scan directory: {}", path.display())]
    ScanFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Source path not found: {}", path.display())]
    SourceNotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to add '{}' to zip archive", path.display())]
    AddFailed {
        path: PathBuf,
        #[source]
        source: Cause,
    },
}

impl ArchiveError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ArchiveError::NotFound { .. } => ErrorKind::NotFound,
            ArchiveError::DirectoryCreateFailed { .. } => ErrorKind::DirectoryCreateFailed,
            ArchiveError::OpenFailed { .. } => ErrorKind::OpenFailed,
            ArchiveError::ExtractFailed { .. } => ErrorKind::ExtractFailed,
            ArchiveError::UnsupportedFormat { .. } => ErrorKind::UnsupportedFormat,
            ArchiveError::MissingCapability { .. } => ErrorKind::MissingCapability,
            ArchiveError::CreateFailed { .. } => ErrorKind::CreateFailed,
            ArchiveError::ScanFailed { .. } => ErrorKind::ScanFailed,
            ArchiveError::SourceNotFound { .. } => ErrorKind::SourceNotFound,
            ArchiveError::AddFailed { .. } => ErrorKind::AddFailed,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
