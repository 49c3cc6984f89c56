//! Error types for the sync pipeline with path and URL context

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while syncing a module from upstream
///
/// Every variant is fatal to the run. Tolerated absence of an upstream
/// resource is not an error; it is reported as [`crate::FetchOutcome::Missing`].
#[derive(Error, Debug)]
pub enum SyncError {
    /// Upstream could not deliver the resource (non-success status or transport failure)
    #[error("failed to fetch resource: {url} ({reason})")]
    ResourceUnavailable {
        url: String,
        reason: String,
    },

    /// A local file some step depends on does not exist
    #[error("[{path}] file not found, cannot {purpose}")]
    MissingFile {
        path: PathBuf,
        purpose: String,
    },

    /// File system I/O errors with file context
    #[error("{operation} '{path}' failed")]
    FileSystem {
        path: PathBuf,
        operation: FileOperation,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid upstream URL '{url}'")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// Only individual files can be fetched
    #[error("cannot fetch directory '{path}': request individual files instead")]
    DirectoryFetchUnsupported {
        path: String,
    },

    #[error("failed to build HTTP client: {reason}")]
    HttpClient {
        reason: String,
    },
}

/// Types of file operations for error context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOperation {
    Read,
    Write,
    Delete,
    Move,
    CreateDir,
}

impl std::fmt::Display for FileOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileOperation::Read => write!(f, "reading"),
            FileOperation::Write => write!(f, "writing"),
            FileOperation::Delete => write!(f, "deleting"),
            FileOperation::Move => write!(f, "moving"),
            FileOperation::CreateDir => write!(f, "creating directory"),
        }
    }
}

pub type Result<T> = std::result::Result<T, SyncError>;

impl SyncError {
    /// Attach path and operation context to an I/O error
    pub fn io(path: impl Into<PathBuf>, operation: FileOperation, source: std::io::Error) -> Self {
        SyncError::FileSystem {
            path: path.into(),
            operation,
            source,
        }
    }

    /// True for the "resource not found" class: a fatal fetch or a missing precondition
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            SyncError::ResourceUnavailable { .. } | SyncError::MissingFile { .. }
        )
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            SyncError::ResourceUnavailable { .. } => "resource_unavailable",
            SyncError::MissingFile { .. } => "missing_file",
            SyncError::FileSystem { .. } => "file_system",
            SyncError::InvalidUrl { .. } => "invalid_url",
            SyncError::DirectoryFetchUnsupported { .. } => "directory_fetch",
            SyncError::HttpClient { .. } => "http_client",
        }
    }
}
