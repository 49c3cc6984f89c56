//! Upstream resource fetching
//!
//! A fetch resolves a path relative to the upstream root into a raw-file URL
//! for the configured revision, downloads it into a staging file, and moves
//! the staging file over the local destination once the body is complete.
//!
//! Failures come in two shapes. A non-tolerant fetch that cannot get the
//! resource returns [`SyncError::ResourceUnavailable`]. A tolerant one
//! returns [`FetchOutcome::Missing`] and leaves the destination alone.
//! Transport errors and non-success statuses are treated the same way.

pub mod files;
pub mod http;

pub use http::HttpFetcher;

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::error::{Result, SyncError};

/// A single-file fetch from upstream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    /// Path relative to the upstream root
    pub relative: String,
    /// Local destination relative to the output root; defaults to the final path segment
    pub target: Option<PathBuf>,
    pub tolerate_missing: bool,
}

impl FetchRequest {
    pub fn new<S: Into<String>>(relative: S) -> Self {
        Self {
            relative: relative.into(),
            target: None,
            tolerate_missing: false,
        }
    }

    pub fn with_target<P: Into<PathBuf>>(mut self, target: P) -> Self {
        self.target = Some(target.into());
        self
    }

    /// Report absence upstream as [`FetchOutcome::Missing`] instead of failing
    pub fn tolerate_missing(mut self) -> Self {
        self.tolerate_missing = true;
        self
    }

    /// Local destination relative to the output root
    ///
    /// Directories cannot be fetched, so an empty path or one ending in `/`
    /// is rejected.
    pub fn target_path(&self) -> Result<PathBuf> {
        if self.relative.is_empty() || self.relative.ends_with('/') {
            return Err(SyncError::DirectoryFetchUnsupported {
                path: self.relative.clone(),
            });
        }

        if let Some(ref target) = self.target {
            return Ok(target.clone());
        }

        Path::new(&self.relative)
            .file_name()
            .map(PathBuf::from)
            .ok_or_else(|| SyncError::DirectoryFetchUnsupported {
                path: self.relative.clone(),
            })
    }
}

/// Result of a fetch that did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Fetched { size: u64 },
    /// Tolerated absence; the destination was not touched
    Missing,
}

impl FetchOutcome {
    pub fn is_missing(&self) -> bool {
        matches!(self, FetchOutcome::Missing)
    }
}

/// Source of upstream resources
#[async_trait]
pub trait ResourceFetcher: Send + Sync {
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchOutcome>;
}

#[cfg(test)]
mod tests;
