//! Upstream module sync
//!
//! This library pulls the tree monster out of the upstream `mobs_monster`
//! mod and adapts it into the standalone `tree_monster` module: the script
//! is renamed into the shared mob namespace, the translation template is
//! regenerated, the manifest is patched and the binary assets (license,
//! model, sound, textures) are mirrored.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use modsync::{ConsoleProgressReporter, IntoProgressCallback, SyncConfig, Syncer};
//!
//! # async fn example() -> modsync::Result<()> {
//! let config = SyncConfig::builder()
//!     .revision("master")
//!     .root("/path/to/tree_monster")
//!     .build();
//!
//! let progress = ConsoleProgressReporter::new(false).into_callback();
//! let syncer = Syncer::new(config, Some(progress))?;
//!
//! let summary = syncer.run().await?;
//! println!("synced {}", summary);
//! # Ok(())
//! # }
//! ```
//!
//! # Features
//!
//! - **Revision pinning**: every URL of a run resolves against one upstream revision
//! - **Atomic replacement**: downloads are staged and renamed over their destination
//! - **Tolerated absence**: optional resources report `Missing` instead of failing
//! - **Pluggable fetching**: any [`ResourceFetcher`] can drive the sync

pub mod config;
pub mod error;
pub mod fetch;
pub mod locale;
pub mod manifest;
pub mod metrics;
pub mod progress;
pub mod rewrite;
pub mod sync;
pub mod text;
pub mod textures;

// Re-export commonly used types for convenience
pub use config::{AssetLayout, FetchConfig, SyncConfig, SyncConfigBuilder, TargetDescriptor, UpstreamRef};
pub use error::{FileOperation, Result, SyncError};
pub use fetch::{FetchOutcome, FetchRequest, HttpFetcher, ResourceFetcher};
pub use metrics::{SyncMetrics, SyncMetricsSnapshot};
pub use progress::{
    ConsoleProgressReporter, IntoProgressCallback, NullProgressReporter, ProgressCallback,
    ProgressEvent, ProgressReporter,
};
pub use sync::{SyncStep, Syncer};
