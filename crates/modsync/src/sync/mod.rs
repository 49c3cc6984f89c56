//! Sync orchestration
//!
//! [`Syncer`] runs every step in a fixed order, one after another:
//!
//! 1. fetch the upstream script and rewrite its namespace
//! 2. regenerate the translation template
//! 3. fetch and patch the manifest
//! 4. fetch the license
//! 5. fetch the model
//! 6. fetch the sound
//! 7. fetch the texture set
//!
//! The first error stops the run. Artifacts written by earlier steps stay.

use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, info_span, Instrument};

use crate::config::SyncConfig;
use crate::error::Result;
use crate::fetch::files::ensure_dir;
use crate::fetch::{FetchOutcome, FetchRequest, HttpFetcher, ResourceFetcher};
use crate::locale::extract_locale;
use crate::manifest::patch_manifest_file;
use crate::metrics::{SyncMetrics, SyncMetricsSnapshot};
use crate::progress::ProgressCallback;
use crate::rewrite::rewrite_namespace_file;
use crate::textures::fetch_texture_set;

/// One stage of a sync run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStep {
    Script,
    Locale,
    Manifest,
    License,
    Model,
    Sound,
    Textures,
}

impl SyncStep {
    /// Execution order
    pub const ALL: [SyncStep; 7] = [
        SyncStep::Script,
        SyncStep::Locale,
        SyncStep::Manifest,
        SyncStep::License,
        SyncStep::Model,
        SyncStep::Sound,
        SyncStep::Textures,
    ];
}

impl std::fmt::Display for SyncStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncStep::Script => write!(f, "script"),
            SyncStep::Locale => write!(f, "locale"),
            SyncStep::Manifest => write!(f, "manifest"),
            SyncStep::License => write!(f, "license"),
            SyncStep::Model => write!(f, "model"),
            SyncStep::Sound => write!(f, "sound"),
            SyncStep::Textures => write!(f, "textures"),
        }
    }
}

/// Fetcher wrapper that feeds the run metrics
struct Metered<'a, F: ?Sized> {
    inner: &'a F,
    metrics: &'a SyncMetrics,
}

#[async_trait]
impl<'a, F: ResourceFetcher + ?Sized> ResourceFetcher for Metered<'a, F> {
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchOutcome> {
        let outcome = self.inner.fetch(request).await?;
        match outcome {
            FetchOutcome::Fetched { size } => self.metrics.record_fetched(size),
            FetchOutcome::Missing => self.metrics.record_missing(),
        }
        Ok(outcome)
    }
}

/// Drives a complete sync of the downstream module
pub struct Syncer<F> {
    config: SyncConfig,
    fetcher: F,
    metrics: Arc<SyncMetrics>,
}

impl Syncer<HttpFetcher> {
    /// Create a syncer backed by the HTTP fetcher
    pub fn new(config: SyncConfig, progress: Option<ProgressCallback>) -> Result<Self> {
        let mut fetcher = HttpFetcher::new(&config)?;
        if let Some(callback) = progress {
            fetcher = fetcher.with_progress(callback);
        }
        Ok(Self::with_fetcher(config, fetcher))
    }
}

impl<F: ResourceFetcher> Syncer<F> {
    pub fn with_fetcher(config: SyncConfig, fetcher: F) -> Self {
        Self {
            config,
            fetcher,
            metrics: Arc::new(SyncMetrics::default()),
        }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn metrics(&self) -> &SyncMetrics {
        &self.metrics
    }

    /// Run every step in order
    pub async fn run(&self) -> Result<SyncMetricsSnapshot> {
        info!(
            "syncing {} from {} at {}",
            self.config.target.name, self.config.upstream.base, self.config.upstream.revision
        );
        for step in SyncStep::ALL {
            self.run_step(step)
                .instrument(info_span!("step", step = %step))
                .await?;
        }
        Ok(self.metrics.snapshot())
    }

    /// Run a single step
    pub async fn run_step(&self, step: SyncStep) -> Result<()> {
        let layout = &self.config.layout;
        match step {
            SyncStep::Script => {
                self.fetch(&layout.script_source, &layout.script).await?;
                rewrite_namespace_file(&self.config.local_path(&layout.script), &self.config.target)
                    .await
            }
            SyncStep::Locale => {
                let count = extract_locale(
                    &self.config.local_path(&layout.script),
                    &self.config.local_path(&layout.locale_template),
                    self.config.target.text_domain(),
                )
                .await?;
                self.metrics.record_locale_strings(count);
                Ok(())
            }
            SyncStep::Manifest => {
                self.fetch(&layout.manifest, &layout.manifest).await?;
                patch_manifest_file(&self.config.local_path(&layout.manifest), &self.config.target)
                    .await
            }
            SyncStep::License => self.fetch(&layout.license, &layout.license).await,
            SyncStep::Model => self.fetch_into_dir(&layout.model).await,
            SyncStep::Sound => self.fetch_into_dir(&layout.sound).await,
            SyncStep::Textures => {
                let count = fetch_texture_set(&self.metered(), &self.config).await?;
                self.metrics.record_textures(count as usize);
                Ok(())
            }
        }
    }

    fn metered(&self) -> Metered<'_, F> {
        Metered {
            inner: &self.fetcher,
            metrics: &self.metrics,
        }
    }

    async fn fetch(&self, relative: &str, target: &str) -> Result<()> {
        let request = FetchRequest::new(relative).with_target(target);
        self.metered().fetch(&request).await?;
        Ok(())
    }

    /// Fetch an asset whose local directory may not exist yet
    async fn fetch_into_dir(&self, relative: &str) -> Result<()> {
        if let Some(parent) = Path::new(relative).parent() {
            ensure_dir(&self.config.local_path(parent)).await?;
        }
        self.fetch(relative, relative).await
    }
}
