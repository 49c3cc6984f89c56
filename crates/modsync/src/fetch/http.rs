//! HTTP backend for [`ResourceFetcher`]

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client;
use std::path::PathBuf;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, info_span, warn, Instrument};
use url::Url;

use super::files::{atomic_replace, clear_path};
use super::{FetchOutcome, FetchRequest, ResourceFetcher};
use crate::config::{SyncConfig, UpstreamRef};
use crate::error::{FileOperation, Result, SyncError};
use crate::progress::{ProgressCallback, ProgressEvent};

/// How a single download attempt ended
enum Attempt {
    Complete(u64),
    Unavailable(String),
}

/// Fetches raw files from the upstream repository over HTTP
pub struct HttpFetcher {
    client: Client,
    upstream: UpstreamRef,
    root: PathBuf,
    staging: PathBuf,
    progress: Option<ProgressCallback>,
}

impl HttpFetcher {
    pub fn new(config: &SyncConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.fetch.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(ref user_agent) = config.fetch.user_agent {
            builder = builder.user_agent(user_agent);
        }
        let client = builder.build().map_err(|e| SyncError::HttpClient {
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            upstream: config.upstream.clone(),
            root: config.root.clone(),
            staging: config.staging_path(),
            progress: None,
        })
    }

    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.progress = Some(callback);
        self
    }

    fn report(&self, event: ProgressEvent) {
        if let Some(ref callback) = self.progress {
            callback(event);
        }
    }

    /// Stream the response body into the staging file
    async fn download_to_staging(&self, url: &Url) -> Result<Attempt> {
        let response = match self.client.get(url.clone()).send().await {
            Ok(response) => response,
            Err(e) => return Ok(Attempt::Unavailable(e.to_string())),
        };

        let status = response.status();
        if !status.is_success() {
            return Ok(Attempt::Unavailable(format!("HTTP {}", status)));
        }

        let mut file = fs::File::create(&self.staging)
            .await
            .map_err(|e| SyncError::io(&self.staging, FileOperation::Write, e))?;

        let mut stream = response.bytes_stream();
        let mut written = 0u64;
        while let Some(chunk) = stream.next().await {
            let chunk = match chunk {
                Ok(chunk) => chunk,
                Err(e) => return Ok(Attempt::Unavailable(e.to_string())),
            };
            file.write_all(&chunk)
                .await
                .map_err(|e| SyncError::io(&self.staging, FileOperation::Write, e))?;
            written += chunk.len() as u64;
        }

        file.flush()
            .await
            .map_err(|e| SyncError::io(&self.staging, FileOperation::Write, e))?;

        Ok(Attempt::Complete(written))
    }

    /// Remove the staging file after a failed attempt, keeping the original error
    async fn discard_staging(&self, err: SyncError) -> SyncError {
        if let Err(e) = clear_path(&self.staging).await {
            warn!("could not remove {}: {}", self.staging.display(), e);
        }
        err
    }
}

#[async_trait]
impl ResourceFetcher for HttpFetcher {
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchOutcome> {
        let target = request.target_path()?;
        let dest = self.root.join(&target);
        let url = self.upstream.url_for(&request.relative)?;

        async move {
            self.report(ProgressEvent::FetchStarted {
                url: url.to_string(),
                target: target.display().to_string(),
            });

            clear_path(&self.staging).await?;

            let attempt = match self.download_to_staging(&url).await {
                Ok(attempt) => attempt,
                Err(e) => return Err(self.discard_staging(e).await),
            };

            match attempt {
                Attempt::Complete(size) => {
                    if let Err(e) = atomic_replace(&self.staging, &dest).await {
                        return Err(self.discard_staging(e).await);
                    }
                    debug!("Fetched {} bytes into {}", size, dest.display());
                    self.report(ProgressEvent::FetchComplete {
                        url: url.to_string(),
                        target: target.display().to_string(),
                        size,
                    });
                    Ok(FetchOutcome::Fetched { size })
                }
                Attempt::Unavailable(reason) => {
                    clear_path(&self.staging).await?;
                    if !request.tolerate_missing {
                        return Err(SyncError::ResourceUnavailable {
                            url: url.to_string(),
                            reason,
                        });
                    }
                    info!("resource does not exist on remote: {} ({})", url, reason);
                    self.report(ProgressEvent::ResourceMissing { url: url.to_string() });
                    Ok(FetchOutcome::Missing)
                }
            }
        }
        .instrument(info_span!("fetch", resource = %request.relative))
        .await
    }
}
