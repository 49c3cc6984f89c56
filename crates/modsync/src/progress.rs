//! Progress tracking and reporting for fetch operations

use std::sync::Arc;

/// Progress callback for fetch operations
pub type ProgressCallback = Arc<dyn Fn(ProgressEvent) + Send + Sync>;

/// Events emitted while resources are fetched
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    FetchStarted {
        url: String,
        target: String,
    },
    FetchComplete {
        url: String,
        target: String,
        size: u64,
    },
    /// A tolerant fetch found nothing upstream
    ResourceMissing {
        url: String,
    },
}

/// Trait for progress reporting with per-event hooks
pub trait ProgressReporter: Send + Sync {
    fn on_fetch_started(&self, _url: &str, _target: &str) {}
    fn on_fetch_complete(&self, _url: &str, _target: &str, _size: u64) {}
    fn on_resource_missing(&self, _url: &str) {}
}

/// Extension trait to convert ProgressReporter to ProgressCallback
pub trait IntoProgressCallback {
    fn into_callback(self) -> ProgressCallback;
}

impl<T: ProgressReporter + 'static> IntoProgressCallback for T {
    fn into_callback(self) -> ProgressCallback {
        Arc::new(move |event| match event {
            ProgressEvent::FetchStarted { url, target } => {
                self.on_fetch_started(&url, &target);
            }
            ProgressEvent::FetchComplete { url, target, size } => {
                self.on_fetch_complete(&url, &target, size);
            }
            ProgressEvent::ResourceMissing { url } => {
                self.on_resource_missing(&url);
            }
        })
    }
}

/// Prints one line per event to stdout
#[derive(Debug, Default)]
pub struct ConsoleProgressReporter {
    pub verbose: bool,
}

impl ConsoleProgressReporter {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl ProgressReporter for ConsoleProgressReporter {
    fn on_fetch_started(&self, url: &str, target: &str) {
        println!("fetching resource `{}` from `{}`", target, url);
    }

    fn on_fetch_complete(&self, _url: &str, target: &str, size: u64) {
        if self.verbose {
            println!("  wrote {} ({} bytes)", target, size);
        }
    }

    fn on_resource_missing(&self, url: &str) {
        println!("resource does not exist on remote: {}", url);
    }
}

/// Discards all events
#[derive(Debug, Default)]
pub struct NullProgressReporter;

impl ProgressReporter for NullProgressReporter {}
