//! Numbered texture set fetching
//!
//! Upstream ships `<base>.png` followed by `<base>2.png`, `<base>3.png` and
//! so on. The numbering is taken to be contiguous: the first gap ends the
//! scan even if higher numbers exist upstream.

use tracing::debug;

use crate::config::SyncConfig;
use crate::error::Result;
use crate::fetch::files::ensure_dir;
use crate::fetch::{FetchRequest, ResourceFetcher};

/// Fetch the texture set and return how many images were written
pub async fn fetch_texture_set<F>(fetcher: &F, config: &SyncConfig) -> Result<u32>
where
    F: ResourceFetcher + ?Sized,
{
    let layout = &config.layout;
    ensure_dir(&config.local_path(&layout.texture_dir)).await?;

    let base = layout.texture(1);
    fetcher.fetch(&FetchRequest::new(&base).with_target(&base)).await?;

    let mut count = 1;
    for index in 2..=layout.texture_max_index {
        let path = layout.texture(index);
        let request = FetchRequest::new(&path).with_target(&path).tolerate_missing();
        if fetcher.fetch(&request).await?.is_missing() {
            debug!("Texture sequence ends before index {}", index);
            break;
        }
        count += 1;
    }
    Ok(count)
}
