//! Configuration types for a sync run
//!
//! A [`SyncConfig`] is assembled once at start-up and then only read. It
//! fixes where upstream lives, which revision every URL points at, what the
//! downstream module is called and where each artifact lands on disk.

use std::path::{Path, PathBuf};
use std::time::Duration;

use url::Url;

use crate::error::{Result, SyncError};

pub const DEFAULT_UPSTREAM: &str = "https://codeberg.org/tenplus1/mobs_monster";
pub const DEFAULT_REVISION: &str = "master";

/// Upstream repository location and the revision all fetches resolve against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamRef {
    pub base: String,
    pub revision: String,
}

impl UpstreamRef {
    pub fn new<B: Into<String>, R: Into<String>>(base: B, revision: R) -> Self {
        Self {
            base: base.into(),
            revision: revision.into(),
        }
    }

    /// Raw-file URL for a path relative to the upstream root
    pub fn url_for(&self, relative: &str) -> Result<Url> {
        let raw = format!(
            "{}/raw/commit/{}/{}",
            self.base.trim_end_matches('/'),
            self.revision,
            relative.trim_start_matches('/'),
        );
        Url::parse(&raw).map_err(|source| SyncError::InvalidUrl { url: raw, source })
    }
}

impl Default for UpstreamRef {
    fn default() -> Self {
        Self::new(DEFAULT_UPSTREAM, DEFAULT_REVISION)
    }
}

/// The downstream module this tool produces
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetDescriptor {
    /// Downstream module identifier, also the translation domain
    pub name: String,
    pub title: String,
    /// Module name the upstream script registers under
    pub legacy_module: String,
    /// Namespace of the mob API the entity is registered into
    pub namespace: String,
    pub egg_image: String,
    pub egg_ingredients: String,
    /// Optional dependency providing spawn eggs
    pub egg_dependency: String,
}

impl TargetDescriptor {
    pub fn text_domain(&self) -> &str {
        &self.name
    }

    /// Fully qualified entity name, e.g. `mobs:tree_monster`
    pub fn entity(&self) -> String {
        format!("{}:{}", self.namespace, self.name)
    }
}

impl Default for TargetDescriptor {
    fn default() -> Self {
        Self {
            name: "tree_monster".to_string(),
            title: "Tree Monster".to_string(),
            legacy_module: "mobs_monster".to_string(),
            namespace: "mobs".to_string(),
            egg_image: "default_tree_top.png".to_string(),
            egg_ingredients: "default:tree".to_string(),
            egg_dependency: "asm_spawneggs".to_string(),
        }
    }
}

/// Upstream and local paths of every artifact the sync touches
///
/// Paths are relative: upstream ones to the repository root, local ones to
/// [`SyncConfig::root`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetLayout {
    pub script_source: String,
    pub script: String,
    pub manifest: String,
    pub license: String,
    pub model: String,
    pub sound: String,
    pub texture_dir: String,
    pub texture_basename: String,
    /// Highest numbered texture suffix probed (the unnumbered file counts as 1)
    pub texture_max_index: u32,
    pub locale_template: String,
    /// Download staging file name
    pub staging: String,
}

impl AssetLayout {
    /// Texture path for the given index; index 1 is the unnumbered base image
    pub fn texture(&self, index: u32) -> String {
        if index <= 1 {
            format!("{}/{}.png", self.texture_dir, self.texture_basename)
        } else {
            format!("{}/{}{}.png", self.texture_dir, self.texture_basename, index)
        }
    }
}

impl Default for AssetLayout {
    fn default() -> Self {
        Self {
            script_source: "tree_monster.lua".to_string(),
            script: "init.lua".to_string(),
            manifest: "mod.conf".to_string(),
            license: "license.txt".to_string(),
            model: "models/mobs_tree_monster.b3d".to_string(),
            sound: "sounds/mobs_treemonster.ogg".to_string(),
            texture_dir: "textures".to_string(),
            texture_basename: "mobs_tree_monster".to_string(),
            texture_max_index: 49,
            locale_template: "locale/template.txt".to_string(),
            staging: "__temp__".to_string(),
        }
    }
}

/// HTTP client settings. Unset values keep the client defaults.
#[derive(Debug, Clone, Default)]
pub struct FetchConfig {
    pub timeout: Option<Duration>,
    pub user_agent: Option<String>,
}

/// Complete configuration for one sync run
#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub upstream: UpstreamRef,
    pub target: TargetDescriptor,
    pub layout: AssetLayout,
    pub fetch: FetchConfig,
    /// Directory all local artifact paths resolve against
    pub root: PathBuf,
}

impl SyncConfig {
    pub fn builder() -> SyncConfigBuilder {
        SyncConfigBuilder::new()
    }

    /// Resolve a layout path against the output root
    pub fn local_path(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.root.join(relative)
    }

    pub fn staging_path(&self) -> PathBuf {
        self.local_path(&self.layout.staging)
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            upstream: UpstreamRef::default(),
            target: TargetDescriptor::default(),
            layout: AssetLayout::default(),
            fetch: FetchConfig::default(),
            root: PathBuf::from("."),
        }
    }
}

/// Fluent builder for [`SyncConfig`]
#[derive(Debug, Clone, Default)]
pub struct SyncConfigBuilder {
    config: SyncConfig,
}

impl SyncConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upstream<S: Into<String>>(mut self, base: S) -> Self {
        self.config.upstream.base = base.into();
        self
    }

    pub fn revision<S: Into<String>>(mut self, revision: S) -> Self {
        self.config.upstream.revision = revision.into();
        self
    }

    pub fn root<P: Into<PathBuf>>(mut self, root: P) -> Self {
        self.config.root = root.into();
        self
    }

    pub fn target(mut self, target: TargetDescriptor) -> Self {
        self.config.target = target;
        self
    }

    pub fn layout(mut self, layout: AssetLayout) -> Self {
        self.config.layout = layout;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.fetch.timeout = Some(timeout);
        self
    }

    pub fn user_agent<S: Into<String>>(mut self, user_agent: S) -> Self {
        self.config.fetch.user_agent = Some(user_agent.into());
        self
    }

    pub fn build(self) -> SyncConfig {
        self.config
    }
}
