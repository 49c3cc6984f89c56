//! `mod.conf` patching
//!
//! The manifest is a flat `key = value` file. Only two keys are touched:
//! `name` is set to the downstream module, and `optional_depends` gains the
//! spawn-egg dependency when it is not already listed.

use std::path::Path;
use tracing::debug;

use crate::config::TargetDescriptor;
use crate::error::Result;
use crate::text::{normalize_line_endings, read_required, with_single_trailing_newline, write_text};

const NAME_KEY: &str = "name";
const OPTIONAL_DEPENDS_KEY: &str = "optional_depends";

/// Key of a `key = value` line starting at column zero, if it has one
fn key_of(line: &str) -> Option<&str> {
    line.split_once('=').map(|(key, _)| key.trim_end())
}

/// Whether a dependency list value already names `dependency`
fn lists_dependency(value: &str, dependency: &str) -> bool {
    value.split(',').map(str::trim).any(|dep| dep == dependency)
}

fn patch_optional_depends(line: &str, dependency: &str) -> String {
    let value = line.split_once('=').map(|(_, v)| v).unwrap_or_default();
    if lists_dependency(value, dependency) {
        line.to_string()
    } else if value.trim().is_empty() {
        format!("{} = {}", OPTIONAL_DEPENDS_KEY, dependency)
    } else {
        format!("{}, {}", line.trim_end(), dependency)
    }
}

/// Patch manifest text for the downstream module
pub fn patch_manifest(text: &str, target: &TargetDescriptor) -> String {
    let content = normalize_line_endings(text);
    let mut saw_depends = false;

    let mut lines: Vec<String> = content
        .trim_end_matches('\n')
        .split('\n')
        .map(|line| match key_of(line) {
            Some(NAME_KEY) => format!("{} = {}", NAME_KEY, target.name),
            Some(OPTIONAL_DEPENDS_KEY) => {
                saw_depends = true;
                patch_optional_depends(line, &target.egg_dependency)
            }
            _ => line.to_string(),
        })
        .collect();

    if lines.len() == 1 && lines[0].is_empty() {
        lines.clear();
    }

    if !saw_depends {
        lines.push(format!("{} = {}", OPTIONAL_DEPENDS_KEY, target.egg_dependency));
    }

    with_single_trailing_newline(&lines.join("\n"))
}

/// Patch the manifest file at `path` in place
pub async fn patch_manifest_file(path: &Path, target: &TargetDescriptor) -> Result<()> {
    let text = read_required(path, "patch manifest").await?;
    let patched = patch_manifest(&text, target);
    debug!("Patched {}", path.display());
    write_text(path, &patched).await
}
