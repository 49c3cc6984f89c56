//! Namespace rewriting for the fetched mob script
//!
//! The upstream script registers its entity under the legacy module's
//! namespace. The rewrite moves it into the shared mob namespace, drops the
//! upstream spawn-egg and alias registrations, points the translator at the
//! downstream text domain and appends the spawn-egg integration stanza.
//!
//! The script is treated as opaque lines of text. Nothing here parses Lua.

use std::path::Path;
use tracing::debug;

use crate::config::TargetDescriptor;
use crate::error::Result;
use crate::text::{normalize_line_endings, read_required, with_single_trailing_newline, write_text};

/// Obsolete upstream comments dropped along with the lines they annotated
const OBSOLETE_COMMENTS: [&str; 2] = ["-- spawn egg", "-- compatibility with older mobs mod"];

/// Global exported by the optional spawn-egg mod
const EGG_GLOBAL: &str = "asm";
/// Namespace the spawn-egg mod registers its items under
const EGG_NAMESPACE: &str = "spawneggs";

/// Quoted prefix of every legacy-namespaced name, e.g. `"mobs_monster:`
pub fn legacy_prefix(target: &TargetDescriptor) -> String {
    format!("\"{}:", target.legacy_module)
}

/// Rewrite script text for the downstream module
pub fn rewrite_namespace(text: &str, target: &TargetDescriptor) -> String {
    let content = normalize_line_endings(text).replace(
        &legacy_prefix(target),
        &format!("\":{}:", target.namespace),
    );

    let removals = RemovalRules::new(target);
    let legacy_domain = format!("\"{}\"", target.legacy_module);
    let domain = format!("\"{}\"", target.text_domain());

    let mut lines: Vec<String> = content
        .split('\n')
        .filter(|line| !removals.matches(line))
        .map(|line| {
            if line.contains("get_translator(") && line.contains(&legacy_domain) {
                line.replace(&legacy_domain, &domain)
            } else {
                line.to_string()
            }
        })
        .collect();

    lines.extend(integration_block(target));
    with_single_trailing_newline(&lines.join("\n"))
}

/// Rewrite the script file at `path` in place
pub async fn rewrite_namespace_file(path: &Path, target: &TargetDescriptor) -> Result<()> {
    let text = read_required(path, "update namespace").await?;
    let rewritten = rewrite_namespace(&text, target);
    debug!(
        "Rewrote {} ({} -> {} lines)",
        path.display(),
        text.lines().count(),
        rewritten.lines().count()
    );
    write_text(path, &rewritten).await
}

/// Lines that no longer belong in the downstream script
struct RemovalRules {
    register_egg: String,
    own_alias: String,
}

impl RemovalRules {
    fn new(target: &TargetDescriptor) -> Self {
        Self {
            register_egg: format!("{}:register_egg(", target.namespace),
            own_alias: format!("{}:alias_mob(\"{}\"", target.namespace, target.entity()),
        }
    }

    fn matches(&self, line: &str) -> bool {
        line.starts_with(&self.register_egg)
            || line.starts_with(&self.own_alias)
            || OBSOLETE_COMMENTS.contains(&line)
    }
}

/// Spawn-egg integration and compatibility aliases appended to the script
///
/// The legacy alias source is single-quoted so the output keeps no
/// double-quoted legacy prefix.
fn integration_block(target: &TargetDescriptor) -> Vec<String> {
    let entity = target.entity();
    vec![
        format!("if core.global_exists(\"{}\") then", EGG_GLOBAL),
        format!("\t{}.addEgg({{", EGG_GLOBAL),
        format!("\t\tname = \"{}\",", target.name),
        format!("\t\ttitle = S(\"{}\"),", target.title),
        format!("\t\tinventory_image = \"{}\",", target.egg_image),
        format!("\t\tspawn = \"{}\",", entity),
        format!("\t\tingredients = \"{}\",", target.egg_ingredients),
        "\t})".to_string(),
        "end".to_string(),
        format!(
            "core.register_alias(\"{}\", \"{}:{}\")",
            entity, EGG_NAMESPACE, target.name
        ),
        String::new(),
        format!(
            "{}:alias_mob('{}:{}', \"{}\") -- compatibility",
            target.namespace, target.legacy_module, target.name, entity
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    const UPSTREAM: &str = "local S = core.get_translator(\"mobs_monster\")\r\n\
mobs:register_mob(\"mobs_monster:tree_monster\", {\r\n\
\tdrops = {{name = \"default:stick\"}},\r\n\
})\r\n\
-- spawn egg\r\n\
mobs:register_egg(\"mobs_monster:tree_monster\", S(\"Tree Monster\"), \"default_tree_top.png\", 1)\r\n\
-- compatibility with older mobs mod\r\n\
mobs:alias_mob(\"mobs:tree_monster\", \"mobs_monster:tree_monster\")\r\n";

    fn target() -> TargetDescriptor {
        TargetDescriptor::default()
    }

    #[test]
    fn legacy_names_move_to_shared_namespace() {
        let out = rewrite_namespace(UPSTREAM, &target());
        assert!(out.contains("mobs:register_mob(\":mobs:tree_monster\", {"));
        assert!(!out.contains("\"mobs_monster:"));
    }

    #[test]
    fn egg_alias_and_obsolete_comments_are_dropped() {
        let out = rewrite_namespace(UPSTREAM, &target());
        assert!(!out.contains("mobs:register_egg("));
        assert!(!out.contains("mobs:alias_mob(\"mobs:tree_monster\""));
        assert!(!out.lines().any(|l| l == "-- spawn egg"));
        assert!(!out.lines().any(|l| l == "-- compatibility with older mobs mod"));
        assert!(out.contains("\tdrops = {{name = \"default:stick\"}},"));
    }

    #[test]
    fn translator_domain_is_renamed() {
        let out = rewrite_namespace(UPSTREAM, &target());
        assert!(out.starts_with("local S = core.get_translator(\"tree_monster\")\n"));
    }

    #[test]
    fn other_mentions_of_legacy_module_are_kept() {
        let out = rewrite_namespace("print(\"mobs_monster\")\n", &target());
        assert!(out.starts_with("print(\"mobs_monster\")\n"));
    }

    #[test]
    fn indented_egg_registration_is_kept() {
        let out = rewrite_namespace("  mobs:register_egg(\"x\")\n", &target());
        assert!(out.starts_with("  mobs:register_egg(\"x\")\n"));
    }

    #[test]
    fn integration_block_is_appended() {
        let out = rewrite_namespace(UPSTREAM, &target());
        let expected_tail = "if core.global_exists(\"asm\") then\n\
\tasm.addEgg({\n\
\t\tname = \"tree_monster\",\n\
\t\ttitle = S(\"Tree Monster\"),\n\
\t\tinventory_image = \"default_tree_top.png\",\n\
\t\tspawn = \"mobs:tree_monster\",\n\
\t\tingredients = \"default:tree\",\n\
\t})\n\
end\n\
core.register_alias(\"mobs:tree_monster\", \"spawneggs:tree_monster\")\n\
\n\
mobs:alias_mob('mobs_monster:tree_monster', \"mobs:tree_monster\") -- compatibility\n";
        assert!(out.ends_with(expected_tail), "unexpected tail:\n{}", out);
    }

    #[test]
    fn output_ends_with_exactly_one_newline() {
        for input in ["", "a", "a\n", "a\r\n\r\n", "a\n\n\n\n"] {
            let out = rewrite_namespace(input, &target());
            assert!(out.ends_with('\n'));
            assert!(!out.ends_with("\n\n"), "double newline for {:?}", input);
            assert!(!out.contains('\r'));
        }
    }

    #[test]
    fn rerun_appends_a_second_block() {
        let once = rewrite_namespace(UPSTREAM, &target());
        let twice = rewrite_namespace(&once, &target());
        assert_eq!(twice.matches("asm.addEgg({").count(), 2);
        assert_eq!(twice.matches("-- compatibility\n").count(), 2);
        assert!(!twice.contains("\"mobs_monster:"));
    }

    #[tokio::test]
    async fn missing_script_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let err = rewrite_namespace_file(&dir.path().join("init.lua"), &target())
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn file_is_rewritten_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("init.lua");
        tokio::fs::write(&path, UPSTREAM).await.unwrap();

        rewrite_namespace_file(&path, &target()).await.unwrap();

        let text = tokio::fs::read_to_string(&path).await.unwrap();
        assert_eq!(text, rewrite_namespace(UPSTREAM, &target()));
    }
}
