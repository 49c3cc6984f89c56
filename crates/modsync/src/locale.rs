//! Translation template generation
//!
//! Strings wrapped in the translator call `S("...")` are collected in the
//! order they appear and written as untranslated `<string>=` entries under a
//! `# textdomain:` header.

use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;
use tracing::{debug, info};

use crate::error::Result;
use crate::fetch::files::ensure_dir;
use crate::text::{read_required, write_text};

/// `S("...")` with a literal free of embedded quotes, on a single line.
/// Any `S(` counts, including the tail of a longer name such as `_S(`.
static MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"S\("([^"\n]*)"\)"#).expect("translation marker pattern is valid"));

/// Literal payloads of every translation marker, left to right
///
/// Duplicates are kept. The iterator is lazy and can be recreated at will
/// since it only borrows the text.
pub fn translatable_strings(text: &str) -> impl Iterator<Item = &str> {
    MARKER
        .captures_iter(text)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
}

/// Render a translation template, or `None` when there is nothing to translate
pub fn render_template<'a, I>(domain: &str, strings: I) -> Option<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut strings = strings.into_iter().peekable();
    strings.peek()?;

    let mut out = format!("# textdomain:{}\n\n", domain);
    for s in strings {
        out.push_str(s);
        out.push_str("=\n");
    }
    Some(out)
}

/// Regenerate the template at `template` from the script at `source`
///
/// The template directory is created even when nothing is extracted. With
/// no strings found an existing template is left as it is. Returns the
/// number of entries written.
pub async fn extract_locale(source: &Path, template: &Path, domain: &str) -> Result<usize> {
    info!("updating localization template ...");

    if let Some(parent) = template.parent() {
        ensure_dir(parent).await?;
    }

    let text = read_required(source, "extract translatable strings").await?;
    let count = translatable_strings(&text).count();

    match render_template(domain, translatable_strings(&text)) {
        Some(rendered) => {
            write_text(template, &rendered).await?;
            debug!("Wrote {} entries to {}", count, template.display());
        }
        None => debug!("No translatable strings in {}", source.display()),
    }
    Ok(count)
}
