//! Cache-buster maintenance for documentation that embeds the latest diagram.
//!
//! A reference looks like `docs/architecture/diagrams/latest.png`, optionally
//! followed by `?v=<digits>`. Every occurrence is rewritten to carry the new
//! token, so repeated runs replace the value instead of stacking parameters.

use crate::Result;

use anyhow::Context;
use regex::{NoExpand, Regex};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    pub text: String,
    pub replacements: usize,
}

/// Rewrite every `reference[?v=digits]` in `text` to `reference?v=<token>`.
pub fn rewrite(text: &str, reference: &str, token: &str) -> Result<Rewrite> {
    let re = Regex::new(&format!(r"{}(\?v=\d+)?", regex::escape(reference)))?;
    let replacements = re.find_iter(text).count();
    let replacement = format!("{}?v={}", reference, token);
    let text = re.replace_all(text, NoExpand(&replacement)).into_owned();
    Ok(Rewrite { text, replacements })
}

/// Apply [`rewrite`] to a file in place. Returns the number of references
/// updated; the file is left untouched when there are none.
pub fn update_file(path: &Path, reference: &str, token: &str) -> Result<usize> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("read documentation file {}", path.display()))?;

    let out = rewrite(&text, reference, token)?;
    if out.replacements == 0 {
        tracing::warn!(
            path = %path.display(),
            reference,
            "no diagram reference found; nothing to update"
        );
        return Ok(0);
    }

    if out.text != text {
        fs::write(path, &out.text)
            .with_context(|| format!("write documentation file {}", path.display()))?;
    }
    Ok(out.replacements)
}
