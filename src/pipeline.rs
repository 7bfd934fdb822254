//! `build topology -> render -> post-process`, once per invocation.

use crate::Result;
use crate::artifact::{self, RunStamp};
use crate::cache_buster;
use crate::render::{self, Engine, OutputFormat};
use crate::topology::Diagram;

use anyhow::Context;
use std::path::{Component, Path, PathBuf};

#[derive(Debug, Clone)]
pub struct Options {
    pub output_dir: PathBuf,
    /// File name stem; the timestamp and extension are appended.
    pub name: String,
    pub format: OutputFormat,
    /// Documentation file whose cache-buster should be refreshed.
    pub doc_path: Option<PathBuf>,
    /// Reference to the latest artifact as written in the documentation.
    pub doc_ref: String,
}

impl Options {
    /// Reference string for `<output_dir>/latest.<ext>` with `/` separators,
    /// as it appears in Markdown links.
    pub fn default_doc_ref(output_dir: &Path, format: OutputFormat) -> String {
        let latest = artifact::latest_path(output_dir, format);
        let mut out = String::new();
        for c in latest.components() {
            match c {
                // `./docs/...` is linked as `docs/...`
                Component::CurDir => continue,
                Component::RootDir => {
                    out.push('/');
                    continue;
                }
                _ => {}
            }
            if !out.is_empty() && !out.ends_with('/') {
                out.push('/');
            }
            out.push_str(&c.as_os_str().to_string_lossy());
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocUpdate {
    Skipped,
    Updated { path: PathBuf, replacements: usize },
    /// The document was readable but never mentions the reference.
    NoReference { path: PathBuf, reference: String },
    Failed { path: PathBuf, message: String },
}

#[derive(Debug, Clone)]
pub struct RunReport {
    pub artifact: PathBuf,
    pub latest: PathBuf,
    pub doc_update: DocUpdate,
}

/// Render `diagram` to a fresh timestamped artifact, refresh the `latest`
/// copy and, if configured, the documentation cache-buster.
///
/// Only the documentation step is allowed to fail softly; its outcome is
/// recorded in the report.
pub fn run(
    diagram: &Diagram,
    options: &Options,
    engine: &dyn Engine,
    stamp: RunStamp,
) -> Result<RunReport> {
    artifact::ensure_output_dir(&options.output_dir)?;

    let target = artifact::timestamped_path(&options.output_dir, &options.name, stamp, options.format);
    let dot = render::to_dot(diagram);
    tracing::debug!(
        nodes = diagram.nodes.len(),
        edges = diagram.edges.len(),
        "topology rendered to DOT"
    );

    engine
        .render(&dot, options.format, &target)
        .with_context(|| format!("render {}", target.display()))?;

    let latest = artifact::stabilize(&target, &options.output_dir, options.format)?;

    let doc_update = match &options.doc_path {
        None => DocUpdate::Skipped,
        Some(path) => {
            match cache_buster::update_file(path, &options.doc_ref, &stamp.cache_token()) {
                Ok(0) => DocUpdate::NoReference {
                    path: path.clone(),
                    reference: options.doc_ref.clone(),
                },
                Ok(replacements) => DocUpdate::Updated {
                    path: path.clone(),
                    replacements,
                },
                Err(e) => {
                    tracing::warn!(path = %path.display(), "cache-buster update failed: {:#}", e);
                    DocUpdate::Failed {
                        path: path.clone(),
                        message: format!("{:#}", e),
                    }
                }
            }
        }
    };

    Ok(RunReport {
        artifact: target,
        latest,
        doc_update,
    })
}
