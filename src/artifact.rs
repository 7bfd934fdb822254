//! Output artifacts: timestamped file names, the output directory and the
//! stable `latest.<ext>` copy that documentation links to.

use crate::Result;
use crate::render::OutputFormat;

use anyhow::{Context, bail};
use chrono::{DateTime, Local, NaiveDateTime};
use std::fs;
use std::path::{Path, PathBuf};

/// The instant a run started. Captured once so the artifact name and the
/// cache-buster token agree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunStamp(NaiveDateTime);

impl RunStamp {
    pub fn now() -> Self {
        Self::from_local(Local::now())
    }

    pub fn from_local(at: DateTime<Local>) -> Self {
        Self(at.naive_local())
    }

    pub fn from_naive(at: NaiveDateTime) -> Self {
        Self(at)
    }

    /// `YYYYMMDD_HHMMSS`, used in artifact file names.
    pub fn file_suffix(&self) -> String {
        self.0.format("%Y%m%d_%H%M%S").to_string()
    }

    /// `YYYYMMDDHHMMSS`, used as the `?v=` cache-buster value.
    pub fn cache_token(&self) -> String {
        self.0.format("%Y%m%d%H%M%S").to_string()
    }
}

/// `<dir>/<name>-<YYYYMMDD_HHMMSS>.<ext>`
pub fn timestamped_path(dir: &Path, name: &str, stamp: RunStamp, format: OutputFormat) -> PathBuf {
    dir.join(format!(
        "{}-{}.{}",
        name,
        stamp.file_suffix(),
        format.extension()
    ))
}

/// `<dir>/latest.<ext>`
pub fn latest_path(dir: &Path, format: OutputFormat) -> PathBuf {
    dir.join(format!("latest.{}", format.extension()))
}

pub fn ensure_output_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("create output directory {}", dir.display()))
}

/// Copy `source` to `<dir>/latest.<ext>` and return the copy's path.
pub fn stabilize(source: &Path, dir: &Path, format: OutputFormat) -> Result<PathBuf> {
    if !source.is_file() {
        bail!(
            "cannot update latest copy: rendered artifact {} does not exist",
            source.display()
        );
    }
    let latest = latest_path(dir, format);
    fs::copy(source, &latest)
        .with_context(|| format!("copy {} to {}", source.display(), latest.display()))?;
    tracing::debug!(from = %source.display(), to = %latest.display(), "latest copy updated");
    Ok(latest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn stamp() -> RunStamp {
        let at = NaiveDate::from_ymd_opt(2025, 8, 6)
            .unwrap()
            .and_hms_opt(15, 9, 50)
            .unwrap();
        RunStamp::from_naive(at)
    }

    #[test]
    fn stamp_formats() {
        assert_eq!(stamp().file_suffix(), "20250806_150950");
        assert_eq!(stamp().cache_token(), "20250806150950");
    }

    #[test]
    fn timestamped_name() {
        let p = timestamped_path(Path::new("out"), "arch", stamp(), OutputFormat::Png);
        assert_eq!(p, Path::new("out").join("arch-20250806_150950.png"));
    }

    #[test]
    fn stabilize_copies_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("arch-20250806_150950.svg");
        fs::write(&src, b"<svg/>").unwrap();

        let latest = stabilize(&src, dir.path(), OutputFormat::Svg).unwrap();
        assert_eq!(latest, dir.path().join("latest.svg"));
        assert_eq!(fs::read(&latest).unwrap(), b"<svg/>");
    }

    #[test]
    fn stabilize_missing_source_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = stabilize(&dir.path().join("gone.png"), dir.path(), OutputFormat::Png)
            .unwrap_err();
        assert!(err.to_string().contains("does not exist"));
        assert!(!dir.path().join("latest.png").exists());
    }

    #[test]
    fn ensure_output_dir_is_recursive() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("docs/architecture/diagrams");
        ensure_output_dir(&nested).unwrap();
        ensure_output_dir(&nested).unwrap();
        assert!(nested.is_dir());
    }
}
