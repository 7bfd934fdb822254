//! External layout engine seam.
//!
//! Layout is never done in-process: DOT is piped into a Graphviz binary which
//! writes the image itself. The `Engine` trait exists so the pipeline can be
//! driven by something other than a real Graphviz install.

use clap::ValueEnum;
use std::ffi::OsString;
use std::fmt;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Png,
    Svg,
    Jpg,
    Pdf,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Svg => "svg",
            OutputFormat::Jpg => "jpg",
            OutputFormat::Pdf => "pdf",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("layout engine `{program}` is not installed")]
    EngineMissing { program: String },

    #[error("layout engine `{program}` failed ({status}): {stderr}")]
    EngineFailed {
        program: String,
        status: String,
        stderr: String,
    },

    #[error("I/O error talking to layout engine `{program}`")]
    Io {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("layout engine reported success but {path} was not written")]
    OutputMissing { path: PathBuf },
}

impl RenderError {
    /// What the user should do about it, when there is something to do.
    pub fn remediation(&self) -> Option<&'static str> {
        match self {
            RenderError::EngineMissing { .. } => Some(
                "install Graphviz (e.g. `apt install graphviz` or `brew install graphviz`) \
                 or point --engine at a `dot` binary",
            ),
            _ => None,
        }
    }
}

pub trait Engine {
    /// Lay out `dot` and write the image to `output`.
    fn render(&self, dot: &str, format: OutputFormat, output: &Path) -> Result<(), RenderError>;
}

/// Graphviz `dot` invoked as a child process.
#[derive(Debug, Clone)]
pub struct Graphviz {
    program: OsString,
}

impl Default for Graphviz {
    fn default() -> Self {
        Self::with_program("dot")
    }
}

impl Graphviz {
    pub fn with_program(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn program_name(&self) -> String {
        self.program.to_string_lossy().into_owned()
    }
}

impl Engine for Graphviz {
    fn render(&self, dot: &str, format: OutputFormat, output: &Path) -> Result<(), RenderError> {
        let program = self.program_name();
        tracing::debug!(%program, %format, output = %output.display(), "spawning layout engine");

        let mut child = match Command::new(&self.program)
            .arg(format!("-T{}", format.extension()))
            .arg("-o")
            .arg(output)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
        {
            Ok(child) => child,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(RenderError::EngineMissing { program });
            }
            Err(source) => return Err(RenderError::Io { program, source }),
        };

        // stdin is fed from its own thread while stderr is drained here, so a
        // chatty engine cannot fill its stderr pipe and stall the write.
        // A write failure usually means the engine died early; its exit
        // status and stderr explain more than the broken pipe does.
        let stdin = child.stdin.take();
        let (write_result, waited) = thread::scope(|s| {
            let writer = s.spawn(move || match stdin {
                Some(mut stdin) => stdin.write_all(dot.as_bytes()),
                None => Ok(()),
            });
            let waited = child.wait_with_output();
            let write_result = writer
                .join()
                .unwrap_or_else(|_| Err(io::Error::other("stdin writer panicked")));
            (write_result, waited)
        });

        let out = waited.map_err(|source| RenderError::Io {
            program: program.clone(),
            source,
        })?;

        if !out.status.success() {
            return Err(RenderError::EngineFailed {
                program,
                status: out.status.to_string(),
                stderr: String::from_utf8_lossy(&out.stderr).trim().to_string(),
            });
        }
        write_result.map_err(|source| RenderError::Io {
            program: program.clone(),
            source,
        })?;

        if !output.exists() {
            return Err(RenderError::OutputMissing {
                path: output.to_path_buf(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_program_is_reported_with_remediation() {
        let dir = tempfile::tempdir().unwrap();
        let engine = Graphviz::with_program("archdiagram-no-such-layout-engine");
        let err = engine
            .render("digraph {}", OutputFormat::Png, &dir.path().join("x.png"))
            .unwrap_err();

        assert!(matches!(err, RenderError::EngineMissing { .. }), "{err:?}");
        assert!(err.remediation().unwrap().contains("Graphviz"));
    }

    #[cfg(unix)]
    #[test]
    fn failing_program_reports_status() {
        let dir = tempfile::tempdir().unwrap();
        let engine = Graphviz::with_program("false");
        let err = engine
            .render("digraph {}", OutputFormat::Svg, &dir.path().join("x.svg"))
            .unwrap_err();

        assert!(matches!(err, RenderError::EngineFailed { .. }), "{err:?}");
        assert!(err.remediation().is_none());
    }

    #[cfg(unix)]
    #[test]
    fn large_input_to_dying_engine_does_not_hang() {
        let dir = tempfile::tempdir().unwrap();
        let dot = format!("digraph {{ {} }}", "a -> b; ".repeat(256 * 1024));
        let err = Graphviz::with_program("false")
            .render(&dot, OutputFormat::Png, &dir.path().join("x.png"))
            .unwrap_err();
        assert!(matches!(err, RenderError::EngineFailed { .. }), "{err:?}");
    }

    #[cfg(unix)]
    #[test]
    fn success_without_output_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("never-written.png");
        let err = Graphviz::with_program("true")
            .render("digraph {}", OutputFormat::Png, &target)
            .unwrap_err();

        match &err {
            RenderError::OutputMissing { path } => assert_eq!(path, &target),
            other => panic!("expected OutputMissing, got {other:?}"),
        }
        assert!(err.to_string().contains("never-written.png"));
    }

    #[test]
    fn default_engine_is_dot() {
        assert_eq!(Graphviz::default().program_name(), "dot");
    }

    #[test]
    fn extensions() {
        assert_eq!(OutputFormat::Png.extension(), "png");
        assert_eq!(OutputFormat::Jpg.to_string(), "jpg");
    }
}
