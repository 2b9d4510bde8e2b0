//! External tool capabilities.
//!
//! The doc generator and package installer are external programs. The
//! pipeline sees them only through narrow traits: a config in, success or
//! failure out, artifacts on disk. Nothing here inspects their output.

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::info;

/// Error invoking an external tool.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{program}' failed: {status}")]
    Failed {
        program: String,
        status: std::process::ExitStatus,
    },
}

/// Log verbosity passed through to external tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Verbose,
    Warning,
}

impl LogLevel {
    #[must_use]
    pub fn as_arg(self) -> &'static str {
        match self {
            Self::Verbose => "verbose",
            Self::Warning => "warning",
        }
    }
}

/// The external documentation generator.
pub trait DocGenerator {
    /// Extract API metadata per the given config.
    fn extract_metadata(&self, config: &Path, log_level: LogLevel) -> Result<(), ToolError>;

    /// Compile the static site per the given config and xref maps.
    fn build_site(
        &self,
        config: &Path,
        xref_maps: &[PathBuf],
        log_level: LogLevel,
    ) -> Result<(), ToolError>;
}

/// The external package installer.
pub trait PackageInstaller {
    /// Download the named packages into `dest`.
    fn install(&self, package_ids: &[String], dest: &Path) -> Result<(), ToolError>;
}

/// [`DocGenerator`] backed by a command-line program
/// (`<program> metadata|build <config> ...`).
pub struct CommandGenerator {
    program: String,
}

impl CommandGenerator {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl DocGenerator for CommandGenerator {
    fn extract_metadata(&self, config: &Path, log_level: LogLevel) -> Result<(), ToolError> {
        let mut cmd = Command::new(&self.program);
        cmd.arg("metadata")
            .arg(config)
            .args(["--log-level", log_level.as_arg()]);
        run(&self.program, &mut cmd)
    }

    fn build_site(
        &self,
        config: &Path,
        xref_maps: &[PathBuf],
        log_level: LogLevel,
    ) -> Result<(), ToolError> {
        let mut cmd = Command::new(&self.program);
        cmd.arg("build")
            .arg(config)
            .args(["--log-level", log_level.as_arg()]);
        for map in xref_maps {
            cmd.arg("--xrefmap").arg(map);
        }
        run(&self.program, &mut cmd)
    }
}

/// [`PackageInstaller`] backed by a command-line program
/// (`<program> install <ids>... --output <dest>`).
pub struct CommandInstaller {
    program: String,
}

impl CommandInstaller {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl PackageInstaller for CommandInstaller {
    fn install(&self, package_ids: &[String], dest: &Path) -> Result<(), ToolError> {
        let mut cmd = Command::new(&self.program);
        cmd.arg("install")
            .args(package_ids)
            .arg("--output")
            .arg(dest);
        run(&self.program, &mut cmd)
    }
}

fn run(program: &str, cmd: &mut Command) -> Result<(), ToolError> {
    info!(program, args = ?cmd.get_args().collect::<Vec<_>>(), "invoking tool");
    let status = cmd.status().map_err(|source| ToolError::Spawn {
        program: program.to_owned(),
        source,
    })?;
    if status.success() {
        Ok(())
    } else {
        Err(ToolError::Failed {
            program: program.to_owned(),
            status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn successful_tool_reports_ok() {
        let generator = CommandGenerator::new("true");

        generator
            .extract_metadata(Path::new("docgen.json"), LogLevel::Verbose)
            .unwrap();
    }

    #[test]
    fn failing_tool_reports_exit_status() {
        let generator = CommandGenerator::new("false");

        let err = generator
            .extract_metadata(Path::new("docgen.json"), LogLevel::Verbose)
            .unwrap_err();
        assert!(matches!(err, ToolError::Failed { .. }));
    }

    #[test]
    fn missing_tool_reports_spawn_error() {
        let installer = CommandInstaller::new("docship-no-such-tool");

        let err = installer
            .install(&["Pkg".to_owned()], Path::new("packages"))
            .unwrap_err();
        assert!(matches!(err, ToolError::Spawn { .. }));
    }
}
