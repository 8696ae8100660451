use std::path::Path;
use std::process::Command;

use crate::build::{BuildOutcome, BuildTool};
use crate::error::{GitShipError, Result};

/// Runs the build entry point as a child process.
///
/// Standard streams are inherited so the build tool's own output reaches the
/// terminal as it runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessBuildTool;

impl ProcessBuildTool {
    /// Builds the command for an entry point.
    ///
    /// Windows batch files go through `cmd /C`. On Unix, an entry point without
    /// the executable bit (common for a freshly cloned `gradlew`) is run by `sh`.
    pub fn command(entry_point: &Path, target: &str) -> Command {
        let mut cmd = if cfg!(windows) {
            let mut cmd = Command::new("cmd");
            cmd.arg("/C").arg(entry_point);
            cmd
        } else if is_executable(entry_point) {
            Command::new(entry_point)
        } else {
            let mut cmd = Command::new("sh");
            cmd.arg(entry_point);
            cmd
        };
        cmd.arg(target);
        cmd
    }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

impl BuildTool for ProcessBuildTool {
    fn run(&self, workdir: &Path, entry_point: &Path, target: &str) -> Result<BuildOutcome> {
        // The child runs inside `workdir`, so a relative entry point would no
        // longer resolve from there.
        let entry_point = if entry_point.is_absolute() {
            entry_point.to_path_buf()
        } else {
            std::env::current_dir()?.join(entry_point)
        };

        let mut cmd = Self::command(&entry_point, target);
        cmd.current_dir(workdir);
        tracing::debug!(?cmd, "spawning build tool");

        let status = cmd.status().map_err(|e| {
            GitShipError::build(format!(
                "Failed to execute {}: {}",
                entry_point.display(),
                e
            ))
        })?;

        Ok(BuildOutcome::from_code(status.code()))
    }
}
