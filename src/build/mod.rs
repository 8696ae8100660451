//! Build-and-report flow
//!
//! Runs the project's build entry point with a fixed target, then surfaces the
//! artifact on success. The external build tool sits behind the [BuildTool]
//! trait so the flow can be exercised without a real toolchain:
//!
//! - [process::ProcessBuildTool]: spawns the entry point as a child process
//! - [mock::MockBuildTool]: returns a canned outcome and counts invocations

pub mod mock;
pub mod process;

pub use mock::MockBuildTool;
pub use process::ProcessBuildTool;

use std::path::{Path, PathBuf};

use crate::config::BuildConfig;
use crate::error::{GitShipError, Result};
use crate::launcher::Launcher;

/// Completion status of one build invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildOutcome {
    Succeeded,
    /// `code` is `None` when the tool was terminated by a signal
    Failed { code: Option<i32> },
}

impl BuildOutcome {
    pub fn from_code(code: Option<i32>) -> Self {
        match code {
            Some(0) => BuildOutcome::Succeeded,
            code => BuildOutcome::Failed { code },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, BuildOutcome::Succeeded)
    }
}

/// Runs a build entry point
pub trait BuildTool: Send + Sync {
    /// Invoke `entry_point` with `target` inside `workdir`, blocking until it exits.
    ///
    /// # Returns
    /// * `Ok(BuildOutcome)` - The tool ran to completion (successfully or not)
    /// * `Err` - The tool could not be started
    fn run(&self, workdir: &Path, entry_point: &Path, target: &str) -> Result<BuildOutcome>;
}

/// What happened to the artifact's location after a successful build
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactOpen {
    /// The build failed, the artifact is missing, or opening is disabled
    NotAttempted,
    Opened(PathBuf),
    /// The opener failed; the build itself still counts as a success
    Failed { location: PathBuf, reason: String },
}

/// Result of a completed build flow
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    pub outcome: BuildOutcome,
    pub artifact: PathBuf,
    pub artifact_exists: bool,
    pub open: ArtifactOpen,
}

/// Directory shown to the user for an artifact: its parent, or the path itself
/// when it has none.
pub fn artifact_location(artifact: &Path) -> PathBuf {
    match artifact.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => artifact.to_path_buf(),
    }
}

/// Runs the build and reports the outcome.
///
/// Fails with [GitShipError::EntryPointMissing] before touching anything when the
/// entry point is absent. On a zero exit code with an existing artifact, the
/// artifact's location is opened exactly once; on a non-zero exit nothing is
/// opened.
pub fn run_build_flow<B, L>(
    workdir: &Path,
    config: &BuildConfig,
    tool: &B,
    launcher: &L,
) -> Result<BuildReport>
where
    B: BuildTool + ?Sized,
    L: Launcher + ?Sized,
{
    let entry_point = workdir.join(&config.entry_point);
    if !entry_point.is_file() {
        return Err(GitShipError::EntryPointMissing(entry_point));
    }

    tracing::debug!(
        entry_point = %entry_point.display(),
        target = %config.target,
        "starting build"
    );
    let outcome = tool.run(workdir, &entry_point, &config.target)?;
    tracing::debug!(?outcome, "build finished");

    let artifact = workdir.join(&config.artifact);

    if !outcome.is_success() {
        return Ok(BuildReport {
            outcome,
            artifact,
            artifact_exists: false,
            open: ArtifactOpen::NotAttempted,
        });
    }

    let artifact_exists = artifact.exists();
    let open = if artifact_exists && config.open_artifact {
        let location = artifact_location(&artifact);
        match launcher.open(&location.to_string_lossy()) {
            Ok(()) => ArtifactOpen::Opened(location),
            Err(e) => {
                tracing::warn!(error = %e, "could not open artifact location");
                ArtifactOpen::Failed {
                    location,
                    reason: e.to_string(),
                }
            }
        }
    } else {
        ArtifactOpen::NotAttempted
    };

    Ok(BuildReport {
        outcome,
        artifact,
        artifact_exists,
        open,
    })
}
