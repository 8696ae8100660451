//! Main workflow orchestration logic
//!
//! Each workflow resolves its inputs, runs one flow and reports the outcome to
//! the terminal. They return the process exit code instead of exiting so they
//! can be driven programmatically without depending on clap.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::build::{run_build_flow, BuildOutcome, BuildTool};
use crate::config::Config;
use crate::error::GitShipError;
use crate::git::{discover_workdir, Repository};
use crate::hints::FailureHint;
use crate::launcher::Launcher;
use crate::status;
use crate::sync::{run_sync_flow, SyncError, SyncPlan};
use crate::ui;

/// Exit code for precondition and sync failures
pub const EXIT_FAILURE: i32 = 1;

/// Arguments for the build workflow
#[derive(Debug, Clone, PartialEq)]
pub struct BuildWorkflowArgs {
    /// Directory containing the build entry point
    pub dir: PathBuf,

    /// Open the artifact location after a successful build
    pub open: bool,
}

/// Arguments for the sync workflow
#[derive(Debug, Clone, PartialEq)]
pub struct SyncWorkflowArgs {
    /// Directory inside the repository being synced
    pub dir: PathBuf,

    /// Username given on the command line
    pub username: Option<String>,

    /// Commit message overriding the configured template
    pub message: Option<String>,

    /// Preview mode - print the plan and touch nothing
    pub dry_run: bool,
}

/// Arguments for the status workflow
#[derive(Debug, Clone, PartialEq)]
pub struct StatusWorkflowArgs {
    pub dir: PathBuf,
    pub username: Option<String>,

    /// Print the URL instead of opening it
    pub print_only: bool,
}

/// Picks the username from the command line, then the config, then the prompt.
fn resolve_username<P>(given: Option<&str>, configured: &str, prompt: P) -> Result<String>
where
    P: FnOnce() -> Result<String>,
{
    match given {
        Some(name) => Ok(name.to_string()),
        None if !configured.trim().is_empty() => Ok(configured.to_string()),
        None => prompt(),
    }
}

/// Work tree root containing `dir`, or `dir` itself outside a repository.
///
/// The default repository name comes from this directory, so running from a
/// subdirectory still targets the project's own remote.
fn project_root(dir: &Path) -> PathBuf {
    discover_workdir(dir).unwrap_or_else(|| dir.to_path_buf())
}

fn report_precondition(error: &GitShipError) -> i32 {
    match error {
        GitShipError::EmptyUsername => {
            ui::display_error("Username is required");
        }
        GitShipError::InvalidUsername(name) => {
            ui::display_error(&format!("'{}' is not a valid GitHub username", name));
        }
        other => ui::display_error(&other.to_string()),
    }
    EXIT_FAILURE
}

/// Prints `error` and returns its exit code.
///
/// Bad input gets the precondition message; anything else is an external
/// failure and is followed by `next_step`.
fn report_failure(error: &GitShipError, next_step: &str) -> i32 {
    if error.is_precondition() {
        return report_precondition(error);
    }

    ui::display_error(&error.to_string());
    ui::display_status(next_step);
    EXIT_FAILURE
}

/// Build workflow
///
/// Runs the build and prints one of the two fixed outcomes.
///
/// # Returns
/// The exit code: `0` on success, the build tool's own code when it failed,
/// `1` for a missing entry point.
pub fn run_build_workflow<B, L>(
    args: &BuildWorkflowArgs,
    config: &Config,
    tool: &B,
    launcher: &L,
) -> Result<i32>
where
    B: BuildTool + ?Sized,
    L: Launcher + ?Sized,
{
    let mut build_config = config.build.clone();
    build_config.open_artifact &= args.open;

    ui::display_status(&format!(
        "Running {} {}",
        build_config.entry_point, build_config.target
    ));

    let report = match run_build_flow(&args.dir, &build_config, tool, launcher) {
        Ok(report) => report,
        Err(GitShipError::EntryPointMissing(_)) => {
            ui::display_entry_point_missing(&build_config.entry_point);
            return Ok(EXIT_FAILURE);
        }
        Err(e) => {
            let hint = "Check that the build tool can run from the project directory";
            return Ok(report_failure(&e, hint));
        }
    };

    ui::display_build_report(&report);

    Ok(match report.outcome {
        BuildOutcome::Succeeded => 0,
        BuildOutcome::Failed { code: Some(code) } if code != 0 => code,
        BuildOutcome::Failed { .. } => EXIT_FAILURE,
    })
}

/// Sync workflow
///
/// Orchestrates the remote sync:
/// 1. Resolve and validate the username (prompting when needed)
/// 2. Render the commit message and remote URL
/// 3. Open the repository with `open_repo`
/// 4. Stage, commit, set branch and remote, force push
/// 5. Print follow-up instructions or the likely causes of failure
///
/// The repository is only opened after the plan is valid and `--dry-run` has
/// been handled, so nothing is staged when the username is empty or invalid.
pub fn run_sync_workflow<R, O, P>(
    args: &SyncWorkflowArgs,
    config: &Config,
    open_repo: O,
    prompt: P,
) -> Result<i32>
where
    R: Repository,
    O: FnOnce(&Path) -> crate::error::Result<R>,
    P: FnOnce() -> Result<String>,
{
    let username = resolve_username(args.username.as_deref(), &config.sync.username, prompt)?;
    let root = project_root(&args.dir);

    let plan = match config.sync.repository_name(&root).and_then(|repository| {
        SyncPlan::resolve(
            &username,
            &repository,
            args.message.as_deref(),
            &config.sync,
        )
    }) {
        Ok(plan) => plan,
        Err(e) => return Ok(report_precondition(&e)),
    };

    if args.dry_run {
        ui::display_sync_plan(&plan);
        return Ok(0);
    }

    let repo = match open_repo(&root) {
        Ok(repo) => repo,
        Err(e) => {
            ui::display_error(&format!("Git repository error: {}", e));
            ui::display_status("Run `git init` in the project root first");
            return Ok(EXIT_FAILURE);
        }
    };

    ui::display_status(&format!("Pushing to {}", plan.remote_url));

    match run_sync_flow(&plan, &repo) {
        Ok(report) => {
            let status_url =
                status::status_page_url(&config.status, &plan.username, &plan.repository).ok();
            ui::display_sync_followup(&report, status_url.as_deref());
            Ok(0)
        }
        Err(SyncError::Local(e)) => {
            ui::display_error(&format!("Sync stopped before pushing: {}", e));
            Ok(EXIT_FAILURE)
        }
        Err(SyncError::Push(failure)) => {
            ui::display_error(&format!("Push failed: {}", failure.error));
            ui::display_failure_hints(&FailureHint::ranked(&failure.error.to_string()));
            ui::display_manual_push_instruction(&plan.remote, &plan.branch);
            Ok(EXIT_FAILURE)
        }
    }
}

/// Status workflow
///
/// Opens (or prints) the CI status page for the configured repository.
pub fn run_status_workflow<L, P>(
    args: &StatusWorkflowArgs,
    config: &Config,
    launcher: &L,
    prompt: P,
) -> Result<i32>
where
    L: Launcher + ?Sized,
    P: FnOnce() -> Result<String>,
{
    let username = resolve_username(args.username.as_deref(), &config.sync.username, prompt)?;
    let repository = match config.sync.repository_name(&project_root(&args.dir)) {
        Ok(repository) => repository,
        Err(e) => return Ok(report_precondition(&e)),
    };

    if args.print_only {
        return Ok(
            match status::status_page_url(&config.status, &username, &repository) {
                Ok(url) => {
                    println!("{}", url);
                    0
                }
                Err(e) => report_precondition(&e),
            },
        );
    }

    match status::open_status_page(&config.status, &username, &repository, launcher) {
        Ok(url) => {
            ui::display_success(&format!("Opened {}", url));
            Ok(0)
        }
        Err(e) => Ok(report_failure(&e, "Open the page manually in your browser")),
    }
}
