//! Pure formatting functions for UI output.
//!
//! This module contains all display/formatting logic separated from user interaction.
//! Functions here only print; the `render_*` helpers return the text so it can be tested.

use console::style;

use crate::build::{ArtifactOpen, BuildOutcome, BuildReport};
use crate::hints::FailureHint;
use crate::sync::{SyncPlan, SyncReport};

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Format and print a non-fatal warning.
pub fn display_warning(message: &str) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), message);
}

/// Explains a missing build entry point and where to run from.
pub fn display_entry_point_missing(entry_point: &str) {
    display_error(&format!("{} not found in the current directory", entry_point));
    eprintln!("  Run this command from the project root, next to {}.", entry_point);
}

/// Lines describing a finished build.
pub fn render_build_report(report: &BuildReport) -> Vec<String> {
    match report.outcome {
        BuildOutcome::Succeeded => {
            let mut lines = vec![
                "Build completed successfully".to_string(),
                format!("Artifact: {}", report.artifact.display()),
            ];
            if !report.artifact_exists {
                lines.push("Artifact was not found at the expected path".to_string());
            }
            lines
        }
        BuildOutcome::Failed { code } => {
            let mut lines = vec![match code {
                Some(code) => format!("Build failed with exit code {}", code),
                None => "Build was terminated before finishing".to_string(),
            }];
            lines.push("Check the build output above for errors".to_string());
            lines
        }
    }
}

/// Display the outcome of a build.
pub fn display_build_report(report: &BuildReport) {
    let lines = render_build_report(report);
    if report.outcome.is_success() {
        println!();
        display_success(&lines[0]);
        for line in &lines[1..] {
            display_status(line);
        }
        match &report.open {
            ArtifactOpen::Opened(location) => {
                display_status(&format!("Opened {}", location.display()))
            }
            ArtifactOpen::Failed { location, reason } => display_warning(&format!(
                "Could not open {}: {}",
                location.display(),
                reason
            )),
            ArtifactOpen::NotAttempted => {}
        }
    } else {
        println!();
        display_error(&lines[0]);
        for line in &lines[1..] {
            eprintln!("  {}", line);
        }
    }
}

/// Display what a sync would do without doing it.
pub fn display_sync_plan(plan: &SyncPlan) {
    println!("\n{}", style("Dry run, nothing will be changed:").bold());
    display_success("  Step 1: stage all changes");
    display_success(&format!("  Step 2: commit \"{}\"", plan.message));
    display_success(&format!("  Step 3: force branch name to '{}'", plan.branch));
    display_success(&format!(
        "  Step 4: set remote '{}' to {}",
        plan.remote, plan.remote_url
    ));
    display_success(&format!(
        "  Step 5: force push '{}' to '{}'",
        plan.branch, plan.remote
    ));
}

/// Display follow-up instructions after a successful sync.
pub fn display_sync_followup(report: &SyncReport, status_url: Option<&str>) {
    let short = &report.commit[..report.commit.len().min(7)];
    println!(
        "\n{} Pushed {} to {}/{} ({})\n",
        style("✓").green(),
        short,
        report.remote,
        report.branch,
        report.remote_url
    );
    if let Some(url) = status_url {
        display_status("Check the build status at:");
        println!("  {}", style(url).cyan());
        println!("  or run `git-ship status`");
    }
}

/// Lines listing the likely causes of a failed push, most likely first.
pub fn render_failure_hints(hints: &[FailureHint]) -> Vec<String> {
    hints
        .iter()
        .enumerate()
        .map(|(i, hint)| format!("{}. {}: {}", i + 1, hint, hint.remedy()))
        .collect()
}

/// Display the likely causes of a failed push.
pub fn display_failure_hints(hints: &[FailureHint]) {
    eprintln!("\n{}", style("Possible causes:").bold());
    for line in render_failure_hints(hints) {
        eprintln!("  {}", line);
    }
}

/// Display the manual command to retry a push.
pub fn display_manual_push_instruction(remote: &str, branch: &str) {
    println!(
        "\n{} The commit is kept locally. To push it later, run:\n  {}",
        style("→").yellow(),
        style(format!("git push -u -f {} {}", remote, branch)).cyan()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn report(outcome: BuildOutcome, artifact_exists: bool) -> BuildReport {
        BuildReport {
            outcome,
            artifact: PathBuf::from("app/build/outputs/apk/debug/app-debug.apk"),
            artifact_exists,
            open: ArtifactOpen::NotAttempted,
        }
    }

    #[test]
    fn test_render_success_report() {
        let lines = render_build_report(&report(BuildOutcome::Succeeded, true));
        assert_eq!(lines[0], "Build completed successfully");
        assert!(lines[1].contains("app-debug.apk"));
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn test_render_success_without_artifact() {
        let lines = render_build_report(&report(BuildOutcome::Succeeded, false));
        assert!(lines.last().unwrap().contains("not found"));
    }

    #[test]
    fn test_render_failure_report() {
        let lines = render_build_report(&report(BuildOutcome::Failed { code: Some(1) }, false));
        assert_eq!(lines[0], "Build failed with exit code 1");
        assert!(lines[1].contains("output above"));
    }

    #[test]
    fn test_render_failure_hints_numbered() {
        let lines = render_failure_hints(&FailureHint::ALL);
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("1. Authentication failed"));
        assert!(lines[2].starts_with("3. Network connection problem"));
    }

    #[test]
    fn test_display_functions_do_not_panic() {
        display_error("test error");
        display_success("test success");
        display_status("test status");
        display_warning("test warning");
    }
}
