//! Remote-sync flow: stage, commit, force the branch name, point the remote at
//! the derived URL, and force-push.

use std::sync::OnceLock;

use regex::Regex;

use crate::config::{render_template, SyncConfig};
use crate::error::{GitShipError, Result};
use crate::git::Repository;

/// GitHub account names: alphanumerics and single inner hyphens.
fn username_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9](?:[A-Za-z0-9]|-[A-Za-z0-9]){0,38}$")
            .expect("username pattern is a valid regex")
    })
}

/// Trims and validates a username.
///
/// # Returns
/// * `Ok(String)` - The trimmed username
/// * `Err(EmptyUsername)` - If nothing but whitespace was given
/// * `Err(InvalidUsername)` - If the name cannot be a GitHub account
pub fn validate_username(input: &str) -> Result<String> {
    let username = input.trim();
    if username.is_empty() {
        return Err(GitShipError::EmptyUsername);
    }
    if username.len() > 39 || !username_pattern().is_match(username) {
        return Err(GitShipError::InvalidUsername(username.to_string()));
    }
    Ok(username.to_string())
}

/// Everything a sync will do, resolved before any repository operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncPlan {
    pub username: String,
    pub repository: String,
    pub message: String,
    pub branch: String,
    pub remote: String,
    pub remote_url: String,
}

impl SyncPlan {
    /// Validates the input and renders the message and remote URL.
    ///
    /// `message` overrides the configured commit message template.
    pub fn resolve(
        username: &str,
        repository: &str,
        message: Option<&str>,
        config: &SyncConfig,
    ) -> Result<Self> {
        let username = validate_username(username)?;

        let repository = repository.trim();
        if repository.is_empty() {
            return Err(GitShipError::config("Repository name must not be empty"));
        }

        let template = message.unwrap_or(config.commit_message.as_str());
        let message = render_template(template, &username, repository);
        if message.trim().is_empty() {
            return Err(GitShipError::config("Commit message must not be empty"));
        }

        if config.branch.trim().is_empty() || config.remote.trim().is_empty() {
            return Err(GitShipError::config(
                "sync.branch and sync.remote must not be empty",
            ));
        }

        Ok(SyncPlan {
            remote_url: render_template(&config.url_template, &username, repository),
            username,
            repository: repository.to_string(),
            message,
            branch: config.branch.clone(),
            remote: config.remote.clone(),
        })
    }
}

/// Result of a completed sync
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub commit: String,
    pub branch: String,
    pub remote: String,
    pub remote_url: String,
}

/// Failure after the local commit was created
#[derive(Debug)]
pub struct PushFailure {
    /// The commit that stays in the local repository
    pub commit: String,
    pub error: GitShipError,
}

/// Runs the sync steps in order against `repo`.
///
/// The commit always precedes the push, and a failing step stops the flow. A
/// push failure is returned as [SyncError::Push] carrying the commit that was
/// already created; nothing is rolled back.
pub fn run_sync_flow<R>(plan: &SyncPlan, repo: &R) -> std::result::Result<SyncReport, SyncError>
where
    R: Repository + ?Sized,
{
    tracing::debug!(remote_url = %plan.remote_url, branch = %plan.branch, "starting sync");

    repo.stage_all()?;
    let commit = repo.commit(&plan.message)?;
    repo.force_branch_name(&plan.branch)?;
    repo.set_remote_url(&plan.remote, &plan.remote_url)?;

    if let Err(error) = repo.force_push(&plan.remote, &plan.branch) {
        return Err(SyncError::Push(PushFailure { commit, error }));
    }

    Ok(SyncReport {
        commit,
        branch: plan.branch.clone(),
        remote: plan.remote.clone(),
        remote_url: plan.remote_url.clone(),
    })
}

/// Why a sync stopped
#[derive(Debug)]
pub enum SyncError {
    /// A local step failed before anything was pushed
    Local(GitShipError),
    Push(PushFailure),
}

impl From<GitShipError> for SyncError {
    fn from(error: GitShipError) -> Self {
        SyncError::Local(error)
    }
}

impl std::fmt::Display for SyncError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncError::Local(error) => write!(f, "{}", error),
            SyncError::Push(failure) => write!(
                f,
                "{} (local commit {} kept)",
                failure.error,
                &failure.commit[..failure.commit.len().min(7)]
            ),
        }
    }
}

impl std::error::Error for SyncError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::{MockRepository, RepoOperation};

    fn plan(username: &str) -> Result<SyncPlan> {
        SyncPlan::resolve(username, "VoiceLedger", None, &SyncConfig::default())
    }

    #[test]
    fn test_validate_username() {
        assert_eq!(validate_username("  octocat \n").unwrap(), "octocat");
        assert_eq!(validate_username("a-b-c").unwrap(), "a-b-c");
        assert!(matches!(
            validate_username("   "),
            Err(GitShipError::EmptyUsername)
        ));
        let too_long = "a".repeat(40);
        let spaced_out = "a-".repeat(20) + "a";
        for bad in [
            "-lead",
            "trail-",
            "dou--ble",
            "sp ace",
            "slash/name",
            too_long.as_str(),
            spaced_out.as_str(),
        ] {
            assert!(
                matches!(validate_username(bad), Err(GitShipError::InvalidUsername(_))),
                "{} should be rejected",
                bad
            );
        }
        assert!(validate_username(&"a".repeat(39)).is_ok());
    }

    #[test]
    fn test_plan_renders_templates() {
        let config = SyncConfig {
            commit_message: "Sync {repository} for {username}".to_string(),
            ..SyncConfig::default()
        };
        let plan = SyncPlan::resolve("octocat", "VoiceLedger", None, &config).unwrap();

        assert_eq!(plan.message, "Sync VoiceLedger for octocat");
        assert_eq!(
            plan.remote_url,
            "https://github.com/octocat/VoiceLedger.git"
        );
        assert_eq!(plan.branch, "main");
        assert_eq!(plan.remote, "origin");
    }

    #[test]
    fn test_message_override() {
        let plan =
            SyncPlan::resolve("octocat", "Repo", Some("wip"), &SyncConfig::default()).unwrap();
        assert_eq!(plan.message, "wip");
    }

    #[test]
    fn test_empty_message_rejected() {
        let result = SyncPlan::resolve("octocat", "Repo", Some("  "), &SyncConfig::default());
        assert!(matches!(result, Err(GitShipError::Config(_))));
    }

    #[test]
    fn test_empty_username_never_touches_repository() {
        let repo = MockRepository::new();

        let result = plan("").and_then(|plan| {
            run_sync_flow(&plan, &repo).map_err(|_| GitShipError::remote("unreachable"))
        });

        assert!(matches!(result, Err(GitShipError::EmptyUsername)));
        assert!(repo.operations().is_empty());
    }

    #[test]
    fn test_successful_sync_commits_once_then_pushes_once() {
        let repo = MockRepository::new();
        let plan = plan("octocat").unwrap();

        let report = run_sync_flow(&plan, &repo).unwrap();

        let ops = repo.operations();
        assert_eq!(
            ops,
            vec![
                RepoOperation::StageAll,
                RepoOperation::Commit {
                    message: plan.message.clone(),
                    id: report.commit.clone(),
                },
                RepoOperation::ForceBranchName("main".to_string()),
                RepoOperation::SetRemoteUrl {
                    remote: "origin".to_string(),
                    url: "https://github.com/octocat/VoiceLedger.git".to_string(),
                },
                RepoOperation::ForcePush {
                    remote: "origin".to_string(),
                    branch: "main".to_string(),
                },
            ]
        );
        assert_eq!(repo.commits().len(), 1);
        assert_eq!(repo.push_count(), 1);
    }

    #[test]
    fn test_repeated_sync_creates_independent_commits() {
        let repo = MockRepository::new();
        let plan = plan("octocat").unwrap();

        let first = run_sync_flow(&plan, &repo).unwrap();
        let second = run_sync_flow(&plan, &repo).unwrap();

        assert_ne!(first.commit, second.commit);
        assert_eq!(repo.commits().len(), 2);
        assert_eq!(repo.push_count(), 2);
    }

    #[test]
    fn test_push_failure_keeps_commit() {
        let repo = MockRepository::with_push_error("Authentication failed during push");
        let plan = plan("octocat").unwrap();

        let err = run_sync_flow(&plan, &repo).unwrap_err();

        match err {
            SyncError::Push(failure) => {
                assert_eq!(repo.commits(), vec![failure.commit.clone()]);
                assert!(matches!(failure.error, GitShipError::Remote(_)));
            }
            other => panic!("expected push failure, got {:?}", other),
        }
    }

    #[test]
    fn test_commit_failure_stops_before_push() {
        let repo = MockRepository::with_commit_error("failed to write tree");
        let plan = plan("octocat").unwrap();

        let err = run_sync_flow(&plan, &repo).unwrap_err();

        assert!(matches!(err, SyncError::Local(GitShipError::Git(_))));
        assert_eq!(repo.operations(), vec![RepoOperation::StageAll]);
        assert_eq!(repo.push_count(), 0);
    }

    #[test]
    fn test_push_failure_display_mentions_kept_commit() {
        let err = SyncError::Push(PushFailure {
            commit: "0123456789abcdef".to_string(),
            error: GitShipError::remote("rejected"),
        });
        assert_eq!(
            err.to_string(),
            "Remote operation failed: rejected (local commit 0123456 kept)"
        );
    }
}
