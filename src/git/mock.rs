use std::sync::Mutex;

use crate::error::{GitShipError, Result};
use crate::git::Repository;

/// One call made against a [MockRepository]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoOperation {
    StageAll,
    Commit { message: String, id: String },
    ForceBranchName(String),
    SetRemoteUrl { remote: String, url: String },
    ForcePush { remote: String, branch: String },
}

/// Mock repository for testing without actual git operations
#[derive(Default)]
pub struct MockRepository {
    operations: Mutex<Vec<RepoOperation>>,
    commit_error: Option<String>,
    push_error: Option<String>,
}

impl MockRepository {
    /// Create a new mock repository whose operations all succeed
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every commit fail with `message`; nothing is recorded for it
    pub fn with_commit_error(message: impl Into<String>) -> Self {
        MockRepository {
            commit_error: Some(message.into()),
            ..Self::default()
        }
    }

    /// Make every push fail with a remote error carrying `message`
    pub fn with_push_error(message: impl Into<String>) -> Self {
        MockRepository {
            push_error: Some(message.into()),
            ..Self::default()
        }
    }

    /// Every operation recorded so far, in call order
    pub fn operations(&self) -> Vec<RepoOperation> {
        self.operations
            .lock()
            .map(|ops| ops.clone())
            .unwrap_or_default()
    }

    /// Hashes of the commits created so far
    pub fn commits(&self) -> Vec<String> {
        self.operations()
            .into_iter()
            .filter_map(|op| match op {
                RepoOperation::Commit { id, .. } => Some(id),
                _ => None,
            })
            .collect()
    }

    pub fn push_count(&self) -> usize {
        self.operations()
            .iter()
            .filter(|op| matches!(op, RepoOperation::ForcePush { .. }))
            .count()
    }

    fn record(&self, op: RepoOperation) {
        if let Ok(mut ops) = self.operations.lock() {
            ops.push(op);
        }
    }
}

impl Repository for MockRepository {
    fn stage_all(&self) -> Result<()> {
        self.record(RepoOperation::StageAll);
        Ok(())
    }

    fn commit(&self, message: &str) -> Result<String> {
        if let Some(error) = &self.commit_error {
            return Err(git2::Error::from_str(error).into());
        }

        let id = format!("{:040x}", self.commits().len() + 1);
        self.record(RepoOperation::Commit {
            message: message.to_string(),
            id: id.clone(),
        });
        Ok(id)
    }

    fn force_branch_name(&self, name: &str) -> Result<()> {
        self.record(RepoOperation::ForceBranchName(name.to_string()));
        Ok(())
    }

    fn set_remote_url(&self, remote: &str, url: &str) -> Result<()> {
        self.record(RepoOperation::SetRemoteUrl {
            remote: remote.to_string(),
            url: url.to_string(),
        });
        Ok(())
    }

    fn force_push(&self, remote: &str, branch: &str) -> Result<()> {
        self.record(RepoOperation::ForcePush {
            remote: remote.to_string(),
            branch: branch.to_string(),
        });
        match &self.push_error {
            Some(message) => Err(GitShipError::remote(message.clone())),
            None => Ok(()),
        }
    }
}
