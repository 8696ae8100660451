use std::fmt;

/// Likely causes of a failed push.
///
/// These are shown to the user after a sync fails; the local commit is kept,
/// so each hint ends with what to fix before re-running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureHint {
    /// Credentials missing, expired, or lacking write access
    Authentication,
    /// The username or repository name does not match an existing repository
    RepositoryName,
    /// The remote host could not be reached
    Connectivity,
}

impl FailureHint {
    pub const ALL: [FailureHint; 3] = [
        FailureHint::Authentication,
        FailureHint::RepositoryName,
        FailureHint::Connectivity,
    ];

    /// Suggested fix for this cause
    pub fn remedy(&self) -> &'static str {
        match self {
            FailureHint::Authentication => {
                "Use a personal access token as the password, or load an SSH key into your agent"
            }
            FailureHint::RepositoryName => {
                "Create the repository on GitHub first and check the username spelling"
            }
            FailureHint::Connectivity => "Check your internet connection and proxy settings",
        }
    }

    /// Every hint, with the one suggested by `error_message` first.
    ///
    /// The remaining hints keep their order in [FailureHint::ALL].
    pub fn ranked(error_message: &str) -> Vec<FailureHint> {
        let lower = error_message.to_lowercase();
        let likely = if ["auth", "credential", "permission", "403", "401"]
            .iter()
            .any(|needle| lower.contains(needle))
        {
            Some(FailureHint::Authentication)
        } else if ["not found", "404", "does not exist", "repository"]
            .iter()
            .any(|needle| lower.contains(needle))
        {
            Some(FailureHint::RepositoryName)
        } else if ["network", "resolve", "timed out", "connect"]
            .iter()
            .any(|needle| lower.contains(needle))
        {
            Some(FailureHint::Connectivity)
        } else {
            None
        };

        let mut hints: Vec<FailureHint> = likely.into_iter().collect();
        hints.extend(FailureHint::ALL.iter().filter(|h| Some(**h) != likely));
        hints
    }
}

impl fmt::Display for FailureHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureHint::Authentication => write!(f, "Authentication failed"),
            FailureHint::RepositoryName => write!(f, "Repository name or username is wrong"),
            FailureHint::Connectivity => write!(f, "Network connection problem"),
        }
    }
}
