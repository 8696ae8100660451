//! CI status page opener.
//!
//! Only derives the page URL and hands it to a [Launcher]; the page itself is
//! never fetched or parsed.

use crate::config::{render_template, StatusConfig};
use crate::error::Result;
use crate::launcher::Launcher;
use crate::sync::validate_username;

/// Builds the status page URL for a repository.
pub fn status_page_url(config: &StatusConfig, username: &str, repository: &str) -> Result<String> {
    let username = validate_username(username)?;
    Ok(render_template(&config.url_template, &username, repository))
}

/// Opens the status page in the default browser and returns its URL.
pub fn open_status_page<L>(
    config: &StatusConfig,
    username: &str,
    repository: &str,
    launcher: &L,
) -> Result<String>
where
    L: Launcher + ?Sized,
{
    let url = status_page_url(config, username, repository)?;
    tracing::debug!(%url, "opening status page");
    launcher.open(&url)?;
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GitShipError;
    use crate::launcher::RecordingLauncher;

    #[test]
    fn test_default_status_url() {
        let url = status_page_url(&StatusConfig::default(), "octocat", "VoiceLedger").unwrap();
        assert_eq!(url, "https://github.com/octocat/VoiceLedger/actions");
    }

    #[test]
    fn test_open_status_page_opens_once() {
        let launcher = RecordingLauncher::new();
        let url =
            open_status_page(&StatusConfig::default(), "octocat", "Repo", &launcher).unwrap();
        assert_eq!(launcher.opened(), vec![url]);
    }

    #[test]
    fn test_empty_username_opens_nothing() {
        let launcher = RecordingLauncher::new();
        let result = open_status_page(&StatusConfig::default(), "", "Repo", &launcher);
        assert!(matches!(result, Err(GitShipError::EmptyUsername)));
        assert!(launcher.opened().is_empty());
    }

    #[test]
    fn test_launch_failure_is_returned() {
        let launcher = RecordingLauncher::failing();
        let result = open_status_page(&StatusConfig::default(), "octocat", "Repo", &launcher);
        assert!(matches!(result, Err(GitShipError::Launch { .. })));
    }
}
