use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{GitShipError, Result};

/// Represents the complete configuration for git-ship.
///
/// Contains the build entry point and artifact location, the remote sync
/// settings, and the CI status page template.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub build: BuildConfig,

    #[serde(default)]
    pub sync: SyncConfig,

    #[serde(default)]
    pub status: StatusConfig,
}

/// Returns the platform's build entry point.
fn default_entry_point() -> String {
    if cfg!(windows) {
        "gradlew.bat".to_string()
    } else {
        "gradlew".to_string()
    }
}

fn default_target() -> String {
    "assembleDebug".to_string()
}

fn default_artifact() -> String {
    "app/build/outputs/apk/debug/app-debug.apk".to_string()
}

fn default_true() -> bool {
    true
}

/// Configuration for the build-and-report flow.
///
/// Paths are relative to the working directory the build runs in.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct BuildConfig {
    #[serde(default = "default_entry_point")]
    pub entry_point: String,

    #[serde(default = "default_target")]
    pub target: String,

    #[serde(default = "default_artifact")]
    pub artifact: String,

    /// Open the artifact location in a file browser after a successful build
    #[serde(default = "default_true")]
    pub open_artifact: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        BuildConfig {
            entry_point: default_entry_point(),
            target: default_target(),
            artifact: default_artifact(),
            open_artifact: true,
        }
    }
}

fn default_branch() -> String {
    "main".to_string()
}

fn default_remote() -> String {
    "origin".to_string()
}

fn default_remote_url_template() -> String {
    "https://github.com/{username}/{repository}.git".to_string()
}

fn default_commit_message() -> String {
    "Add project sources and CI build workflow".to_string()
}

/// Configuration for the remote sync flow.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SyncConfig {
    /// Account name used when none is given on the command line
    #[serde(default)]
    pub username: String,

    /// Repository name; empty means the working directory's name
    #[serde(default)]
    pub repository: String,

    #[serde(default = "default_branch")]
    pub branch: String,

    #[serde(default = "default_remote")]
    pub remote: String,

    #[serde(default = "default_remote_url_template")]
    pub url_template: String,

    #[serde(default = "default_commit_message")]
    pub commit_message: String,
}

impl Default for SyncConfig {
    fn default() -> Self {
        SyncConfig {
            username: String::new(),
            repository: String::new(),
            branch: default_branch(),
            remote: default_remote(),
            url_template: default_remote_url_template(),
            commit_message: default_commit_message(),
        }
    }
}

impl SyncConfig {
    /// Repository name to substitute into templates.
    ///
    /// Falls back to the final component of `workdir` when unset.
    pub fn repository_name(&self, workdir: &Path) -> Result<String> {
        if !self.repository.trim().is_empty() {
            return Ok(self.repository.trim().to_string());
        }

        let absolute = if workdir.is_absolute() {
            workdir.to_path_buf()
        } else {
            std::env::current_dir()?.join(workdir)
        };

        absolute
            .components()
            .filter(|c| !matches!(c, std::path::Component::CurDir))
            .last()
            .and_then(|c| c.as_os_str().to_str())
            .filter(|name| !name.is_empty() && *name != "/")
            .map(|name| name.to_string())
            .ok_or_else(|| {
                GitShipError::config(format!(
                    "Cannot derive a repository name from '{}'; set sync.repository",
                    workdir.display()
                ))
            })
    }
}

fn default_status_url_template() -> String {
    "https://github.com/{username}/{repository}/actions".to_string()
}

/// Configuration for the CI status page.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct StatusConfig {
    #[serde(default = "default_status_url_template")]
    pub url_template: String,
}

impl Default for StatusConfig {
    fn default() -> Self {
        StatusConfig {
            url_template: default_status_url_template(),
        }
    }
}

/// Substitutes `{username}` and `{repository}` in a template.
pub fn render_template(template: &str, username: &str, repository: &str) -> String {
    template
        .replace("{username}", username)
        .replace("{repository}", repository)
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `gitship.toml` in current directory
/// 3. `.gitship.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// # Arguments
/// * `config_path` - Optional path to custom configuration file
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path)
            .map_err(|e| GitShipError::config(format!("Cannot read '{}': {}", path, e)))?
    } else if Path::new("./gitship.toml").exists() {
        fs::read_to_string("./gitship.toml")?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(".gitship.toml");
        if config_path.exists() {
            fs::read_to_string(config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    parse_config(&config_str)
}

/// Parses a TOML configuration string.
pub fn parse_config(config_str: &str) -> Result<Config> {
    toml::from_str(config_str).map_err(|e| GitShipError::config(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_template() {
        let url = render_template(
            "https://github.com/{username}/{repository}.git",
            "octocat",
            "Hello-World",
        );
        assert_eq!(url, "https://github.com/octocat/Hello-World.git");
    }

    #[test]
    fn test_render_template_without_placeholders() {
        assert_eq!(render_template("fixed", "a", "b"), "fixed");
    }

    #[test]
    fn test_partial_sections_keep_defaults() {
        let config = parse_config(
            r#"
[sync]
repository = "VoiceLedger"
"#,
        )
        .unwrap();
        assert_eq!(config.sync.repository, "VoiceLedger");
        assert_eq!(config.sync.branch, "main");
        assert_eq!(config.build, BuildConfig::default());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = parse_config("[build\nentry_point = 1").unwrap_err();
        assert!(matches!(err, GitShipError::Config(_)));
    }

    #[test]
    fn test_repository_name_prefers_configured_value() {
        let sync = SyncConfig {
            repository: "  Ledger ".to_string(),
            ..SyncConfig::default()
        };
        assert_eq!(sync.repository_name(Path::new("/tmp/other")).unwrap(), "Ledger");
    }

    #[test]
    fn test_repository_name_falls_back_to_directory() {
        let sync = SyncConfig::default();
        assert_eq!(
            sync.repository_name(Path::new("/home/dev/VoiceLedger")).unwrap(),
            "VoiceLedger"
        );
    }
}
