//! Opening paths and URLs with the desktop's default handler.
//!
//! The [Launcher] trait is the seam between the flows and the desktop:
//! [SystemLauncher] shells out to the platform opener, while
//! [RecordingLauncher] only records what it was asked to open.

use std::process::{Command, Stdio};
use std::sync::Mutex;

use crate::error::{GitShipError, Result};

/// Opens a file-system path or URL in the user's default application
pub trait Launcher: Send + Sync {
    /// Open `target` and return once the opener has been handed the request.
    fn open(&self, target: &str) -> Result<()>;
}

/// Launcher backed by `xdg-open`, `open` or `cmd /C start`
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemLauncher;

impl SystemLauncher {
    fn command(target: &str) -> Command {
        if cfg!(windows) {
            let mut cmd = Command::new("cmd");
            // The empty string is the window title consumed by `start`.
            cmd.args(["/C", "start", "", target]);
            cmd
        } else if cfg!(target_os = "macos") {
            let mut cmd = Command::new("open");
            cmd.arg(target);
            cmd
        } else {
            let mut cmd = Command::new("xdg-open");
            cmd.arg(target);
            cmd
        }
    }
}

impl Launcher for SystemLauncher {
    fn open(&self, target: &str) -> Result<()> {
        let mut cmd = Self::command(target);
        tracing::debug!(?cmd, "launching opener");

        let output = cmd
            .stdin(Stdio::null())
            .output()
            .map_err(|e| GitShipError::launch(target, e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GitShipError::launch(
                target,
                format!(
                    "opener exited with code {}: {}",
                    output.status.code().unwrap_or(-1),
                    stderr.trim()
                ),
            ));
        }

        Ok(())
    }
}

/// Launcher that records requests instead of opening anything
#[derive(Debug, Default)]
pub struct RecordingLauncher {
    opened: Mutex<Vec<String>>,
    fail: bool,
}

impl RecordingLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    /// A launcher whose every open attempt is recorded and then fails
    pub fn failing() -> Self {
        RecordingLauncher {
            opened: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    /// Targets passed to [Launcher::open], in call order
    pub fn opened(&self) -> Vec<String> {
        self.opened
            .lock()
            .map(|opened| opened.clone())
            .unwrap_or_default()
    }
}

impl Launcher for RecordingLauncher {
    fn open(&self, target: &str) -> Result<()> {
        if let Ok(mut opened) = self.opened.lock() {
            opened.push(target.to_string());
        }

        if self.fail {
            return Err(GitShipError::launch(target, "recording launcher set to fail"));
        }
        Ok(())
    }
}
