use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::build::{BuildOutcome, BuildTool};
use crate::error::Result;

/// Mock build tool for testing without a real toolchain
pub struct MockBuildTool {
    outcome: BuildOutcome,
    invocations: AtomicUsize,
}

impl MockBuildTool {
    /// A tool that always exits with `outcome`
    pub fn new(outcome: BuildOutcome) -> Self {
        MockBuildTool {
            outcome,
            invocations: AtomicUsize::new(0),
        }
    }

    pub fn succeeding() -> Self {
        Self::new(BuildOutcome::Succeeded)
    }

    pub fn failing(code: i32) -> Self {
        Self::new(BuildOutcome::Failed { code: Some(code) })
    }

    /// Number of times [BuildTool::run] was called
    pub fn invocations(&self) -> usize {
        self.invocations.load(Ordering::SeqCst)
    }
}

impl BuildTool for MockBuildTool {
    fn run(&self, _workdir: &Path, _entry_point: &Path, _target: &str) -> Result<BuildOutcome> {
        self.invocations.fetch_add(1, Ordering::SeqCst);
        Ok(self.outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_counts_invocations() {
        let tool = MockBuildTool::failing(2);
        assert_eq!(tool.invocations(), 0);

        let outcome = tool
            .run(Path::new("."), Path::new("gradlew"), "assembleDebug")
            .unwrap();

        assert_eq!(outcome, BuildOutcome::Failed { code: Some(2) });
        assert_eq!(tool.invocations(), 1);
    }
}
