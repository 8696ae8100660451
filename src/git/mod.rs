//! Git operations abstraction layer
//!
//! This module provides a trait-based abstraction over the Git operations the
//! sync flow performs, allowing for a real repository backed by `git2` and a
//! mock implementation for testing.
//!
//! # Overview
//!
//! - [repository::Git2Repository]: A real implementation using the `git2` crate
//! - [mock::MockRepository]: Records every operation in call order
//!
//! Flows depend on the [Repository] trait rather than a concrete type.
//!
//! ```rust
//! # use git_ship::git::Repository;
//! # fn example<R: Repository>(repo: &R) -> Result<(), Box<dyn std::error::Error>> {
//! repo.stage_all()?;
//! let commit = repo.commit("Add project sources")?;
//! repo.force_branch_name("main")?;
//! repo.set_remote_url("origin", "https://github.com/octocat/demo.git")?;
//! repo.force_push("origin", "main")?;
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;

pub use mock::{MockRepository, RepoOperation};
pub use repository::{discover_workdir, Git2Repository};

use crate::error::Result;

/// Common git operation trait for abstraction
///
/// ## Thread Safety
///
/// All implementors must be `Send + Sync`.
///
/// ## Error Handling
///
/// All methods return [crate::error::Result<T>]. Implementations map underlying
/// errors (like `git2::Error`) to [crate::error::GitShipError] variants; push
/// failures are reported as [crate::error::GitShipError::Remote] so callers can
/// tell them apart from local failures.
pub trait Repository: Send + Sync {
    /// Stage every pending change in the work tree, including deletions.
    fn stage_all(&self) -> Result<()>;

    /// Create a commit from the index on top of HEAD.
    ///
    /// A commit is created even when the tree matches HEAD's tree.
    ///
    /// # Returns
    /// * `Ok(String)` - The new commit's full hash
    fn commit(&self, message: &str) -> Result<String>;

    /// Point HEAD at a branch named `name`, renaming the current branch and
    /// overwriting any existing branch of that name.
    fn force_branch_name(&self, name: &str) -> Result<()>;

    /// Set the URL of `remote`, creating the remote when it does not exist.
    fn set_remote_url(&self, remote: &str, url: &str) -> Result<()>;

    /// Push `branch` to the same branch on `remote`, overwriting remote history.
    fn force_push(&self, remote: &str, branch: &str) -> Result<()>;
}
