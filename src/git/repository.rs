use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use git2::{
    Branch, BranchType, Commit, Cred, CredentialType, ErrorClass, ErrorCode, IndexAddOption,
    PushOptions, RemoteCallbacks, Repository as Git2Repo,
};

use crate::error::{GitShipError, Result};

/// Private keys looked for under `~/.ssh`, in the order they are offered.
const SSH_KEY_NAMES: [&str; 3] = ["id_ed25519", "id_rsa", "id_ecdsa"];

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Mutex<Git2Repo>,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;

        Ok(Self::from_git2(repo))
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository {
            repo: Mutex::new(repo),
        }
    }

    /// Root directory of the work tree.
    pub fn workdir(&self) -> Result<PathBuf> {
        let repo = self.repo()?;
        repo.workdir()
            .map(Path::to_path_buf)
            .ok_or_else(|| GitShipError::config("Repository has no work tree"))
    }

    fn repo(&self) -> Result<MutexGuard<'_, Git2Repo>> {
        self.repo
            .lock()
            .map_err(|_| GitShipError::remote("repository lock poisoned"))
    }
}

/// Work tree root of the repository containing `path`, searching upwards.
///
/// `None` when `path` is not inside a non-bare repository.
pub fn discover_workdir<P: AsRef<Path>>(path: P) -> Option<PathBuf> {
    Git2Repository::open(path).ok()?.workdir().ok()
}

/// HEAD's commit, or `None` on an unborn branch.
fn head_commit(repo: &Git2Repo) -> Result<Option<Commit<'_>>> {
    match repo.head() {
        Ok(head) => Ok(Some(head.peel_to_commit()?)),
        Err(e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound => {
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

/// Where a set of push credentials comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
enum CredentialSource {
    Username,
    SshAgent,
    SshKey(PathBuf),
    CredentialHelper,
    Default,
}

/// Existing key files under `<home>/.ssh`.
fn ssh_key_files(home: &Path) -> Vec<PathBuf> {
    SSH_KEY_NAMES
        .iter()
        .map(|name| home.join(".ssh").join(name))
        .filter(|path| path.is_file())
        .collect()
}

/// Every source usable for `allowed`, in the order they are offered.
fn credential_sources(allowed: CredentialType, ssh_keys: &[PathBuf]) -> Vec<CredentialSource> {
    let mut sources = Vec::new();

    if allowed.contains(CredentialType::USERNAME) {
        sources.push(CredentialSource::Username);
    }
    if allowed.contains(CredentialType::SSH_KEY) {
        sources.push(CredentialSource::SshAgent);
        sources.extend(ssh_keys.iter().cloned().map(CredentialSource::SshKey));
    }
    if allowed.contains(CredentialType::USER_PASS_PLAINTEXT) {
        sources.push(CredentialSource::CredentialHelper);
    }
    if allowed.contains(CredentialType::DEFAULT) {
        sources.push(CredentialSource::Default);
    }

    sources
}

/// First source for `allowed` that has not been offered yet.
fn next_credential_source(
    allowed: CredentialType,
    ssh_keys: &[PathBuf],
    tried: &[CredentialSource],
) -> Option<CredentialSource> {
    credential_sources(allowed, ssh_keys)
        .into_iter()
        .find(|source| !tried.contains(source))
}

/// Credentials callbacks for pushing.
///
/// libgit2 calls back again after each rejection, so every call offers the next
/// untried source: the SSH agent, each `~/.ssh` key, then the configured git
/// credential helper. Once all are used the push fails instead of retrying.
fn remote_callbacks<'a>(
    config: Option<git2::Config>,
    tried: &'a RefCell<Vec<CredentialSource>>,
) -> RemoteCallbacks<'a> {
    let ssh_keys = dirs::home_dir()
        .map(|home| ssh_key_files(&home))
        .unwrap_or_default();
    let mut callbacks = RemoteCallbacks::new();

    callbacks.credentials(move |url, username_from_url, allowed_types| {
        let user = username_from_url.unwrap_or("git");

        loop {
            let source = next_credential_source(allowed_types, &ssh_keys, &tried.borrow())
                .ok_or_else(|| {
                    git2::Error::from_str("authentication failed: all credentials were rejected")
                })?;
            tried.borrow_mut().push(source.clone());
            tracing::debug!(?source, "offering credentials");

            let cred = match &source {
                CredentialSource::Username => Cred::username(user),
                CredentialSource::SshAgent => Cred::ssh_key_from_agent(user),
                CredentialSource::SshKey(path) => Cred::ssh_key(user, None, path, None),
                CredentialSource::CredentialHelper => match config.as_ref() {
                    Some(config) => Cred::credential_helper(config, url, username_from_url),
                    None => continue,
                },
                CredentialSource::Default => Cred::default(),
            };

            if let Ok(cred) = cred {
                return Ok(cred);
            }
        }
    });

    callbacks.push_update_reference(|refname, status| match status {
        Some(status) => Err(git2::Error::from_str(&format!(
            "remote rejected {}: {}",
            refname, status
        ))),
        None => Ok(()),
    });

    callbacks
}

impl super::Repository for Git2Repository {
    fn stage_all(&self) -> Result<()> {
        let repo = self.repo()?;
        let mut index = repo.index()?;

        index.add_all(["*"].iter(), IndexAddOption::DEFAULT, None)?;
        // add_all does not drop entries for files deleted from the work tree.
        index.update_all(["*"].iter(), None)?;
        index.write()?;

        Ok(())
    }

    fn commit(&self, message: &str) -> Result<String> {
        let repo = self.repo()?;
        let mut index = repo.index()?;

        let tree_id = index.write_tree()?;
        let tree = repo.find_tree(tree_id)?;
        let signature = repo.signature()?;

        let parent = head_commit(&repo)?;
        let parents: Vec<&Commit<'_>> = parent.iter().collect();

        let oid = repo.commit(
            Some("HEAD"),
            &signature,
            &signature,
            message,
            &tree,
            &parents,
        )?;
        tracing::debug!(commit = %oid, "created commit");

        Ok(oid.to_string())
    }

    fn force_branch_name(&self, name: &str) -> Result<()> {
        let repo = self.repo()?;
        let refname = format!("refs/heads/{}", name);

        let head = match repo.head() {
            Ok(head) => head,
            Err(e) if e.code() == ErrorCode::UnbornBranch => {
                // Nothing to rename yet; the first commit will land on `name`.
                repo.set_head(&refname)?;
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        if head.is_branch() {
            if head.shorthand() != Some(name) {
                let mut branch = Branch::wrap(head);
                branch.rename(name, true)?;
            }
        } else {
            let commit = head.peel_to_commit()?;
            repo.branch(name, &commit, true)?;
        }

        repo.set_head(&refname)?;
        Ok(())
    }

    fn set_remote_url(&self, remote: &str, url: &str) -> Result<()> {
        let repo = self.repo()?;

        match repo.find_remote(remote) {
            Ok(_) => repo.remote_set_url(remote, url)?,
            Err(e) if e.code() == ErrorCode::NotFound => {
                repo.remote(remote, url)?;
            }
            Err(e) => return Err(e.into()),
        }

        Ok(())
    }

    fn force_push(&self, remote_name: &str, branch: &str) -> Result<()> {
        let repo = self.repo()?;

        let mut remote = repo
            .find_remote(remote_name)
            .map_err(|_| GitShipError::remote(format!("No remote named '{}' found", remote_name)))?;

        let tried = RefCell::new(Vec::new());
        let mut push_options = PushOptions::new();
        push_options.remote_callbacks(remote_callbacks(repo.config().ok(), &tried));

        let refspec = format!("+refs/heads/{0}:refs/heads/{0}", branch);
        tracing::debug!(remote = remote_name, %refspec, "force pushing");

        remote
            .push(&[refspec.as_str()], Some(&mut push_options))
            .map_err(|e| match e.class() {
                ErrorClass::Net | ErrorClass::Http | ErrorClass::Ssl => {
                    GitShipError::remote(format!("Network error during push: {}", e))
                }
                ErrorClass::Ssh => {
                    GitShipError::remote(format!("Authentication failed during push: {}", e))
                }
                _ if e.code() == ErrorCode::Auth => {
                    GitShipError::remote(format!("Authentication failed during push: {}", e))
                }
                _ => GitShipError::remote(format!("Failed to push '{}': {}", branch, e)),
            })?;

        // Equivalent of `push -u`; the push itself already succeeded.
        let upstream = format!("{}/{}", remote_name, branch);
        if let Err(e) = repo
            .find_branch(branch, BranchType::Local)
            .and_then(|mut local| local.set_upstream(Some(&upstream)))
        {
            tracing::warn!(error = %e, %upstream, "could not set upstream");
        }

        Ok(())
    }
}
