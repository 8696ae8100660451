// tests/sync_test.rs
use std::fs;
use std::path::Path;

use git2::Repository;
use git_ship::config::SyncConfig;
use git_ship::git::Git2Repository;
use git_ship::sync::{run_sync_flow, SyncPlan};
use git_ship::GitShipError;
use tempfile::TempDir;

/// Work tree with one uncommitted file plus an empty bare repository laid out
/// as `<remotes>/<username>/<repository>.git`.
struct Fixture {
    work: TempDir,
    remotes: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let work = TempDir::new().expect("Could not create temp dir");
        let repo = Repository::init(work.path()).expect("Could not init git repo");
        {
            let mut config = repo.config().expect("Could not get config");
            config
                .set_str("user.name", "Test User")
                .expect("Could not set user.name");
            config
                .set_str("user.email", "test@example.com")
                .expect("Could not set user.email");
        }
        fs::write(work.path().join("README.md"), "Initial content\n").unwrap();

        let remotes = TempDir::new().expect("Could not create temp dir");
        Repository::init_bare(remotes.path().join("octocat").join("VoiceLedger.git"))
            .expect("Could not init bare repo");

        Fixture { work, remotes }
    }

    fn config(&self) -> SyncConfig {
        SyncConfig {
            repository: "VoiceLedger".to_string(),
            url_template: format!(
                "{}/{{username}}/{{repository}}.git",
                self.remotes.path().display()
            ),
            ..SyncConfig::default()
        }
    }

    fn plan(&self, username: &str) -> git_ship::Result<SyncPlan> {
        SyncPlan::resolve(username, "VoiceLedger", None, &self.config())
    }

    fn repo(&self) -> Git2Repository {
        Git2Repository::open(self.work.path()).unwrap()
    }

    fn bare(&self) -> Repository {
        Repository::open_bare(self.remotes.path().join("octocat").join("VoiceLedger.git")).unwrap()
    }
}

fn commit_count(repo: &Repository, refname: &str) -> usize {
    let mut revwalk = repo.revwalk().unwrap();
    revwalk.push_ref(refname).unwrap();
    revwalk.count()
}

fn has_head_commit(path: &Path) -> bool {
    let repo = Repository::open(path).unwrap();
    let has_commit = repo.head().and_then(|h| h.peel_to_commit()).is_ok();
    has_commit
}

#[test]
fn test_sync_pushes_single_commit_to_main() {
    let fixture = Fixture::new();
    let plan = fixture.plan("octocat").unwrap();

    let report = run_sync_flow(&plan, &fixture.repo()).unwrap();

    let bare = fixture.bare();
    let remote_head = bare.find_reference("refs/heads/main").unwrap();
    assert_eq!(remote_head.target().unwrap().to_string(), report.commit);
    assert_eq!(commit_count(&bare, "refs/heads/main"), 1);

    let local = Repository::open(fixture.work.path()).unwrap();
    assert_eq!(local.head().unwrap().shorthand(), Some("main"));
    let origin = local.find_remote("origin").unwrap();
    assert_eq!(origin.url(), Some(plan.remote_url.as_str()));
}

#[test]
fn test_second_sync_adds_an_independent_commit() {
    let fixture = Fixture::new();
    let plan = fixture.plan("octocat").unwrap();
    let repo = fixture.repo();

    let first = run_sync_flow(&plan, &repo).unwrap();
    let second = run_sync_flow(&plan, &repo).unwrap();

    assert_ne!(first.commit, second.commit);
    let bare = fixture.bare();
    assert_eq!(commit_count(&bare, "refs/heads/main"), 2);
    let tip = bare
        .find_reference("refs/heads/main")
        .unwrap()
        .peel_to_commit()
        .unwrap();
    assert_eq!(tip.id().to_string(), second.commit);
    assert_eq!(tip.parent_id(0).unwrap().to_string(), first.commit);
}

#[test]
fn test_force_push_overwrites_diverged_remote() {
    let fixture = Fixture::new();
    let plan = fixture.plan("octocat").unwrap();
    run_sync_flow(&plan, &fixture.repo()).unwrap();

    // A second, unrelated work tree rewrites history on the same remote.
    let other = Fixture::new();
    let other_plan = SyncPlan::resolve(
        "octocat",
        "VoiceLedger",
        Some("unrelated history"),
        &fixture.config(),
    )
    .unwrap();
    let other_report = run_sync_flow(&other_plan, &other.repo()).unwrap();

    let bare = fixture.bare();
    let tip = bare.find_reference("refs/heads/main").unwrap();
    assert_eq!(tip.target().unwrap().to_string(), other_report.commit);
    assert_eq!(commit_count(&bare, "refs/heads/main"), 1);
}

#[test]
fn test_empty_username_leaves_repository_untouched() {
    let fixture = Fixture::new();

    let result = fixture.plan("   ");

    assert!(matches!(result, Err(GitShipError::EmptyUsername)));
    assert!(!has_head_commit(fixture.work.path()));
    let local = Repository::open(fixture.work.path()).unwrap();
    assert!(local.index().unwrap().is_empty());
    assert!(local.find_remote("origin").is_err());
}

#[test]
fn test_push_to_missing_repository_keeps_local_commit() {
    let fixture = Fixture::new();
    let plan = fixture.plan("someone-else").unwrap();

    let err = run_sync_flow(&plan, &fixture.repo()).unwrap_err();

    match err {
        git_ship::sync::SyncError::Push(failure) => {
            let local = Repository::open(fixture.work.path()).unwrap();
            let head = local.head().unwrap().peel_to_commit().unwrap();
            assert_eq!(head.id().to_string(), failure.commit);
        }
        other => panic!("expected push failure, got {:?}", other),
    }
}
