use wtkit::git::{WorktreeError, worktree_error};
use wtkit::prompt::{Answer, ScriptedPrompt};
use wtkit::worktree::{CreateOptions, Lifecycle, StashState, SyncEngine, SyncSource, SyncStrategy};
use wtkit::{Config, Worktree};

use crate::common::{TestRepo, run_git};

fn create(repo: &TestRepo, config: &Config, branch: &str) -> Worktree {
    Lifecycle::new(config)
        .create(&repo.repository(), branch, &CreateOptions::default())
        .unwrap()
        .0
}

/// Advance `origin/main` by one commit touching `file`.
fn advance_origin(repo: &TestRepo, file: &str, content: &str) {
    repo.commit_file(repo.root_path(), file, content, "Upstream change");
    repo.git(&["push", "-q", "origin", "main"]);
}

fn stash_list(worktree: &Worktree) -> String {
    run_git(&worktree.path, &["stash", "list"])
}

#[test]
fn test_clean_rebase_onto_origin() {
    let repo = TestRepo::with_origin();
    let config = repo.config();
    let worktree = create(&repo, &config, "feature/x");
    repo.commit_file(&worktree.path, "feature.txt", "feature\n", "Feature work");
    advance_origin(&repo, "main.txt", "main\n");

    let outcome = SyncEngine::new(&config)
        .sync(Some("feature/x"), repo.root_path(), &mut ScriptedPrompt::silent())
        .unwrap();

    assert_eq!(
        outcome.source,
        SyncSource::Remote {
            remote: "origin".to_string(),
            branch: "main".to_string()
        }
    );
    assert_eq!(outcome.strategy, SyncStrategy::Rebase);
    assert_eq!(outcome.stash, StashState::NotNeeded);

    // Linear history on top of origin/main, no merge commit
    run_git(&worktree.path, &["merge-base", "--is-ancestor", "origin/main", "HEAD"]);
    let merges = run_git(&worktree.path, &["rev-list", "--merges", "--count", "origin/main..HEAD"]);
    assert_eq!(merges.trim(), "0");
    assert!(stash_list(&worktree).is_empty());
}

#[test]
fn test_local_changes_survive_sync() {
    let repo = TestRepo::with_origin();
    let config = repo.config();
    let worktree = create(&repo, &config, "feature/x");
    repo.commit_file(&worktree.path, "feature.txt", "feature\n", "Feature work");
    advance_origin(&repo, "main.txt", "main\n");

    std::fs::write(worktree.path.join("feature.txt"), "feature, edited\n").unwrap();
    std::fs::write(worktree.path.join("wip.txt"), "scratch\n").unwrap();

    let outcome = SyncEngine::new(&config)
        .sync(Some("feature/x"), repo.root_path(), &mut ScriptedPrompt::silent())
        .unwrap();

    let StashState::Restored { label } = &outcome.stash else {
        panic!("expected the stash to be restored, got {:?}", outcome.stash);
    };
    assert!(label.starts_with("wk-sync feature/x "), "{label}");
    assert_eq!(
        std::fs::read_to_string(worktree.path.join("feature.txt")).unwrap(),
        "feature, edited\n"
    );
    assert!(worktree.path.join("wip.txt").exists());
    assert!(worktree.path.join("main.txt").exists());
    assert!(stash_list(&worktree).is_empty());
}

#[test]
fn test_conflict_reports_kept_stash() {
    let repo = TestRepo::with_origin();
    let config = repo.config();
    let worktree = create(&repo, &config, "feature/x");
    repo.commit_file(&worktree.path, "README.md", "feature\n", "Feature README");
    advance_origin(&repo, "README.md", "upstream\n");
    std::fs::write(worktree.path.join("wip.txt"), "scratch\n").unwrap();

    let err = SyncEngine::new(&config)
        .sync(Some("feature/x"), repo.root_path(), &mut ScriptedPrompt::silent())
        .unwrap_err();

    let Some(WorktreeError::SyncConflict {
        branch,
        source,
        stash,
    }) = worktree_error(&err)
    else {
        panic!("expected a sync conflict, got {err:#}");
    };
    assert_eq!(branch, "feature/x");
    assert_eq!(source, "origin/main");
    let label = stash.as_deref().unwrap();
    assert!(stash_list(&worktree).contains(label));
    // The merge is left for the user to resolve
    assert!(!worktree.path.join("wip.txt").exists());
}

#[test]
fn test_fetch_failure_stops_before_stash() {
    let repo = TestRepo::with_origin();
    let config = repo.config();
    let worktree = create(&repo, &config, "feature/x");
    std::fs::write(worktree.path.join("wip.txt"), "scratch\n").unwrap();
    let head = repo.head(&worktree.path);
    // origin/main is still known locally, but the remote is gone
    repo.git(&["remote", "set-url", "origin", "/nonexistent/origin.git"]);

    let err = SyncEngine::new(&config)
        .sync(Some("feature/x"), repo.root_path(), &mut ScriptedPrompt::silent())
        .unwrap_err();

    assert!(matches!(
        worktree_error(&err),
        Some(WorktreeError::FetchFailed { remote, branch, .. }) if remote == "origin" && branch == "main"
    ));
    assert!(worktree.path.join("wip.txt").exists());
    assert!(stash_list(&worktree).is_empty());
    assert_eq!(repo.head(&worktree.path), head);
}

#[test]
fn test_missing_base_branch_changes_nothing() {
    let repo = TestRepo::with_origin();
    let mut config = repo.config();
    config.base_branches = vec!["trunk".to_string()];
    let worktree = create(&repo, &config, "feature/x");
    std::fs::write(worktree.path.join("wip.txt"), "scratch\n").unwrap();

    let err = SyncEngine::new(&config)
        .sync(Some("feature/x"), repo.root_path(), &mut ScriptedPrompt::silent())
        .unwrap_err();
    assert!(matches!(
        worktree_error(&err),
        Some(WorktreeError::NoBaseBranch { candidates, .. }) if candidates == &["trunk"]
    ));
    assert!(worktree.path.join("wip.txt").exists());
    assert!(stash_list(&worktree).is_empty());
}

#[test]
fn test_current_worktree_needs_confirmation() {
    let repo = TestRepo::with_origin();
    let config = repo.config();
    let worktree = create(&repo, &config, "feature/x");
    let subdir = worktree.path.join("src");
    std::fs::create_dir_all(&subdir).unwrap();
    let engine = SyncEngine::new(&config);

    let mut declined = ScriptedPrompt::new([Answer::Confirm(false)]);
    let err = engine.sync(None, &subdir, &mut declined).unwrap_err();
    assert!(matches!(worktree_error(&err), Some(WorktreeError::Cancelled)));
    assert_eq!(declined.asked(), 1);

    let mut accepted = ScriptedPrompt::new([Answer::Confirm(true)]);
    let outcome = engine.sync(None, &subdir, &mut accepted).unwrap();
    assert_eq!(outcome.worktree.path, worktree.path);
}
