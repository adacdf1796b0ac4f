use chrono::{Local, NaiveDate};
use wtkit::git::{WorktreeError, worktree_error};
use wtkit::prompt::{Answer, ScriptedPrompt};
use wtkit::worktree::{
    CheckoutOutcome, CreateOptions, DeleteOutcome, Lifecycle, UpstreamStatus, WorktreeIndex,
    resolve,
};
use wtkit::{Config, Worktree};

use crate::common::TestRepo;

fn create(repo: &TestRepo, config: &Config, branch: &str) -> Worktree {
    Lifecycle::new(config)
        .create(&repo.repository(), branch, &CreateOptions::default())
        .unwrap()
        .0
}

fn registered_paths(repo: &TestRepo) -> String {
    repo.git(&["worktree", "list", "--porcelain"])
}

#[test]
fn test_partial_names_login_logout() {
    let repo = TestRepo::new();
    let config = repo.config();
    create(&repo, &config, "feature/login");
    create(&repo, &config, "feature/logout");
    let index = WorktreeIndex::new(&config);

    // Unique match: no prompt at all
    let mut prompt = ScriptedPrompt::silent();
    let found = resolve(&index, "login", &mut prompt).unwrap();
    assert_eq!(found.branch, "feature/login");
    assert_eq!(found.path, repo.worktrees_root().join("feature-login"));
    assert_eq!(prompt.asked(), 0);

    // Ambiguous: exactly one prompt, options in folder order
    let mut prompt = ScriptedPrompt::new([Answer::Choose(Some(1))]);
    let found = resolve(&index, "log", &mut prompt).unwrap();
    assert_eq!(found.branch, "feature/logout");
    assert_eq!(prompt.asked(), 1);

    let err = resolve(&index, "signup", &mut ScriptedPrompt::silent()).unwrap_err();
    assert!(matches!(
        worktree_error(&err),
        Some(WorktreeError::NotFound { query, .. }) if query == "signup"
    ));
}

#[test]
fn test_create_on_existing_branch_touches_nothing() {
    let repo = TestRepo::new();
    let config = repo.config();
    repo.git(&["branch", "feature/x"]);

    let stale = repo.worktrees_root().join("feature-x");
    std::fs::create_dir_all(&stale).unwrap();
    std::fs::write(stale.join("notes.txt"), "keep me").unwrap();

    let err = Lifecycle::new(&config)
        .create(&repo.repository(), "feature/x", &CreateOptions::default())
        .unwrap_err();
    assert!(matches!(
        worktree_error(&err),
        Some(WorktreeError::BranchExists { branch }) if branch == "feature/x"
    ));
    assert_eq!(
        std::fs::read_to_string(stale.join("notes.txt")).unwrap(),
        "keep me"
    );
}

#[test]
fn test_create_copies_ignored_files() {
    let repo = TestRepo::new();
    repo.commit_file(repo.root_path(), ".gitignore", ".env\n", "Ignore env");
    std::fs::write(repo.root_path().join(".env"), "SECRET=1\n").unwrap();

    let options = CreateOptions {
        copy: vec![".env".to_string(), "missing/".to_string()],
        ..CreateOptions::default()
    };
    let (worktree, report) = Lifecycle::new(&repo.config())
        .create(&repo.repository(), "feature/env", &options)
        .unwrap();

    assert_eq!(
        std::fs::read_to_string(worktree.path.join(".env")).unwrap(),
        "SECRET=1\n"
    );
    assert_eq!(report.unmatched, ["missing/"]);
}

#[test]
fn test_checkout_tracks_remote_branch() {
    let repo = TestRepo::with_origin();
    let config = repo.config();
    repo.push_remote_branch("feature/remote");

    let lifecycle = Lifecycle::new(&config);
    let outcome = lifecycle
        .checkout(&repo.repository(), "feature/remote", false)
        .unwrap();
    let CheckoutOutcome::Tracking { worktree, remote_ref } = &outcome else {
        panic!("expected a tracking checkout, got {outcome:?}");
    };
    assert_eq!(remote_ref, "origin/feature/remote");
    assert_eq!(worktree.branch, "feature/remote");
    assert_eq!(
        worktree.upstream().unwrap().as_deref(),
        Some("origin/feature/remote")
    );

    // Second time round it is already there
    let again = lifecycle
        .checkout(&repo.repository(), "feature/remote", false)
        .unwrap();
    assert!(matches!(again, CheckoutOutcome::Switched(_)));
}

#[test]
fn test_checkout_unknown_branch() {
    let repo = TestRepo::new();
    let err = Lifecycle::new(&repo.config())
        .checkout(&repo.repository(), "nope", false)
        .unwrap_err();
    assert!(matches!(
        worktree_error(&err),
        Some(WorktreeError::BranchNotFound { .. })
    ));
    assert!(!repo.worktrees_root().join("nope").exists());
}

#[test]
fn test_delete_dry_run_reports_without_mutation() {
    let repo = TestRepo::new();
    let config = repo.config();
    let worktree = create(&repo, &config, "feature/x");
    repo.commit_file(&worktree.path, "a.txt", "a\n", "First");
    repo.commit_file(&worktree.path, "b.txt", "b\n", "Second");
    let head = repo.head(&worktree.path);
    let before = registered_paths(&repo);

    let outcome = Lifecycle::new(&config)
        .delete("feature/x", false, true, &mut ScriptedPrompt::silent())
        .unwrap();
    let DeleteOutcome::DryRun(report) = outcome else {
        panic!("expected a dry run");
    };
    assert!(!report.dirty);
    assert_eq!(report.upstream, UpstreamStatus::NoUpstream);
    assert!(report.disk_usage > 0);

    assert!(worktree.path.join("a.txt").exists());
    assert_eq!(repo.head(&worktree.path), head);
    assert_eq!(registered_paths(&repo), before);
}

#[test]
fn test_delete_dirty_needs_force() {
    let repo = TestRepo::new();
    let config = repo.config();
    let worktree = create(&repo, &config, "feature/x");
    std::fs::write(worktree.path.join("scratch.txt"), "wip").unwrap();
    let lifecycle = Lifecycle::new(&config);

    let err = lifecycle
        .delete("feature/x", false, false, &mut ScriptedPrompt::silent())
        .unwrap_err();
    assert!(matches!(
        worktree_error(&err),
        Some(WorktreeError::DirtyWorktree { .. })
    ));
    assert!(worktree.path.join("scratch.txt").exists());

    let outcome = lifecycle
        .delete("feature/x", true, false, &mut ScriptedPrompt::silent())
        .unwrap();
    assert!(matches!(outcome, DeleteOutcome::Removed(ref w) if w.branch == "feature/x"));
    assert!(!worktree.path.exists());
    let listed = registered_paths(&repo);
    assert!(!listed.contains("feature-x"), "{listed}");
}

#[test]
fn test_time_travel_is_detached_and_reused() {
    let repo = TestRepo::new();
    let config = repo.config();
    let today = Local::now().date_naive();
    let lifecycle = Lifecycle::new(&config);

    let (worktree, created) = lifecycle
        .time_travel(&repo.repository(), "main", today)
        .unwrap();
    assert!(created);
    assert!(worktree.detached);
    assert_eq!(
        worktree.path,
        repo.worktrees_root()
            .join(format!("main-{}", today.format("%Y-%m-%d")))
    );
    assert_eq!(repo.head(&worktree.path), repo.head(repo.root_path()));

    let (again, created) = lifecycle
        .time_travel(&repo.repository(), "main", today)
        .unwrap();
    assert!(!created);
    assert_eq!(again.path, worktree.path);
}

#[test]
fn test_time_travel_before_history() {
    let repo = TestRepo::new();
    let err = Lifecycle::new(&repo.config())
        .time_travel(
            &repo.repository(),
            "main",
            NaiveDate::from_ymd_opt(2001, 1, 1).unwrap(),
        )
        .unwrap_err();
    assert!(matches!(
        worktree_error(&err),
        Some(WorktreeError::NoCommitBefore { .. })
    ));
}

#[test]
fn test_prune_removes_only_stale_folders() {
    let repo = TestRepo::new();
    let config = repo.config();
    let keep = create(&repo, &config, "feature/keep");
    let gone = create(&repo, &config, "feature/gone");

    // Drop git's side of the registration, leaving the folder behind
    let admin = repo.root_path().join(".git/worktrees/feature-gone");
    std::fs::remove_dir_all(&admin).unwrap();

    let removed = Lifecycle::new(&config)
        .prune(Some(&repo.repository()))
        .unwrap();
    assert_eq!(removed, [gone.path.clone()]);
    assert!(!gone.path.exists());
    assert!(keep.path.exists());
}
