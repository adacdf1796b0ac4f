use assert_cmd::assert::Assert;

use crate::common::{TestRepo, run_git};

fn stdout_of(assert: &Assert) -> String {
    String::from_utf8(assert.get_output().stdout.clone()).unwrap()
}

fn stderr_of(assert: &Assert) -> String {
    String::from_utf8_lossy(&assert.get_output().stderr).into_owned()
}

#[test]
fn test_create_prints_only_the_path() {
    let repo = TestRepo::new();
    let assert = repo.wk().args(["create", "feature/cli"]).assert().success();

    let path = repo.worktrees_root().join("feature-cli");
    assert_eq!(stdout_of(&assert), format!("{}\n", path.display()));
    assert!(stderr_of(&assert).contains("Created branch feature/cli"));
    assert!(path.join("README.md").exists());
}

#[test]
fn test_create_existing_branch_hint() {
    let repo = TestRepo::new();
    repo.git(&["branch", "feature/x"]);

    let assert = repo.wk().args(["create", "feature/x"]).assert().failure().code(1);
    let stderr = stderr_of(&assert);
    assert!(stderr.contains("Branch feature/x already exists"), "{stderr}");
    assert!(stderr.contains("wk checkout feature/x"), "{stderr}");
}

#[test]
fn test_switch_unique_and_unknown() {
    let repo = TestRepo::new();
    repo.wk().args(["create", "feature/login"]).assert().success();

    let assert = repo.wk().args(["switch", "login"]).assert().success();
    assert_eq!(
        stdout_of(&assert).trim_end(),
        repo.worktrees_root().join("feature-login").display().to_string()
    );

    let assert = repo.wk().args(["switch", "signup"]).assert().failure().code(1);
    assert!(stderr_of(&assert).contains("No worktree matches signup"));
    assert!(stdout_of(&assert).is_empty());
}

#[test]
fn test_switch_ambiguous_reads_choice_from_stdin() {
    let repo = TestRepo::new();
    repo.wk().args(["create", "feature/login"]).assert().success();
    repo.wk().args(["create", "feature/logout"]).assert().success();

    let assert = repo
        .wk()
        .args(["switch", "log"])
        .write_stdin("2\n")
        .assert()
        .success();
    assert_eq!(
        stdout_of(&assert).trim_end(),
        repo.worktrees_root().join("feature-logout").display().to_string()
    );
    assert!(stderr_of(&assert).contains("Multiple worktrees match log"));

    let assert = repo
        .wk()
        .args(["switch", "log"])
        .write_stdin("q\n")
        .assert()
        .failure()
        .code(1);
    assert!(stderr_of(&assert).contains("Cancelled"));
}

#[test]
fn test_list_filters_by_pattern() {
    let repo = TestRepo::new();
    repo.wk().args(["create", "feature/login"]).assert().success();
    repo.wk().args(["create", "hotfix/crash"]).assert().success();

    let all = stdout_of(&repo.wk().arg("list").assert().success());
    assert_eq!(all.lines().count(), 2, "{all}");
    assert!(all.contains("feature/login"));
    assert!(all.contains("main")); // project name

    let filtered = stdout_of(&repo.wk().args(["list", "hotfix"]).assert().success());
    assert_eq!(filtered.lines().count(), 1);
    assert!(filtered.starts_with("hotfix/crash"));
}

#[test]
fn test_delete_dry_run_then_delete() {
    let repo = TestRepo::new();
    repo.wk().args(["create", "feature/x"]).assert().success();
    let path = repo.worktrees_root().join("feature-x");

    let assert = repo
        .wk()
        .args(["delete", "feature/x", "--dry-run"])
        .assert()
        .success();
    let stderr = stderr_of(&assert);
    assert!(stderr.contains("Would delete feature/x"), "{stderr}");
    assert!(stderr.contains("has no upstream"), "{stderr}");
    assert!(path.exists());

    repo.wk().args(["delete", "feature/x"]).assert().success();
    assert!(!path.exists());
}

#[test]
fn test_checkout_outside_repository_fails() {
    let repo = TestRepo::new();
    let outside = repo.worktrees_root().parent().unwrap().to_path_buf();

    let assert = repo
        .wk()
        .arg("-C")
        .arg(&outside)
        .args(["checkout", "main"])
        .assert()
        .failure()
        .code(1);
    assert!(stderr_of(&assert).contains("is not inside a git worktree"));
}

#[test]
fn test_push_commits_and_sets_upstream() {
    let repo = TestRepo::with_origin();
    repo.wk().args(["create", "feature/push"]).assert().success();
    let path = repo.worktrees_root().join("feature-push");
    std::fs::write(path.join("new.txt"), "new\n").unwrap();

    repo.wk()
        .arg("-C")
        .arg(&path)
        .arg("push")
        .write_stdin("Add new file\n")
        .assert()
        .success();

    assert_eq!(run_git(&path, &["status", "--porcelain"]), "");
    let subject = run_git(&path, &["log", "-1", "--format=%s"]);
    assert_eq!(subject.trim(), "Add new file");
    let upstream = run_git(&path, &["rev-parse", "--abbrev-ref", "feature/push@{u}"]);
    assert_eq!(upstream.trim(), "origin/feature/push");
    let remote = run_git(&repo.origin_path(), &["branch", "--list", "feature/push"]);
    assert!(remote.contains("feature/push"));
}

#[test]
fn test_push_without_message_is_cancelled() {
    let repo = TestRepo::with_origin();
    repo.wk().args(["create", "feature/push"]).assert().success();
    let path = repo.worktrees_root().join("feature-push");
    std::fs::write(path.join("new.txt"), "new\n").unwrap();

    let assert = repo
        .wk()
        .arg("-C")
        .arg(&path)
        .arg("push")
        .write_stdin("")
        .assert()
        .failure()
        .code(1);
    assert!(stderr_of(&assert).contains("Cancelled"));
    assert!(!run_git(&path, &["status", "--porcelain"]).is_empty());
}

#[test]
fn test_shell_init_needs_no_repository() {
    let repo = TestRepo::new();
    let assert = repo
        .wk()
        .args(["shell-init", "zsh"])
        .assert()
        .success();
    let snippet = stdout_of(&assert);
    assert!(snippet.contains("wk() {"));
    assert!(snippet.contains(r#"eval "$(wk shell-init zsh)""#));
}

#[test]
fn test_invalid_config_is_reported() {
    let repo = TestRepo::new();
    std::fs::write(repo.config_path(), "folder-separator = \"/\"\n").unwrap();

    let assert = repo.wk().arg("list").assert().failure().code(1);
    assert!(stderr_of(&assert).contains("folder-separator"));
}
