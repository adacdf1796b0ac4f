use wtkit::worktree::tags::TAG_FILE;

use crate::common::{TestRepo, run_git};

fn stdout_of(assert: assert_cmd::assert::Assert) -> String {
    String::from_utf8(assert.get_output().stdout.clone()).unwrap()
}

#[test]
fn test_tag_add_then_switch_by_tag() {
    let repo = TestRepo::new();
    repo.wk().args(["create", "feature/login"]).assert().success();
    repo.wk().args(["create", "feature/billing"]).assert().success();

    repo.wk().args(["tag", "add", "login", "ui"]).assert().success();
    repo.wk().args(["tag", "add", "login", "auth"]).assert().success();

    let login = repo.worktrees_root().join("feature-login");
    assert_eq!(
        std::fs::read_to_string(login.join(TAG_FILE)).unwrap(),
        "auth\nui\n"
    );

    let out = stdout_of(repo.wk().args(["tag", "switch", "ui"]).assert().success());
    assert_eq!(out.trim_end(), login.display().to_string());

    let shown = stdout_of(repo.wk().args(["tag", "show", "login"]).assert().success());
    assert_eq!(shown, "auth\nui\n");
}

#[test]
fn test_tag_file_does_not_dirty_worktree() {
    let repo = TestRepo::new();
    repo.wk().args(["create", "feature/login"]).assert().success();
    repo.wk().args(["tag", "add", "login", "ui"]).assert().success();

    let login = repo.worktrees_root().join("feature-login");
    assert_eq!(run_git(&login, &["status", "--porcelain"]), "");
    let exclude = std::fs::read_to_string(repo.root_path().join(".git/info/exclude")).unwrap();
    assert_eq!(exclude.lines().filter(|l| *l == TAG_FILE).count(), 1);

    // A second tag does not append the pattern again
    repo.wk().args(["tag", "add", "login", "auth"]).assert().success();
    let exclude = std::fs::read_to_string(repo.root_path().join(".git/info/exclude")).unwrap();
    assert_eq!(exclude.lines().filter(|l| *l == TAG_FILE).count(), 1);
}

#[test]
fn test_unknown_tag_fails() {
    let repo = TestRepo::new();
    repo.wk().args(["create", "feature/login"]).assert().success();

    let assert = repo.wk().args(["tag", "switch", "ops"]).assert().failure().code(1);
    let stderr = String::from_utf8_lossy(&assert.get_output().stderr).into_owned();
    assert!(stderr.contains("No worktree is tagged ops"), "{stderr}");
    assert!(assert.get_output().stdout.is_empty());
}

#[test]
fn test_tag_is_matched_as_whole_word() {
    let repo = TestRepo::new();
    repo.wk().args(["create", "feature/login"]).assert().success();
    repo.wk().args(["tag", "add", "login", "ui-kit"]).assert().success();

    repo.wk().args(["tag", "switch", "ui"]).assert().success();
    repo.wk().args(["tag", "switch", "uik"]).assert().failure();
}

#[test]
fn test_tag_lookup_ignores_surrounding_spaces() {
    let repo = TestRepo::new();
    repo.wk().args(["create", "feature/login"]).assert().success();
    repo.wk().args(["tag", "add", "login", " ui"]).assert().success();

    let login = repo.worktrees_root().join("feature-login");
    assert_eq!(std::fs::read_to_string(login.join(TAG_FILE)).unwrap(), "ui\n");

    let out = stdout_of(repo.wk().args(["tag", "switch", " ui "]).assert().success());
    assert_eq!(out.trim_end(), login.display().to_string());
}
