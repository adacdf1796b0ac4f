use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;
use wtkit::{Config, Repository};

/// Environment every git and `wk` process in the tests runs with.
const ISOLATED_ENV: &[(&str, &str)] = &[
    ("GIT_CONFIG_GLOBAL", "/dev/null"),
    ("GIT_CONFIG_SYSTEM", "/dev/null"),
    ("GIT_AUTHOR_NAME", "Test User"),
    ("GIT_AUTHOR_EMAIL", "test@example.com"),
    ("GIT_COMMITTER_NAME", "Test User"),
    ("GIT_COMMITTER_EMAIL", "test@example.com"),
    ("LC_ALL", "C"),
    ("LANG", "C"),
];

/// A real repository `main/` on branch `main`, an empty worktrees root `wt/`
/// and an empty config file, all inside one temp directory.
pub struct TestRepo {
    temp_dir: TempDir,
    root: PathBuf,
    worktrees_root: PathBuf,
    config_path: PathBuf,
}

impl TestRepo {
    /// Create a new test repository with one commit
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        // Canonicalize to resolve symlinks (important on macOS where /var is symlink to /private/var)
        let base = temp_dir
            .path()
            .canonicalize()
            .expect("Failed to canonicalize temp path");
        let root = base.join("main");
        let worktrees_root = base.join("wt");
        let config_path = base.join("config.toml");
        std::fs::create_dir(&root).expect("Failed to create main repo directory");
        std::fs::write(&config_path, "").expect("Failed to write config");

        let repo = Self {
            temp_dir,
            root,
            worktrees_root,
            config_path,
        };
        repo.git(&["init", "-q", "-b", "main"]);
        // Identity in the local config so that git run by wk itself can commit
        repo.git(&["config", "user.name", "Test User"]);
        repo.git(&["config", "user.email", "test@example.com"]);
        repo.git(&["config", "commit.gpgsign", "false"]);
        repo.commit_file(&repo.root, "README.md", "hello\n", "Initial commit");
        repo
    }

    /// Same as [`TestRepo::new`], with a bare `origin` that has `main` pushed.
    pub fn with_origin() -> Self {
        let repo = Self::new();
        let origin = repo.origin_path();
        run_git(repo.temp_dir.path(), &["init", "-q", "--bare", "-b", "main", path_str(&origin)]);
        repo.git(&["remote", "add", "origin", path_str(&origin)]);
        repo.git(&["push", "-q", "-u", "origin", "main"]);
        repo
    }

    pub fn root_path(&self) -> &Path {
        &self.root
    }

    pub fn worktrees_root(&self) -> &Path {
        &self.worktrees_root
    }

    pub fn origin_path(&self) -> PathBuf {
        self.temp_dir.path().join("origin.git")
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn repository(&self) -> Repository {
        Repository::at(&self.root)
    }

    pub fn config(&self) -> Config {
        Config::with_root(&self.worktrees_root)
    }

    /// Run git in the main repository
    pub fn git(&self, args: &[&str]) -> String {
        run_git(&self.root, args)
    }

    /// Write `name` in `dir` and commit it there
    pub fn commit_file(&self, dir: &Path, name: &str, content: &str, message: &str) {
        std::fs::write(dir.join(name), content).expect("Failed to write file");
        run_git(dir, &["add", name]);
        run_git(dir, &["commit", "-q", "-m", message]);
    }

    /// Push a branch straight into origin without touching any worktree.
    pub fn push_remote_branch(&self, branch: &str) {
        self.git(&["branch", branch]);
        self.git(&["push", "-q", "origin", branch]);
        self.git(&["branch", "-D", branch]);
    }

    pub fn head(&self, dir: &Path) -> String {
        run_git(dir, &["rev-parse", "HEAD"]).trim().to_string()
    }

    /// `wk` pointed at this fixture's root and config
    pub fn wk(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::Command::cargo_bin("wk").expect("wk binary");
        cmd.current_dir(&self.root)
            .arg("--root")
            .arg(&self.worktrees_root)
            .env("WK_CONFIG_PATH", &self.config_path)
            .env("HOME", self.temp_dir.path())
            .env("NO_COLOR", "1")
            .env_remove("RUST_LOG");
        for (key, val) in ISOLATED_ENV {
            cmd.env(key, val);
        }
        cmd
    }
}

pub fn run_git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .envs(ISOLATED_ENV.iter().copied())
        .output()
        .expect("Failed to execute git");
    if !output.status.success() {
        panic!(
            "git {:?} failed:\nstdout: {}\nstderr: {}",
            args,
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
    }
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn path_str(path: &Path) -> &str {
    path.to_str().expect("temp paths are UTF-8")
}
