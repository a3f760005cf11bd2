#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result};

/// Throwaway git repository in a temp dir.
pub struct GitRepo {
    root: PathBuf,
    _dir: tempfile::TempDir,
}

pub fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

impl GitRepo {
    pub fn init() -> Result<Self> {
        let dir = tempfile::tempdir().context("create repo tempdir")?;
        let root = fs::canonicalize(dir.path()).context("canonicalize repo dir")?;
        let repo = Self { root, _dir: dir };
        repo.git(&["init", "-q"])?;
        repo.git(&["config", "user.email", "dev@example.com"])?;
        repo.git(&["config", "user.name", "Dev"])?;
        repo.git(&["config", "commit.gpgsign", "false"])?;
        Ok(repo)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.root.join(rel)
    }

    pub fn write(&self, rel: &str, contents: &str) -> Result<PathBuf> {
        let path = self.path(rel);
        fs::write(&path, contents).with_context(|| format!("write {}", rel))?;
        Ok(path)
    }

    pub fn git(&self, args: &[&str]) -> Result<String> {
        let out = Command::new("git")
            .args(args)
            .current_dir(&self.root)
            .output()
            .with_context(|| format!("run git {:?}", args))?;
        if !out.status.success() {
            anyhow::bail!(
                "git {:?} failed: {}",
                args,
                String::from_utf8_lossy(&out.stderr)
            );
        }
        Ok(String::from_utf8_lossy(&out.stdout).to_string())
    }

    pub fn commit_all(&self, message: &str) -> Result<()> {
        self.git(&["add", "-A"])?;
        self.git(&["commit", "-q", "-m", message])?;
        Ok(())
    }
}

pub fn numbered_lines(prefix: &str, range: std::ops::Range<usize>) -> String {
    range.map(|i| format!("{}{}\n", prefix, i)).collect()
}

/// Repo with `tracked.txt` carrying 5 staged removals, 25 staged additions,
/// 12 unstaged removals and 38 unstaged additions.
pub fn repo_with_mixed_changes() -> Result<(GitRepo, PathBuf)> {
    let repo = GitRepo::init()?;
    let base = numbered_lines("line", 0..20);
    repo.write("tracked.txt", &base)?;
    repo.commit_all("base")?;

    let staged = format!(
        "{}{}",
        numbered_lines("line", 5..20),
        numbered_lines("staged", 0..25)
    );
    repo.write("tracked.txt", &staged)?;
    repo.git(&["add", "tracked.txt"])?;

    let worktree = format!(
        "{}{}{}",
        numbered_lines("line", 17..20),
        numbered_lines("staged", 0..25),
        numbered_lines("work", 0..38)
    );
    let path = repo.write("tracked.txt", &worktree)?;
    Ok((repo, path))
}
