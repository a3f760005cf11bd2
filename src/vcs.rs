use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result, anyhow};

use crate::model::{Against, LineDelta, RawCounts};

/// Source of per-file line counts.
pub trait NumstatSource: Send + Sync {
    /// `Ok(None)` means the tool produced no usable row for the file.
    fn fetch_numstat(&self, path: &Path, against: Against) -> Result<Option<LineDelta>>;

    fn is_under_version_control(&self, path: &Path) -> bool;

    /// Whether `path` sits inside a working tree at all, tracked or not.
    fn is_inside_repository(&self, path: &Path) -> bool {
        self.is_under_version_control(path)
    }
}

/// Fetches the full staged/unstaged picture for one file.
///
/// Never fails: an untracked file inside a repository reports its line count
/// as unstaged additions, and everything else that goes wrong reports zeros.
pub fn fetch_raw_counts(source: &dyn NumstatSource, path: &Path) -> RawCounts {
    if !source.is_under_version_control(path) {
        if path.is_file() && source.is_inside_repository(path) {
            return match count_file_lines(path) {
                Ok(lines) => RawCounts::untracked(lines),
                Err(err) => {
                    tracing::warn!(path = %path.display(), "count untracked lines: {:#}", err);
                    RawCounts::default()
                }
            };
        }
        return RawCounts::default();
    }

    let staged = source.fetch_numstat(path, Against::Staged);
    let unstaged = source.fetch_numstat(path, Against::Unstaged);
    match (staged, unstaged) {
        (Ok(staged), Ok(unstaged)) => {
            RawCounts::from_deltas(staged.unwrap_or_default(), unstaged.unwrap_or_default())
        }
        (Err(err), _) | (_, Err(err)) => {
            tracing::warn!(path = %path.display(), "fetch numstat: {:#}", err);
            RawCounts::default()
        }
    }
}

pub(crate) fn count_file_lines(path: &Path) -> Result<u64> {
    let bytes = fs::read(path).with_context(|| format!("read {}", path.display()))?;
    Ok(String::from_utf8_lossy(&bytes).lines().count() as u64)
}

/// Parses the first `added<TAB>removed<TAB>path` row of `git diff --numstat`.
///
/// Binary files report `-` for both columns, which counts as zero.
pub(crate) fn parse_numstat(output: &str) -> Option<LineDelta> {
    let line = output.lines().find(|l| !l.trim().is_empty())?;
    let mut parts = line.splitn(3, '\t');
    let added = parts.next()?.trim();
    let removed = parts.next()?.trim();
    let parse = |s: &str| -> Option<u64> {
        if s == "-" { Some(0) } else { s.parse().ok() }
    };
    Some(LineDelta::new(parse(added)?, parse(removed)?))
}

/// [`NumstatSource`] backed by the `git` executable.
#[derive(Clone, Debug)]
pub struct GitCli {
    program: PathBuf,
}

impl Default for GitCli {
    fn default() -> Self {
        Self {
            program: PathBuf::from("git"),
        }
    }
}

impl GitCli {
    fn run(&self, path: &Path, args: &[&str]) -> Result<std::process::Output> {
        let dir = work_dir(path);
        // File names are paths, not globs: `[id].tsx` must not match `d.tsx`.
        Command::new(&self.program)
            .args(args)
            .env("GIT_LITERAL_PATHSPECS", "1")
            .current_dir(&dir)
            .output()
            .with_context(|| format!("run {} {}", self.program.display(), args.join(" ")))
    }

    fn run_ok(&self, path: &Path, args: &[&str]) -> Result<String> {
        let output = self.run(path, args)?;
        if !output.status.success() {
            return Err(anyhow!(
                "git {} failed: {}",
                args.join(" "),
                String::from_utf8_lossy(&output.stderr).trim()
            ));
        }
        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    /// Text shown by the diff view when a segment is activated.
    pub fn diff_text(&self, path: &Path) -> Result<String> {
        let name = file_arg(path);
        if !self.is_under_version_control(path) {
            return self.untracked_diff_text(path, &name);
        }
        match self.run_ok(path, &["diff", "HEAD", "--", name.as_str()]) {
            Ok(text) => Ok(text),
            // No HEAD yet (fresh repository): fall back to index vs worktree.
            Err(_) => self.run_ok(path, &["diff", "--", name.as_str()]),
        }
    }

    /// Whole file as additions; `--no-index` exits 1 when the sides differ.
    fn untracked_diff_text(&self, path: &Path, name: &str) -> Result<String> {
        let args = ["diff", "--no-index", "--", "/dev/null", name];
        let output = self.run(path, &args)?;
        match output.status.code() {
            Some(0 | 1) => Ok(String::from_utf8_lossy(&output.stdout).to_string()),
            _ => Err(anyhow!(
                "git {} failed: {}",
                args.join(" "),
                String::from_utf8_lossy(&output.stderr).trim()
            )),
        }
    }

    /// `.git/index` for the repository containing `path`, if any.
    pub fn index_path(&self, path: &Path) -> Option<PathBuf> {
        let out = self
            .run_ok(path, &["rev-parse", "--git-path", "index"])
            .ok()?;
        let rel = PathBuf::from(out.trim());
        Some(if rel.is_absolute() {
            rel
        } else {
            work_dir(path).join(rel)
        })
    }
}

impl NumstatSource for GitCli {
    fn fetch_numstat(&self, path: &Path, against: Against) -> Result<Option<LineDelta>> {
        let name = file_arg(path);
        let mut args = vec!["diff", "--numstat"];
        if against == Against::Staged {
            args.push("--cached");
        }
        args.extend(["--", name.as_str()]);
        let out = self.run_ok(path, &args)?;
        if out.trim().is_empty() {
            return Ok(Some(LineDelta::default()));
        }
        Ok(parse_numstat(&out))
    }

    fn is_under_version_control(&self, path: &Path) -> bool {
        let name = file_arg(path);
        self.run(path, &["ls-files", "--error-unmatch", "--", name.as_str()])
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    fn is_inside_repository(&self, path: &Path) -> bool {
        self.run_ok(path, &["rev-parse", "--is-inside-work-tree"])
            .map(|out| out.trim() == "true")
            .unwrap_or(false)
    }
}

fn work_dir(path: &Path) -> PathBuf {
    if path.is_dir() {
        return path.to_path_buf();
    }
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn file_arg(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| ".".to_string())
}

#[cfg(test)]
#[path = "tests/vcs_tests.rs"]
mod tests;
