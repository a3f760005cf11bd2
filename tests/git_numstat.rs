use anyhow::Result;

use diffbar::model::{Against, LineDelta, RawCounts};
use diffbar::vcs::{GitCli, NumstatSource, fetch_raw_counts};

mod common;

use common::{GitRepo, git_available, numbered_lines, repo_with_mixed_changes};

#[test]
fn staged_and_unstaged_counts_come_from_git() -> Result<()> {
    if !git_available() {
        eprintln!("skipping: git not found");
        return Ok(());
    }
    let (_repo, path) = repo_with_mixed_changes()?;
    let git = GitCli::default();

    assert!(git.is_under_version_control(&path));
    assert_eq!(
        git.fetch_numstat(&path, Against::Staged)?,
        Some(LineDelta::new(25, 5))
    );
    assert_eq!(
        git.fetch_numstat(&path, Against::Unstaged)?,
        Some(LineDelta::new(38, 12))
    );
    assert_eq!(fetch_raw_counts(&git, &path), RawCounts::new(5, 12, 25, 38));
    Ok(())
}

#[test]
fn clean_tracked_file_has_zero_counts() -> Result<()> {
    if !git_available() {
        eprintln!("skipping: git not found");
        return Ok(());
    }
    let repo = GitRepo::init()?;
    let path = repo.write("clean.txt", &numbered_lines("x", 0..3))?;
    repo.commit_all("clean")?;

    let git = GitCli::default();
    assert_eq!(
        git.fetch_numstat(&path, Against::Unstaged)?,
        Some(LineDelta::default())
    );
    assert_eq!(fetch_raw_counts(&git, &path), RawCounts::default());
    Ok(())
}

#[test]
fn untracked_file_reports_its_lines_as_unstaged_additions() -> Result<()> {
    if !git_available() {
        eprintln!("skipping: git not found");
        return Ok(());
    }
    let repo = GitRepo::init()?;
    repo.write("seed.txt", "seed\n")?;
    repo.commit_all("seed")?;
    let path = repo.write("fresh.txt", &numbered_lines("n", 0..30))?;

    let git = GitCli::default();
    assert!(!git.is_under_version_control(&path));
    assert!(git.is_inside_repository(&path));
    assert_eq!(fetch_raw_counts(&git, &path), RawCounts::untracked(30));
    Ok(())
}

#[test]
fn file_outside_any_repository_reports_zeros() -> Result<()> {
    if !git_available() {
        eprintln!("skipping: git not found");
        return Ok(());
    }
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("loose.txt");
    std::fs::write(&path, "a\nb\n")?;

    let git = GitCli::default();
    if git.is_inside_repository(&path) {
        // Temp dir happens to live inside a work tree; nothing to check.
        return Ok(());
    }
    assert_eq!(fetch_raw_counts(&git, &path), RawCounts::default());
    Ok(())
}

#[test]
fn diff_text_shows_worktree_changes() -> Result<()> {
    if !git_available() {
        eprintln!("skipping: git not found");
        return Ok(());
    }
    let (_repo, path) = repo_with_mixed_changes()?;
    let text = GitCli::default().diff_text(&path)?;
    assert!(text.contains("+work0"));
    assert!(text.contains("-line0"));
    Ok(())
}

#[test]
fn index_path_points_into_git_dir() -> Result<()> {
    if !git_available() {
        eprintln!("skipping: git not found");
        return Ok(());
    }
    let (repo, path) = repo_with_mixed_changes()?;
    let index = GitCli::default().index_path(&path).expect("index path");
    assert!(index.starts_with(repo.root()));
    assert!(index.ends_with(".git/index"));
    assert!(index.is_file());
    Ok(())
}

#[test]
fn bracketed_names_only_match_themselves() -> Result<()> {
    if !git_available() {
        eprintln!("skipping: git not found");
        return Ok(());
    }
    let repo = GitRepo::init()?;
    let route = repo.write("[id].tsx", &numbered_lines("r", 0..5))?;
    repo.write("d.tsx", &numbered_lines("d", 0..5))?;
    repo.commit_all("routes")?;
    repo.write("d.tsx", &numbered_lines("d", 0..40))?;

    let git = GitCli::default();
    assert!(git.is_under_version_control(&route));
    assert_eq!(fetch_raw_counts(&git, &route), RawCounts::default());
    Ok(())
}

#[test]
fn untracked_bracketed_name_is_not_mistaken_for_a_tracked_match() -> Result<()> {
    if !git_available() {
        eprintln!("skipping: git not found");
        return Ok(());
    }
    let repo = GitRepo::init()?;
    repo.write("d.tsx", &numbered_lines("d", 0..5))?;
    repo.commit_all("seed")?;
    repo.write("d.tsx", &numbered_lines("d", 0..8))?;
    let route = repo.write("[id].tsx", &numbered_lines("r", 0..7))?;

    let git = GitCli::default();
    assert!(!git.is_under_version_control(&route));
    assert_eq!(fetch_raw_counts(&git, &route), RawCounts::untracked(7));
    Ok(())
}

#[test]
fn diff_text_of_untracked_file_shows_every_line_added() -> Result<()> {
    if !git_available() {
        eprintln!("skipping: git not found");
        return Ok(());
    }
    let repo = GitRepo::init()?;
    repo.write("seed.txt", "seed\n")?;
    repo.commit_all("seed")?;
    let path = repo.write("fresh.txt", &numbered_lines("new", 0..3))?;

    let text = GitCli::default().diff_text(&path)?;
    assert!(text.contains("+new0"));
    assert!(text.contains("+new2"));
    Ok(())
}
