use super::*;

use std::time::{Duration, Instant};

fn target(name: &str, file: &str, index: Option<&str>) -> WatchTarget {
    WatchTarget {
        ctx: ContextId(name.to_string()),
        file: PathBuf::from(file),
        index: index.map(PathBuf::from),
    }
}

#[test]
fn file_write_triggers_saved_and_index_write_triggers_vcs_change() {
    let targets = vec![
        target("a", "/r/a.rs", Some("/r/.git/index")),
        target("b", "/r/b.rs", Some("/r/.git/index")),
        target("c", "/other/c.rs", None),
    ];

    let got = triggers_for(&targets, &[PathBuf::from("/r/a.rs")]);
    assert_eq!(got, vec![(ContextId("a".into()), RefreshTrigger::Saved)]);

    let got = triggers_for(
        &targets,
        &[PathBuf::from("/r/.git/index"), PathBuf::from("/r/a.rs")],
    );
    assert_eq!(
        got,
        vec![
            (ContextId("a".into()), RefreshTrigger::Saved),
            (ContextId("b".into()), RefreshTrigger::VcsStateChanged),
        ]
    );
}

#[test]
fn unrelated_paths_trigger_nothing() {
    let targets = vec![target("a", "/r/a.rs", Some("/r/.git/index"))];
    let changed = [
        PathBuf::from("/r/a.rs.swp"),
        PathBuf::from("/r/.git/index.lock"),
        PathBuf::from("/r/b.rs"),
    ];
    assert!(triggers_for(&targets, &changed).is_empty());
}

#[test]
fn parent_directories_are_watched_once() {
    let targets = vec![
        target("a", "/r/a.rs", Some("/r/.git/index")),
        target("b", "/r/b.rs", Some("/r/.git/index")),
    ];
    let dirs: Vec<_> = watched_dirs(&targets).into_iter().collect();
    assert_eq!(dirs, vec![PathBuf::from("/r"), PathBuf::from("/r/.git")]);
}

fn wait_for_trigger(watcher: &ChangeWatcher) -> Vec<(ContextId, RefreshTrigger)> {
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        let got = watcher.drain();
        if !got.is_empty() || Instant::now() > deadline {
            return got;
        }
        std::thread::sleep(Duration::from_millis(20));
    }
}

#[test]
fn saving_and_replacing_files_reach_the_watcher() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let root = std::fs::canonicalize(dir.path())?;
    std::fs::create_dir(root.join(".git"))?;
    let file = root.join("a.rs");
    let index = root.join(".git").join("index");
    std::fs::write(&file, "one\n")?;
    std::fs::write(&index, "v1")?;

    let watcher = ChangeWatcher::new(vec![WatchTarget {
        ctx: ContextId("a".into()),
        file: file.clone(),
        index: Some(index.clone()),
    }])?;

    std::fs::write(&file, "one\ntwo\n")?;
    let got = wait_for_trigger(&watcher);
    assert_eq!(got, vec![(ContextId("a".into()), RefreshTrigger::Saved)]);

    // Drain whatever trailing events the write produced.
    std::thread::sleep(Duration::from_millis(100));
    watcher.drain();

    // The way git swaps in a new index.
    let lock = root.join(".git").join("index.lock");
    std::fs::write(&lock, "v2")?;
    std::fs::rename(&lock, &index)?;
    let got = wait_for_trigger(&watcher);
    assert_eq!(
        got,
        vec![(ContextId("a".into()), RefreshTrigger::VcsStateChanged)]
    );
    Ok(())
}
