// persistence.rs

use std::fs;

use linehistory::{Encoding, HistoryConfig, HistoryError, HistoryStore, HistoryTarget};

fn lines(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn write_then_reopen_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("history");
    let config = HistoryConfig::default().with_path(&path);

    let mut store = HistoryStore::new(config.clone(), lines(&["cd /tmp", "ls -la", "cd /tmp"])).unwrap();
    store.write_history_file(None).unwrap();

    let reopened = HistoryStore::open(config).unwrap();
    assert_eq!(reopened, store);
    assert_eq!(reopened.cursor(), 3);
}

#[test]
fn reopen_is_bounded_by_max_length() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("history");
    let config = HistoryConfig::default().with_path(&path).with_max_length(2);

    let seed: Vec<String> = (0..5).map(|i| format!("cmd {i}")).collect();
    let mut store = HistoryStore::new(config.clone(), seed).unwrap();
    store.write_history_file(None).unwrap();

    let reopened = HistoryStore::open(config).unwrap();
    assert_eq!(reopened.entries(), ["cmd 3", "cmd 4"]);
}

#[test]
fn negative_max_length_writes_everything() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("history");
    let config = HistoryConfig::default().with_path(&path).with_max_length(-1);

    let seed: Vec<String> = (0..250).map(|i| format!("cmd {i}")).collect();
    let mut store = HistoryStore::new(config, seed).unwrap();
    store.write_history_file(None).unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap().lines().count(), 250);
}

#[test]
fn explicit_path_overrides_target() {
    let dir = tempfile::tempdir().unwrap();
    let default = dir.path().join("default");
    let other = dir.path().join("other");
    let mut store =
        HistoryStore::new(HistoryConfig::default().with_path(&default), lines(&["a"])).unwrap();

    store.write_history_file(Some(other.as_path())).unwrap();
    assert_eq!(fs::read_to_string(&other).unwrap(), "a\n");
    assert!(!default.exists());
    assert_eq!(store.target(), &HistoryTarget::File(default));
}

#[test]
fn appends_from_two_sessions_concatenate() {
    let dir = tempfile::tempdir().unwrap();
    let shared = dir.path().join("shared");
    let config = HistoryConfig::default().with_path(&shared);

    let mut first = HistoryStore::new(config.clone(), lines(&["a1", "a2", "a3"])).unwrap();
    let mut second = HistoryStore::new(config, lines(&["b1", "b2"])).unwrap();

    first.append_history_file(2, None).unwrap();
    second.append_history_file(1, None).unwrap();

    assert_eq!(fs::read_to_string(&shared).unwrap(), "a2\na3\nb2\n");
}

#[test]
fn write_replaces_previous_contents() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("history");
    fs::write(&path, "old\nstuff\n").unwrap();

    let mut store = HistoryStore::new(HistoryConfig::default().with_path(&path), lines(&["new"])).unwrap();
    store.write_history_file(None).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "new\n");
}

#[test]
fn flush_full_leaves_bounded_tail() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("history");
    let config = HistoryConfig::default().with_path(&path).with_max_length(2);

    let mut store = HistoryStore::new(config, lines(&["a", "b", "c"])).unwrap();
    store.flush(None, true).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "b\nc\n");
}

#[test]
fn opening_a_missing_file_gives_empty_history() {
    let dir = tempfile::tempdir().unwrap();
    let config = HistoryConfig::default().with_path(dir.path().join("nope"));
    let store = HistoryStore::open(config).unwrap();
    assert!(store.is_empty());
}

#[test]
fn reading_dedups_adjacent_and_skips_blank_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("history");
    fs::write(&path, "ls\nls\n\r\n\npwd\r\nls\n").unwrap();

    let store = HistoryStore::open(HistoryConfig::default().with_path(&path)).unwrap();
    assert_eq!(store.entries(), ["ls", "pwd", "ls"]);
}

#[test]
fn undecodable_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("history");
    fs::write(&path, b"ls\n\xc3\x28\n").unwrap();

    let err = HistoryStore::open(HistoryConfig::default().with_path(&path)).unwrap_err();
    assert!(matches!(err, HistoryError::Decode { line: 2, encoding: Encoding::Utf8, .. }));

    let latin = HistoryConfig::default().with_path(&path).with_encoding(Encoding::Latin1);
    assert_eq!(HistoryStore::open(latin).unwrap().len(), 2);
}

#[test]
fn directory_as_history_file_degrades() {
    let dir = tempfile::tempdir().unwrap();
    let mut store =
        HistoryStore::new(HistoryConfig::default().with_path(dir.path()), lines(&["a"])).unwrap();
    store.read_history_file(None, None).unwrap();
    store.write_history_file(None).unwrap();
    assert_eq!(store.entries(), ["a"]);
}

#[cfg(unix)]
#[test]
fn unreadable_file_is_a_permission_error() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("history");
    fs::write(&path, "ls\n").unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o000)).unwrap();

    // root ignores file modes
    if fs::read(&path).is_ok() {
        return;
    }
    let err = HistoryStore::open(HistoryConfig::default().with_path(&path)).unwrap_err();
    assert!(matches!(err, HistoryError::PermissionDenied { .. }));
}
