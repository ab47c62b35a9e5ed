// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use craizy_core::test_support::agent;
use tempfile::tempdir;

#[test]
fn open_missing_file_starts_empty() {
    let dir = tempdir().unwrap();
    let store = JsonStore::open(dir.path().join("agents.json")).unwrap();
    assert!(store.list().is_empty());
    assert!(!store.path().exists());
}

#[test]
fn mutations_survive_reopen() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state").join("agents.json");
    let a = agent("demo", "claude", "task1");
    let b = agent("demo", "claude", "task2");

    {
        let store = JsonStore::open(&path).unwrap();
        store.add(a.clone()).unwrap();
        store.add(b.clone()).unwrap();
        store.update_status(&a.id, AgentStatus::Terminated, 5_000).unwrap();
        store.remove(&b.id).unwrap();
    }

    let store = JsonStore::open(&path).unwrap();
    let agents = store.list();
    assert_eq!(agents.len(), 1);
    assert_eq!(agents[0].id, a.id);
    assert_eq!(agents[0].status, AgentStatus::Terminated);
    assert_eq!(agents[0].terminated_at_ms, Some(5_000));
}

#[test]
fn snapshot_file_is_versioned() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("agents.json");
    let store = JsonStore::open(&path).unwrap();
    store.add(agent("demo", "claude", "task1")).unwrap();

    let json: serde_json::Value = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
    assert_eq!(json["v"], CURRENT_SNAPSHOT_VERSION);
    assert_eq!(json["agents"][0]["id"], "craizy-demo-claude-task1");
    assert!(!path.with_extension("tmp").exists());
}

#[test]
fn failed_mutation_leaves_file_untouched() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("agents.json");
    let store = JsonStore::open(&path).unwrap();
    let a = agent("demo", "claude", "task1");
    store.add(a.clone()).unwrap();
    let before = std::fs::read(&path).unwrap();

    assert!(matches!(store.add(a), Err(StoreError::Duplicate(_))));
    assert_eq!(std::fs::read(&path).unwrap(), before);
}

#[test]
fn failed_write_rolls_back_memory() {
    let dir = tempdir().unwrap();
    // A directory where the file should be makes the rename fail
    let path = dir.path().join("agents.json");
    std::fs::create_dir_all(path.join("blocker")).unwrap();
    let store = JsonStore { path: path.clone(), index: Mutex::new(AgentIndex::default()) };

    let a = agent("demo", "claude", "task1");
    assert!(matches!(store.add(a.clone()), Err(StoreError::Io { .. })));
    assert!(!store.exists(&a.id));
}

#[test]
fn corrupt_file_is_reported() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("agents.json");
    std::fs::write(&path, "not json").unwrap();

    let err = JsonStore::open(&path).unwrap_err();
    assert!(matches!(err, StoreError::Json { .. }));
}
