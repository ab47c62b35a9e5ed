//! Project-level specs that need no tmux server or git repository.

use crate::prelude::*;

#[test]
fn list_in_empty_project() {
    let project = Project::empty();
    project.craizy().args(&["list"]).passes().stdout_has("No agents");
}

#[test]
fn list_json_in_empty_project() {
    let project = Project::empty();
    let ran = project.craizy().args(&["list", "--json"]).passes();
    let agents: serde_json::Value = serde_json::from_str(&ran.stdout()).unwrap();
    assert_eq!(agents, serde_json::json!([]));
}

#[test]
fn project_dir_flag_overrides_cwd() {
    let project = Project::empty();
    cli()
        .args(&["list", "--project-dir", project.path().to_str().unwrap()])
        .passes()
        .stdout_has("No agents");
    assert!(project.state("craizy.log").exists());
}

#[test]
fn reconcile_without_session_backend_succeeds() {
    let project = Project::empty();
    project
        .craizy()
        .args(&["reconcile"])
        .passes()
        .stdout_has("orphan check skipped");
}

#[test]
fn startup_marks_dead_agents_terminated() {
    let project = Project::empty();
    project.file(
        ".craizy/agents.json",
        r#"{
  "v": 1,
  "saved_at": "2026-01-01T00:00:00Z",
  "agents": [
    {
      "id": "craizy-specs-claude-task1",
      "project": "specs",
      "agent_type": "claude",
      "name": "task1",
      "command": "echo hi",
      "work_dir": "/tmp",
      "status": "active",
      "created_at_ms": 1000
    }
  ]
}"#,
    );

    project.craizy().args(&["list"]).passes().stdout_has("No agents");

    let store: serde_json::Value = serde_json::from_str(&project.read(".craizy/agents.json")).unwrap();
    let agent = &store["agents"][0];
    assert_eq!(agent["status"], "terminated");
    assert!(agent["terminated_at_ms"].as_u64().unwrap() > 1000);
}

#[test]
fn kill_unknown_agent_fails() {
    let project = Project::empty();
    project
        .craizy()
        .args(&["kill", "craizy-specs-claude-nope"])
        .fails()
        .stderr_has("agent not found: craizy-specs-claude-nope");
}

#[test]
fn abort_merge_requires_version_control() {
    let project = Project::empty();
    project
        .craizy()
        .args(&["abort-merge"])
        .fails()
        .stderr_has("version control is not enabled");
}

#[test]
fn malformed_config_is_reported() {
    let project = Project::empty();
    project.file(".craizy/config.toml", "[git\nenabled = ");
    project.craizy().args(&["list"]).fails().stderr_has("invalid config");
}
