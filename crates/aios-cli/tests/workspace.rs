use std::fs;

mod common;

use common::{path_str, Sandbox};

#[test]
fn empty_workspace_is_healthy() {
    let sandbox = Sandbox::new("aios-ws-empty");
    let (code, payload) = sandbox.json(&["workspace", "validate"]);
    assert_eq!(code, 0);
    assert_eq!(payload["details"]["healthy"], true);
    assert_eq!(payload["message"], "aios workspace validate: all links healthy");
}

#[test]
fn repair_creates_missing_links() {
    let sandbox = Sandbox::new("aios-ws-repair");
    let repo = sandbox.project_dir("repo1");
    sandbox
        .aios()
        .args(["project", "track", path_str(&repo)])
        .assert()
        .success();

    let (code, validated) = sandbox.json(&["workspace", "validate"]);
    assert_eq!(code, 0);
    assert_eq!(validated["details"]["healthy"], false);
    assert_eq!(validated["details"]["counts"]["missing"], 1);
    assert_eq!(validated["details"]["reports"][0]["status"], "missing");

    let (_, plan) = sandbox.json(&["workspace", "plan"]);
    assert_eq!(plan["details"]["actions"][0]["kind"], "create");
    assert_eq!(plan["details"]["actions"][0]["reason"], "link missing");
    assert!(!sandbox.link_for(&repo).exists(), "plan must not write");

    let (code, repaired) = sandbox.json(&["workspace", "repair"]);
    assert_eq!(code, 0, "{repaired}");
    assert_eq!(repaired["details"]["healthy"], true);
    assert_eq!(repaired["details"]["applied"][0]["kind"], "create");

    let link = sandbox.link_for(&repo);
    let meta = fs::symlink_metadata(&link).expect("link exists");
    assert!(meta.file_type().is_symlink());
    assert_eq!(fs::read_link(&link).unwrap(), repo);

    let (_, validated) = sandbox.json(&["workspace", "validate"]);
    assert_eq!(validated["details"]["healthy"], true);
    assert_eq!(validated["details"]["counts"]["ok"], 1);
}

#[cfg(unix)]
#[test]
fn broken_link_is_repointed() {
    let sandbox = Sandbox::new("aios-ws-broken");
    let repo = sandbox.project_dir("repo1");
    sandbox
        .aios()
        .args(["project", "track", path_str(&repo)])
        .assert()
        .success();
    let link = sandbox.link_for(&repo);
    fs::create_dir_all(link.parent().unwrap()).unwrap();
    std::os::unix::fs::symlink(sandbox.temp.path().join("stale"), &link).unwrap();

    let (_, validated) = sandbox.json(&["workspace", "validate"]);
    assert_eq!(validated["details"]["reports"][0]["status"], "broken");

    let (code, repaired) = sandbox.json(&["workspace", "repair"]);
    assert_eq!(code, 0);
    assert_eq!(repaired["details"]["applied"][0]["kind"], "repair");
    assert_eq!(fs::read_link(&link).unwrap(), repo);
}

#[test]
fn conflicting_file_is_left_alone() {
    let sandbox = Sandbox::new("aios-ws-conflict");
    let repo = sandbox.project_dir("repo1");
    sandbox
        .aios()
        .args(["project", "track", path_str(&repo)])
        .assert()
        .success();
    let link = sandbox.link_for(&repo);
    fs::create_dir_all(link.parent().unwrap()).unwrap();
    fs::write(&link, "keep me").unwrap();

    let (_, validated) = sandbox.json(&["workspace", "validate"]);
    assert_eq!(validated["details"]["counts"]["conflict"], 1);

    let (_, plan) = sandbox.json(&["workspace", "plan"]);
    assert_eq!(plan["details"]["actions"][0]["kind"], "skip");
    assert_eq!(
        plan["details"]["actions"][0]["reason"],
        "non-symlink conflict at link path"
    );

    let (code, repaired) = sandbox.json(&["workspace", "repair"]);
    assert_eq!(code, 0);
    assert_eq!(repaired["details"]["healthy"], false);
    assert!(repaired["details"]["applied"].as_array().unwrap().is_empty());
    assert_eq!(fs::read_to_string(&link).unwrap(), "keep me");
}

#[test]
fn quiet_mode_prints_nothing_on_success() {
    let sandbox = Sandbox::new("aios-ws-quiet");
    let assert = sandbox
        .aios()
        .args(["-q", "workspace", "validate"])
        .assert()
        .success();
    assert!(assert.get_output().stdout.is_empty());
}

#[test]
fn nested_projects_link_side_by_side() {
    let sandbox = Sandbox::new("aios-ws-nested");
    let parent = sandbox.project_dir("mono");
    let child = parent.join("pkg");
    for project in [&parent, &child] {
        sandbox
            .aios()
            .args(["project", "track", path_str(project)])
            .assert()
            .success();
    }

    let (code, repaired) = sandbox.json(&["workspace", "repair"]);
    assert_eq!(code, 0, "{repaired}");
    assert_eq!(repaired["details"]["healthy"], true);
    assert_eq!(repaired["details"]["applied"].as_array().unwrap().len(), 2);

    let (_, validated) = sandbox.json(&["workspace", "validate"]);
    assert_eq!(validated["details"]["counts"]["ok"], 2);
    assert_eq!(
        sandbox.link_for(&child).parent(),
        sandbox.link_for(&parent).parent()
    );
    assert!(fs::symlink_metadata(&child).is_err());
}
