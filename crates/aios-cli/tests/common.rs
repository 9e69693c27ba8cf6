#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::assert::Assert;
use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use serde_json::Value;
use tempfile::TempDir;

/// A scratch workspace root plus a directory for project checkouts.
pub struct Sandbox {
    pub temp: TempDir,
}

impl Sandbox {
    pub fn new(prefix: &str) -> Self {
        let temp = tempfile::Builder::new()
            .prefix(prefix)
            .tempdir()
            .expect("tempdir");
        Self { temp }
    }

    pub fn workspace(&self) -> PathBuf {
        self.temp.path().join("ws")
    }

    pub fn inventory_path(&self) -> PathBuf {
        self.workspace().join("projects").join("inventory.json")
    }

    /// Where the link for a tracked project path lands.
    pub fn link_for(&self, project: &Path) -> PathBuf {
        let name = aios_domain::link_name(path_str(project)).expect("link name");
        self.workspace().join("projects").join("links").join(name)
    }

    pub fn project_dir(&self, name: &str) -> PathBuf {
        let dir = self.temp.path().join("repos").join(name);
        fs::create_dir_all(&dir).expect("create project dir");
        dir
    }

    pub fn aios(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("aios");
        cmd.current_dir(self.temp.path())
            .env("AIOS_WORKSPACE_DIR", self.workspace())
            .env("NO_COLOR", "1")
            .env_remove("AIOS_WATCH_INTERVAL_MS");
        cmd
    }

    pub fn json(&self, args: &[&str]) -> (i32, Value) {
        let assert = self.aios().arg("--json").args(args).assert();
        let code = assert.get_output().status.code().expect("exit code");
        (code, parse_json(&assert))
    }
}

pub fn parse_json(assert: &Assert) -> Value {
    serde_json::from_slice(&assert.get_output().stdout).expect("valid json")
}

pub fn path_str(path: &Path) -> &str {
    path.to_str().expect("utf-8 path")
}
