#![allow(dead_code)]

use std::path::PathBuf;

use assert_cmd::Command;
use tempfile::TempDir;

/// Build a CLI command with PAGECHAIN_HOME pointed at the temp directory.
#[allow(deprecated)]
pub fn pagechain(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("pagechain").unwrap();
    cmd.env("PAGECHAIN_HOME", home.path());
    cmd.env_remove("RUST_LOG");
    cmd
}

/// Write `config.yaml` into the home directory.
pub fn write_config(home: &TempDir, yaml: &str) -> PathBuf {
    let path = home.path().join("config.yaml");
    std::fs::write(&path, yaml).unwrap();
    path
}

/// Record `pages` in order under `session`.
pub fn record_session(home: &TempDir, session: &str, pages: &[u32]) {
    for page in pages {
        pagechain(home)
            .args(["record", &page.to_string(), "--session-id", session])
            .assert()
            .success();
    }
}
