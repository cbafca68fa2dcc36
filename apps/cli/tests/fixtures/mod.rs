use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A `c3dp` invocation isolated from the caller's settings files.
#[allow(deprecated)]
#[must_use]
pub fn c3dp(workdir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("c3dp").expect("binary is built");
    cmd.current_dir(workdir).env_remove("RUST_LOG");
    cmd
}

/// Writes `contents` to `name` inside `dir`.
pub fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("fixture is written");
    path
}

pub const DEVICE_REPORT: &str = r#"{
    "net.ap.ssid": "Cloud3DP",
    "net.ap.pass": "12345678",
    "net.ap.hide": "0",
    "app.dns.run": "1",
    "app.cmd.prompt": "c3dp> "
}"#;
