//! Daemon help and version specs
//!
//! Verify lpd --help, --version, and related flags work without reading
//! any config.

use crate::prelude::*;
use std::process::Command;

fn lpd() -> Command {
    let mut cmd = Command::new(lpd_binary());
    // Point config at nothing so any accidental load fails loudly
    cmd.env("LP_CONFIG", "/nonexistent/lpd/config.toml");
    cmd
}

#[test]
fn lpd_version_shows_version() {
    let output = lpd().arg("--version").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.starts_with("lpd 0.1.0"),
        "expected version, got: {stdout}"
    );
}

#[test]
fn lpd_short_version_shows_version() {
    for flag in ["-v", "-V"] {
        let output = lpd().arg(flag).output().unwrap();
        assert!(output.status.success(), "{flag} should succeed");
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.starts_with("lpd "), "{flag}: got {stdout}");
    }
}

#[test]
fn lpd_help_shows_usage() {
    let output = lpd().arg("--help").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("USAGE:"),
        "expected USAGE section, got: {stdout}"
    );
    assert!(stdout.contains("--help"), "expected --help in output");
    assert!(stdout.contains("--version"), "expected --version in output");
    assert!(stdout.contains("LP_CONFIG"), "expected config hint in output");
}

#[test]
fn lpd_short_help_shows_usage() {
    for flag in ["-h", "help"] {
        let output = lpd().arg(flag).output().unwrap();
        assert!(output.status.success(), "{flag} should succeed");
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains("USAGE:"), "{flag}: got {stdout}");
    }
}

#[test]
fn lpd_unknown_arg_fails() {
    let output = lpd().arg("--bogus").output().unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("unexpected argument"),
        "expected error message, got: {stderr}"
    );
}
