//! Test helpers for behavioral specifications.
//!
//! Provides a small DSL for running lpd against an isolated log directory.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, dead_code)]

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Output, Stdio};

// Short rollover interval so idle checks run during tests.
const LP_ROLLOVER_CHECK_MS: &str = "50";

// Spec polling timeouts
pub const SPEC_POLL_INTERVAL_MS: u64 = 10;
pub const SPEC_WAIT_MAX_MS: u64 = 2000;

/// Returns the path to a binary, checking llvm-cov target directory first.
/// Falls back to resolving relative to the test binary itself when
/// CARGO_MANIFEST_DIR is stale.
fn binary_path(name: &str) -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));

    let llvm_cov_path = manifest_dir.join("target/llvm-cov-target/debug").join(name);
    if llvm_cov_path.exists() {
        return llvm_cov_path;
    }

    let standard = manifest_dir.join("target/debug").join(name);
    if standard.exists() {
        return standard;
    }

    // The test binary lives at target/debug/deps/specs-<hash>, so its
    // grandparent is target/debug/ where lpd is built.
    if let Ok(exe) = std::env::current_exe() {
        if let Some(debug_dir) = exe.parent().and_then(|d| d.parent()) {
            let fallback = debug_dir.join(name);
            if fallback.exists() {
                return fallback;
            }
        }
    }

    standard
}

/// Returns the path to the lpd binary.
pub fn lpd_binary() -> PathBuf {
    binary_path("lpd")
}

/// Minimal config: both directories, empty head so documents stay short.
pub const MINIMAL_CONFIG: &str = r##"
plaintext_log_dir = "{plain}"
html_log_dir = "{html}"
room = "#specs"
extra_head = ""
"##;

// =============================================================================
// Polling
// =============================================================================

/// Poll a condition until it returns true or timeout is reached.
pub fn wait_for<F>(timeout_ms: u64, mut condition: F) -> bool
where
    F: FnMut() -> bool,
{
    let start = std::time::Instant::now();
    let timeout = std::time::Duration::from_millis(timeout_ms);
    let poll_interval = std::time::Duration::from_millis(SPEC_POLL_INTERVAL_MS);

    while start.elapsed() < timeout {
        if condition() {
            return true;
        }
        std::thread::sleep(poll_interval);
    }
    false
}

// =============================================================================
// Host events
// =============================================================================

pub fn connected() -> String {
    r#"{"event":"connected"}"#.to_string()
}

pub fn message(timestamp: &str, sender: &str, roles: &[&str], text: &str) -> String {
    serde_json::json!({
        "event": "message",
        "timestamp": timestamp,
        "sender": sender,
        "roles": roles,
        "text": text,
    })
    .to_string()
}

/// Join event lines into stdin input
pub fn input(lines: &[String]) -> String {
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

// =============================================================================
// Logger
// =============================================================================

/// Isolated log, state and config directories for one lpd run.
pub struct Logger {
    dir: tempfile::TempDir,
}

impl Logger {
    /// Logger with the minimal config written
    pub fn new() -> Self {
        let logger = Self::without_config();
        logger.config(MINIMAL_CONFIG);
        logger
    }

    /// Logger with no config file yet
    pub fn without_config() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn plain_dir(&self) -> PathBuf {
        self.path().join("plain")
    }

    pub fn html_dir(&self) -> PathBuf {
        self.path().join("html")
    }

    pub fn state_dir(&self) -> PathBuf {
        self.path().join("state")
    }

    /// Write config.toml; `{plain}` and `{html}` expand to the log dirs
    pub fn config(&self, body: &str) {
        let body = body
            .replace("{plain}", &self.plain_dir().to_string_lossy())
            .replace("{html}", &self.html_dir().to_string_lossy());
        std::fs::write(self.path().join("config.toml"), body).unwrap();
    }

    /// Command for lpd with this logger's environment
    pub fn command(&self) -> Command {
        let mut cmd = Command::new(lpd_binary());
        cmd.env_remove("XDG_CONFIG_HOME")
            .env_remove("XDG_STATE_HOME")
            .env("LP_CONFIG", self.path().join("config.toml"))
            .env("LP_STATE_DIR", self.state_dir())
            .env("LP_ROLLOVER_CHECK_MS", LP_ROLLOVER_CHECK_MS)
            .env("RUST_LOG", "debug");
        cmd
    }

    /// Run lpd to completion with `stdin` as host input
    pub fn run(&self, stdin: &str) -> RunAssert {
        let mut child = self.spawn();
        // lpd may exit before reading input (e.g. on a config error)
        let _ = child.stdin.take().unwrap().write_all(stdin.as_bytes());
        let output = child.wait_with_output().unwrap();
        RunAssert { output }
    }

    /// Start lpd with stdin left open
    pub fn spawn(&self) -> Child {
        self.command()
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .unwrap()
    }

    /// Contents of the only plaintext transcript
    pub fn plaintext(&self) -> String {
        read_single(&self.plain_dir(), ".log")
    }

    /// Contents of the only HTML transcript
    pub fn html(&self) -> String {
        read_single(&self.html_dir(), ".log.html")
    }

    /// Whether exactly one HTML transcript exists yet
    pub fn has_html(&self) -> bool {
        std::fs::read_dir(self.html_dir())
            .map(|entries| entries.count() == 1)
            .unwrap_or(false)
    }

    /// Read the daemon log file contents (for debugging test failures)
    pub fn daemon_log(&self) -> String {
        std::fs::read_to_string(self.state_dir().join("lpd.log"))
            .unwrap_or_else(|_| "(no daemon log)".to_string())
    }
}

fn read_single(dir: &Path, suffix: &str) -> String {
    let files: Vec<PathBuf> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .filter(|p| p.to_string_lossy().ends_with(suffix))
        .collect();
    assert_eq!(files.len(), 1, "expected one *{suffix} in {}: {files:?}", dir.display());
    std::fs::read_to_string(&files[0]).unwrap()
}

/// Send a signal to a running child
pub fn send_signal(child: &Child, signal: &str) {
    let status = Command::new("kill")
        .args([signal, &child.id().to_string()])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .unwrap();
    assert!(status.success(), "kill {signal} failed");
}

/// Result of an lpd run for chaining assertions
pub struct RunAssert {
    output: Output,
}

impl RunAssert {
    pub fn from_output(output: Output) -> Self {
        Self { output }
    }

    pub fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.output.stdout).into_owned()
    }

    pub fn stderr(&self) -> String {
        String::from_utf8_lossy(&self.output.stderr).into_owned()
    }

    /// Assert exit code 0
    pub fn passes(self) -> Self {
        assert!(
            self.output.status.success(),
            "expected lpd to pass, got exit code {:?}\nstdout: {}\nstderr: {}",
            self.output.status.code(),
            self.stdout(),
            self.stderr()
        );
        self
    }

    /// Assert non-zero exit code
    pub fn fails(self) -> Self {
        assert!(
            !self.output.status.success(),
            "expected lpd to fail, but it passed\nstdout: {}\nstderr: {}",
            self.stdout(),
            self.stderr()
        );
        self
    }

    /// Assert stdout contains substring.
    pub fn stdout_has(self, expected: &str) -> Self {
        let stdout = self.stdout();
        assert!(
            stdout.contains(expected),
            "stdout does not contain '{}'\nstdout: {}",
            expected,
            stdout
        );
        self
    }

    /// Assert stderr contains substring.
    pub fn stderr_has(self, expected: &str) -> Self {
        let stderr = self.stderr();
        assert!(
            stderr.contains(expected),
            "stderr does not contain '{}'\nstderr: {}",
            expected,
            stderr
        );
        self
    }
}
