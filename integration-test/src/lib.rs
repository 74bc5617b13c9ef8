//! Test driver for argparser integration tests.
//!
//! Builds the workspace's `example` binary once, then runs it with a
//! fixed COLUMNS so the help screen's width does not depend on the
//! terminal the tests happen to run in. stdout, stderr and the exit
//! code are captured for assertions.

use std::process::Command;
use std::sync::Once;

static BUILD_INIT: Once = Once::new();

fn target_dir() -> String {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    format!("{manifest_dir}/../target/debug")
}

fn example_binary() -> String {
    format!("{}/example", target_dir())
}

/// Build the example binary if not already done.
fn ensure_binary() {
    BUILD_INIT.call_once(|| {
        let manifest_dir = env!("CARGO_MANIFEST_DIR");
        let workspace_root = format!("{manifest_dir}/..");
        let status = Command::new("cargo")
            .args(["build", "-p", "argparser"])
            .current_dir(&workspace_root)
            .status()
            .expect("failed to run cargo build");
        assert!(status.success(), "cargo build -p argparser failed");
    });
}

/// Output captured from a completed example run.
pub struct RunOutput {
    pub stdout: String,
    pub stderr: String,
    pub code: i32,
}

/// Run the example binary with the given arguments at terminal width 80.
pub fn run_example(args: &[&str]) -> RunOutput {
    ensure_binary();
    let output = Command::new(example_binary())
        .args(args)
        .env("COLUMNS", "80")
        .output()
        .expect("failed to run example");
    RunOutput {
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        code: output.status.code().unwrap_or(-1),
    }
}
