//! Shared helpers for scheduler-ctl end-to-end tests.
//!
//! Each test runs the compiled binary against a `mockito` server, from an
//! isolated working directory and `HOME` so no developer config is picked up.

#![allow(
    dead_code,
    reason = "Test utilities shared across integration test modules"
)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

pub const ZAI_PROFILE_ID: &str = "5270805b-3731-41da-8710-fe765f2e58be";

/// Path to the compiled scheduler-ctl binary.
pub fn scheduler_ctl_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_scheduler-ctl"))
}

/// Isolated working directory used as both cwd and `HOME`.
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Base command with a clean environment.
    pub fn command(&self) -> Command {
        let mut cmd = Command::new(scheduler_ctl_bin());
        cmd.current_dir(self.path())
            .env("HOME", self.path())
            .env_remove("SCHEDULER_API_URL")
            .env_remove("SCHEDULER_API_TIMEOUT_MS")
            .env_remove("RUST_LOG");
        cmd
    }

    /// Run `scheduler-ctl tasks <args> --api-url <url>`.
    pub fn run_tasks(&self, api_url: &str, args: &[&str]) -> Output {
        self.command()
            .arg("tasks")
            .args(args)
            .args(["--api-url", api_url])
            .output()
            .expect("Failed to execute scheduler-ctl")
    }
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}
