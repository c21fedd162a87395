// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Helpers shared by the specs

use std::path::{Path, PathBuf};

use assert_cmd::Command;

/// The binary with a clean environment.
pub fn cli() -> Run {
    let mut cmd = Command::cargo_bin("prepalert").unwrap();
    cmd.env_remove("PREPALERT_CONFIG")
        .env_remove("PREPALERT_LOG")
        .env_remove("MACKEREL_APIKEY")
        .env_remove("MACKEREL_API_BASE")
        .env("NO_COLOR", "1");
    Run { cmd }
}

pub struct Run {
    cmd: Command,
}

impl Run {
    pub fn args(mut self, args: &[&str]) -> Self {
        self.cmd.args(args);
        self
    }

    pub fn env(mut self, key: &str, value: impl AsRef<std::ffi::OsStr>) -> Self {
        self.cmd.env(key, value);
        self
    }

    pub fn stdin(mut self, input: &str) -> Self {
        self.cmd.write_stdin(input.to_string());
        self
    }

    pub fn passes(mut self) -> Outcome {
        let output = self.cmd.output().unwrap();
        let outcome = Outcome::from(output);
        assert_eq!(outcome.code, Some(0), "expected success\n{outcome}");
        outcome
    }

    pub fn exits_with(mut self, code: i32) -> Outcome {
        let output = self.cmd.output().unwrap();
        let outcome = Outcome::from(output);
        assert_eq!(outcome.code, Some(code), "unexpected exit code\n{outcome}");
        outcome
    }
}

pub struct Outcome {
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl From<std::process::Output> for Outcome {
    fn from(output: std::process::Output) -> Self {
        Self {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "code: {:?}\n--- stdout ---\n{}\n--- stderr ---\n{}", self.code, self.stdout, self.stderr)
    }
}

impl Outcome {
    pub fn stdout_has(self, needle: &str) -> Self {
        assert!(self.stdout.contains(needle), "stdout lacks {needle:?}\n{self}");
        self
    }

    pub fn stderr_has(self, needle: &str) -> Self {
        assert!(self.stderr.contains(needle), "stderr lacks {needle:?}\n{self}");
        self
    }

    pub fn stdout_eq(self, expected: &str) -> Self {
        similar_asserts::assert_eq!(self.stdout, expected);
        self
    }
}

/// A temporary directory holding configuration and events.
pub struct Project {
    dir: tempfile::TempDir,
}

impl Project {
    pub fn empty() -> Self {
        Self { dir: tempfile::tempdir().unwrap() }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, content).unwrap();
        path
    }

    /// The binary pointed at this project's configuration.
    pub fn prepalert(&self) -> Run {
        cli().env("PREPALERT_CONFIG", self.path())
    }
}

/// A closed-alert webhook for monitor `monitor`.
pub fn closed_event(alert_id: &str, monitor: &str) -> String {
    serde_json::json!({
        "orgName": "Example-Org",
        "event": "alert",
        "memo": "",
        "alert": {
            "id": alert_id,
            "monitorName": monitor,
            "status": "ok",
            "isOpen": false,
            "openedAt": 1_700_000_000,
            "closedAt": 1_700_000_600,
            "createdAt": 1_700_000_000_000_i64,
            "trigger": "monitor",
            "duration": 10,
            "url": format!("https://mackerel.io/orgs/Example-Org/alerts/{alert_id}"),
        }
    })
    .to_string()
}
