//! Shared testing utilities for vibeprompt CLI tests.

#![allow(dead_code)]

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Isolated data directory plus a command builder pointed at it.
pub struct TestContext {
    root: TempDir,
}

impl TestContext {
    pub fn new() -> Self {
        let root = TempDir::new().expect("Failed to create temp directory for tests");
        Self { root }
    }

    pub fn data_dir(&self) -> &Path {
        self.root.path()
    }

    /// Build a command for the compiled `vibeprompt` binary with a clean
    /// environment and `--data-dir` pointing at the temp directory.
    pub fn cli(&self) -> Command {
        let mut cmd = Command::cargo_bin("vibeprompt").expect("Failed to locate vibeprompt binary");
        cmd.current_dir(self.root.path())
            .env_remove("OPENAI_API_KEY")
            .env_remove("OPENAI_MODEL")
            .env_remove("VIBEPROMPT_DATA_DIR")
            .env_remove("VIBEPROMPT_LOG")
            .arg("--data-dir")
            .arg(self.root.path());
        cmd
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.root.path().join(relative)
    }

    pub fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.path(relative))
            .unwrap_or_else(|e| panic!("Failed to read {}: {}", relative, e))
    }

    pub fn write(&self, relative: &str, content: &str) {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        fs::write(&path, content).expect("Failed to write test file");
    }

    /// Parse the current `config.json`.
    pub fn config(&self) -> serde_json::Value {
        serde_json::from_str(&self.read("config.json")).expect("config.json should be valid JSON")
    }

    /// Write a project core for the default project.
    pub fn write_default_core(&self, purpose: &str, principles: &str, direction: &str) {
        self.write(
            "project.core.md",
            &format!(
                "# Project Core\n\n## Purpose\n{}\n\n## Philosophy / Principles\n{}\n\n## Long-term Direction\n{}\n",
                purpose, principles, direction
            ),
        );
    }

    /// Create an agent in the default project through the CLI.
    pub fn create_agent(&self, id: &str, name: &str, role: &str) {
        self.cli()
            .args(["agent", "create", id, "--name", name, "--role", role])
            .assert()
            .success();
    }
}
