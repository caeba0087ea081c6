#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;
use url::Url;

/// An isolated HOME plus a local account directory to serve as the service.
pub struct Sandbox {
    dir: TempDir,
    pub home: PathBuf,
    pub service: String,
}

impl Sandbox {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let home = dir.path().join("home");
        std::fs::create_dir_all(&home).unwrap();
        let service = file_service_url(&dir.path().join("service"));
        Self { dir, home, service }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Run the CLI against this sandbox's service.
    pub fn run(&self, args: &[&str]) -> Output {
        self.run_with_service(args, &self.service)
    }

    pub fn run_with_service(&self, args: &[&str], service: &str) -> Output {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_sesame"));
        cmd.args(args);
        cmd.env("HOME", &self.home);
        cmd.env("XDG_DATA_HOME", self.home.join("data"));
        cmd.env("SESAME_SERVICE", service);
        cmd.env("SESAME_BCRYPT_COST", "4");
        cmd.env("NO_COLOR", "1");
        cmd.env_remove("RUST_LOG");
        cmd.output().expect("Failed to execute CLI")
    }

    /// Run the CLI and expect success, returning stdout.
    pub fn run_success(&self, args: &[&str]) -> String {
        let output = self.run(args);
        if !output.status.success() {
            panic!(
                "CLI command failed: {:?}\nstderr: {}",
                args,
                String::from_utf8_lossy(&output.stderr)
            );
        }
        String::from_utf8_lossy(&output.stdout).to_string()
    }

    /// Run the CLI and expect failure, returning stderr.
    pub fn run_failure(&self, args: &[&str]) -> String {
        let output = self.run(args);
        if output.status.success() {
            panic!(
                "CLI command unexpectedly succeeded: {:?}\nstdout: {}",
                args,
                String::from_utf8_lossy(&output.stdout)
            );
        }
        String::from_utf8_lossy(&output.stderr).to_string()
    }

    pub fn register(&self, name: &str, email: &str, password: &str) -> String {
        self.run_success(&[
            "register",
            "--name",
            name,
            "--email",
            email,
            "--password",
            password,
        ])
    }

    /// `status --json` parsed.
    pub fn status_json(&self) -> serde_json::Value {
        let stdout = self.run_success(&["status", "--json"]);
        serde_json::from_str(&stdout).expect("status --json should print JSON")
    }
}

pub fn file_service_url(path: &Path) -> String {
    Url::from_directory_path(path)
        .expect("Failed to convert path to file URL")
        .to_string()
}
