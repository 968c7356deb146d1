//! Shared test utilities for the E2E tests.
//!
//! Add `mod common;` to a test file, then use the helpers:
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::new().with_layout(layouts::SINGLE_REPO);
//!     fixture.command().arg("tree").assert().success();
//! }
//! ```

use assert_fs::prelude::*;
use std::path::{Path, PathBuf};

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use assert_fs::TempDir;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::layouts;
    pub use super::TestFixture;
}

/// Layout bodies. `{root}` is replaced with the fixture's clone root.
#[allow(dead_code)]
pub mod layouts {
    /// One server, one org, one repository.
    pub const SINGLE_REPO: &str = r#"
path: {root}
layout:
  example.com:
    org1: [repoA]
"#;

    /// A fork: cloned from `origin1`, rebased from `upstream1`.
    pub const FORK: &str = r#"
path: {root}
layout:
  example.com:
    dir1|origin1|upstream1: [repoB]
"#;

    /// Two servers with different settings.
    pub const TWO_SERVERS: &str = r#"
path: {root}
layout:
  github.com:
    me: [dots]
  git.example.org:
    team: [api, web]
serverOpts:
  git.example.org:
    scheme: https
    port: 8443
    timeout: 30s
"#;

    /// A scheme that does not exist.
    pub const UNKNOWN_SCHEME: &str = r#"
path: {root}
layout:
  example.com:
    org1: [repoA]
serverOpts:
  example.com:
    scheme: ftp
"#;

    /// Invalid YAML for error testing.
    pub const INVALID_YAML: &str = "layout: [unclosed";
}

/// Stands in for `git`: appends `dir|args` to `$FAKE_GIT_LOG`, creates the
/// directory a clone would and prints a log line for `git log`.
const FAKE_GIT: &str = r#"#!/bin/sh
echo "$(pwd)|$*" >> "$FAKE_GIT_LOG"
case "$1" in
  clone) mkdir -p "$(basename "$2" .git)" ;;
  log) echo "Mon Jan 1 12:00            Alice : initial commit" ;;
  branch) echo "* main" ;;
esac
exit 0
"#;

/// A temporary home directory holding a layout file, a clone root and a
/// directory of fake programs.
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

impl TestFixture {
    /// Create a fixture whose clone root `src/` already exists.
    pub fn new() -> Self {
        let temp_dir = assert_fs::TempDir::new().expect("Failed to create temp directory");
        temp_dir
            .child("src")
            .create_dir_all()
            .expect("Failed to create clone root");
        Self { temp_dir }
    }

    /// Write `.myrepos.yaml` with `{root}` expanded to the clone root.
    pub fn with_layout(self, body: &str) -> Self {
        let root = self.root().display().to_string();
        self.temp_dir
            .child(".myrepos.yaml")
            .write_str(&body.replace("{root}", &root))
            .expect("Failed to write layout file");
        self
    }

    /// Add a file with the given path and content.
    #[allow(dead_code)]
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    /// Install the fake `git` under `bin/`.
    #[allow(dead_code)]
    pub fn with_fake_git(self) -> Self {
        let git = self.temp_dir.child("bin/git");
        git.write_str(FAKE_GIT).expect("Failed to write fake git");
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(git.path(), std::fs::Permissions::from_mode(0o755))
                .expect("Failed to make fake git executable");
        }
        self
    }

    /// Get the path to the temporary directory, which is also `$HOME`.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// The directory repositories are cloned under.
    pub fn root(&self) -> PathBuf {
        self.temp_dir.path().join("src")
    }

    /// Get the path to the layout file.
    #[allow(dead_code)]
    pub fn layout_path(&self) -> PathBuf {
        self.temp_dir.path().join(".myrepos.yaml")
    }

    /// Every git invocation recorded by the fake, as `dir|args`.
    #[allow(dead_code)]
    pub fn git_calls(&self) -> Vec<String> {
        std::fs::read_to_string(self.temp_dir.path().join("git.log"))
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }

    /// Create a command running in this fixture with `$HOME` pointing at it
    /// and the fake programs first on `PATH`.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("myrepos");
        let path = format!("{}:/usr/bin:/bin", self.path().join("bin").display());
        cmd.current_dir(self.path())
            .env("HOME", self.path())
            .env("PATH", path)
            .env("FAKE_GIT_LOG", self.path().join("git.log"))
            .env("NO_COLOR", "1")
            .env_remove("MYREPOS_CONFIG")
            .env_remove("RUST_LOG");
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_creates_root() {
        let fixture = TestFixture::new();
        assert!(fixture.root().is_dir());
    }

    #[test]
    fn test_layouts_are_valid_yaml() {
        for body in [layouts::SINGLE_REPO, layouts::FORK, layouts::TWO_SERVERS] {
            serde_yaml::from_str::<serde_yaml::Value>(&body.replace("{root}", "/src"))
                .expect("Layout should be valid YAML");
        }
    }

    #[test]
    fn test_invalid_yaml_is_actually_invalid() {
        assert!(serde_yaml::from_str::<serde_yaml::Value>(layouts::INVALID_YAML).is_err());
    }
}
