//! Shared test utilities for E2E tests.
//!
//! ## Usage
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::new().with_mirrors(mirrors::ONE);
//!     fixture.command().args(["mirror", "--list"]).assert().success();
//! }
//! ```

use assert_fs::prelude::*;
use std::path::{Path, PathBuf};

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    #[allow(unused_imports)]
    pub use assert_fs::prelude::*;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::mirrors;
    pub use super::TestFixture;
}

/// Mirror file contents used across tests.
#[allow(dead_code)]
pub mod mirrors {
    /// One git mirror.
    pub const ONE: &str = r#"repos:
- prefix: k8s.io/apimachinery
  repo: https://github.com/kubernetes/apimachinery.git
  vcs: git
"#;

    /// Three mirrors, the last without a VCS.
    pub const THREE: &str = r#"repos:
- prefix: golang.org/x/sys
  repo: https://github.com/golang/sys.git
  vcs: git
- prefix: cloud.google.com/go
  repo: https://github.com/googleapis/google-cloud-go.git
  vcs: git
- prefix: example.com/lib
  repo: https://mirror.example.com/lib
  vcs: ""
"#;

    /// Empty mirror list.
    pub const EMPTY: &str = "repos: []\n";

    /// Not a valid mirror file.
    pub const INVALID: &str = "repos: [unclosed";
}

/// A temporary dep home directory.
///
/// Commands created through [`TestFixture::command`] point `DEP_HOME` at it,
/// so tests never touch the real `~/.dep`.
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

impl TestFixture {
    /// Create a new test fixture with an empty home directory.
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Write `mirrors.yaml` with the given content.
    pub fn with_mirrors(self, content: &str) -> Self {
        self.temp_dir
            .child("mirrors.yaml")
            .write_str(content)
            .expect("Failed to write mirrors file");
        self
    }

    /// Path of the home directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Path of the mirror file.
    pub fn mirrors_path(&self) -> PathBuf {
        self.temp_dir.path().join("mirrors.yaml")
    }

    /// Contents of the mirror file.
    #[allow(dead_code)]
    pub fn mirrors_content(&self) -> String {
        std::fs::read_to_string(self.mirrors_path()).expect("Failed to read mirrors file")
    }

    /// Create a child path in the home directory.
    #[allow(dead_code)]
    pub fn child(&self, path: &str) -> assert_fs::fixture::ChildPath {
        self.temp_dir.child(path)
    }

    /// Create a `dep` command using this fixture as its home.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("dep");
        cmd.env("DEP_HOME", self.path())
            .env("NO_COLOR", "1")
            .current_dir(self.path());
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}
