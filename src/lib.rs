//! # dep mirror registry
//!
//! This library lets a dependency-management tool redirect fetches of a
//! package path to an alternate repository ("mirror"). Mirrors are kept in a
//! per-user `mirrors.yaml` file and loaded into a [`MirrorRegistry`] for
//! lookups during dependency resolution.
//!
//! ## Quick Example
//!
//! ```
//! use dep_mirror::mirrors::MirrorEntry;
//! use dep_mirror::operations::{self, AddOutcome};
//! use dep_mirror::registry::MirrorRegistry;
//!
//! let home = tempfile::tempdir().unwrap();
//! let path = dep_mirror::home::mirrors_path(home.path());
//!
//! let outcome = operations::add(
//!     &path,
//!     MirrorEntry::new("golang.org/x/sys", "https://github.com/golang/sys.git", "git"),
//! )
//! .unwrap();
//! assert_eq!(outcome, AddOutcome::Created { new_file: true });
//!
//! let mut registry = MirrorRegistry::new();
//! registry.load(home.path()).unwrap();
//! let mirror = registry.get("golang.org/x/sys").unwrap();
//! assert_eq!(mirror.repo, "https://github.com/golang/sys.git");
//! ```
//!
//! ## Modules
//!
//! - **`home`**: resolves the per-user `.dep` directory.
//! - **`mirrors`**: the `mirrors.yaml` schema and its reader and writer.
//! - **`registry`**: the in-memory lookup table built from the file.
//! - **`operations`**: add, remove, and list against the file.

pub mod defaults;
pub mod error;
pub mod home;
pub mod mirrors;
pub mod operations;
pub mod output;
pub mod registry;

pub use registry::{Mirror, MirrorRegistry};
