//! # Mirror Operations
//!
//! The add, remove, and list operations behind `dep mirror`. Each one reads
//! the mirror file fresh from disk rather than trusting a loaded
//! [`MirrorRegistry`](crate::registry::MirrorRegistry), applies its change in
//! memory, and writes the whole document back.
//!
//! ## Outcomes and Errors
//!
//! "Nothing to do" results (no file, unknown prefix) are outcomes, not
//! errors. Errors come in two flavours the caller must tell apart:
//!
//! - [`Error::Read`](crate::error::Error::Read) means the existing file could
//!   not be parsed. Nothing was changed.
//! - [`Error::Write`](crate::error::Error::Write) means the mutation was
//!   computed but could not be persisted.

use std::path::Path;

use crate::error::Result;
use crate::mirrors::{self, MirrorDocument, MirrorEntry};

/// Result of [`add`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// A new entry was appended.
    Created { new_file: bool },
    /// An existing entry with the same prefix was updated in place.
    Replaced,
}

/// Result of [`remove`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    /// The entry was removed and the file rewritten.
    Removed,
    /// The file exists but holds no entry with that prefix.
    NotFound,
    /// There is no mirror file.
    NoFile,
}

/// An add that has been applied in memory but not yet written.
#[derive(Debug, Clone)]
pub struct PendingAdd {
    document: MirrorDocument,
    outcome: AddOutcome,
}

impl PendingAdd {
    /// What writing this change will do.
    pub fn outcome(&self) -> AddOutcome {
        self.outcome
    }

    /// Writes the updated document to `path`.
    pub fn commit(self, path: &Path) -> Result<AddOutcome> {
        mirrors::write_document(path, &self.document)?;
        Ok(self.outcome)
    }
}

/// Reads the mirror file at `path` and applies `entry` in memory, replacing
/// any entry with the same prefix without moving it.
pub fn prepare_add(path: &Path, entry: MirrorEntry) -> Result<PendingAdd> {
    let (mut document, new_file) = match mirrors::load_document(path)? {
        Some(document) => (document, false),
        None => (MirrorDocument::new(), true),
    };

    let outcome = match upsert(&mut document, entry) {
        AddOutcome::Created { .. } => AddOutcome::Created { new_file },
        replaced => replaced,
    };

    Ok(PendingAdd { document, outcome })
}

/// Adds `entry` to the mirror file at `path`, replacing any entry with the
/// same prefix without moving it.
pub fn add(path: &Path, entry: MirrorEntry) -> Result<AddOutcome> {
    prepare_add(path, entry)?.commit(path)
}

/// Removes the entry for `prefix` from the mirror file at `path`.
///
/// The file is only rewritten when an entry was actually removed.
pub fn remove(path: &Path, prefix: &str) -> Result<RemoveOutcome> {
    let Some(mut document) = mirrors::load_document(path)? else {
        return Ok(RemoveOutcome::NoFile);
    };

    if !remove_entry(&mut document, prefix) {
        return Ok(RemoveOutcome::NotFound);
    }

    mirrors::write_document(path, &document)?;
    Ok(RemoveOutcome::Removed)
}

/// Reads the mirror file at `path` without modifying it.
///
/// Returns `None` when the file does not exist.
pub fn list(path: &Path) -> Result<Option<MirrorDocument>> {
    mirrors::load_document(path)
}

fn upsert(document: &mut MirrorDocument, entry: MirrorEntry) -> AddOutcome {
    match document.repos.iter_mut().find(|e| e.prefix == entry.prefix) {
        Some(existing) => {
            existing.repo = entry.repo;
            existing.vcs = entry.vcs;
            AddOutcome::Replaced
        }
        None => {
            document.repos.push(entry);
            AddOutcome::Created { new_file: false }
        }
    }
}

fn remove_entry(document: &mut MirrorDocument, prefix: &str) -> bool {
    let before = document.repos.len();
    document.repos.retain(|e| e.prefix != prefix);
    document.repos.len() != before
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use proptest::prelude::*;
    use std::fs;
    use tempfile::TempDir;

    fn mirrors_file() -> (TempDir, std::path::PathBuf) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(".dep").join("mirrors.yaml");
        (temp_dir, path)
    }

    fn prefixes(path: &Path) -> Vec<String> {
        mirrors::read_document(path)
            .unwrap()
            .repos
            .into_iter()
            .map(|e| e.prefix)
            .collect()
    }

    #[test]
    fn test_add_creates_file() {
        let (_temp, path) = mirrors_file();

        let outcome = add(
            &path,
            MirrorEntry::new(
                "k8s.io/apimachinery",
                "https://github.com/kubernetes/apimachinery.git",
                "git",
            ),
        )
        .unwrap();

        assert_eq!(outcome, AddOutcome::Created { new_file: true });
        let document = list(&path).unwrap().unwrap();
        assert_eq!(document.len(), 1);
        assert_eq!(
            document.repos[0].to_string(),
            "k8s.io/apimachinery -> https://github.com/kubernetes/apimachinery.git (git)"
        );
    }

    #[test]
    fn test_add_appends_to_existing_file() {
        let (_temp, path) = mirrors_file();
        add(&path, MirrorEntry::new("a", "ra", "git")).unwrap();

        let outcome = add(&path, MirrorEntry::new("b", "rb", "git")).unwrap();

        assert_eq!(outcome, AddOutcome::Created { new_file: false });
        assert_eq!(prefixes(&path), vec!["a", "b"]);
    }

    #[test]
    fn test_add_replaces_in_place() {
        let (_temp, path) = mirrors_file();
        for prefix in ["a", "b", "c"] {
            add(&path, MirrorEntry::new(prefix, format!("r{}", prefix), "git")).unwrap();
        }

        let outcome = add(&path, MirrorEntry::new("b", "https://new/b", "hg")).unwrap();

        assert_eq!(outcome, AddOutcome::Replaced);
        let document = mirrors::read_document(&path).unwrap();
        assert_eq!(prefixes(&path), vec!["a", "b", "c"]);
        assert_eq!(document.repos[1].repo, "https://new/b");
        assert_eq!(document.repos[1].vcs, "hg");
    }

    #[test]
    fn test_add_with_unparseable_file_does_not_write() {
        let (_temp, path) = mirrors_file();
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "repos: [unclosed").unwrap();

        let err = add(&path, MirrorEntry::new("a", "ra", "git")).unwrap_err();

        assert!(matches!(err, Error::Read { .. }));
        assert_eq!(fs::read_to_string(&path).unwrap(), "repos: [unclosed");
    }

    #[test]
    fn test_add_write_failure_is_write_error() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir(temp_dir.path().join(".mirrors.yaml.tmp")).unwrap();
        let path = temp_dir.path().join("mirrors.yaml");

        let err = add(&path, MirrorEntry::new("a", "ra", "git")).unwrap_err();

        assert!(err.is_write());
        assert!(!path.exists());
    }

    #[test]
    fn test_prepare_add_does_not_write_until_commit() {
        let (_temp, path) = mirrors_file();
        add(&path, MirrorEntry::new("a", "ra", "git")).unwrap();
        let before = fs::read_to_string(&path).unwrap();

        let pending = prepare_add(&path, MirrorEntry::new("a", "https://new/a", "git")).unwrap();

        assert_eq!(pending.outcome(), AddOutcome::Replaced);
        assert_eq!(fs::read_to_string(&path).unwrap(), before);

        assert_eq!(pending.commit(&path).unwrap(), AddOutcome::Replaced);
        assert_eq!(mirrors::read_document(&path).unwrap().repos[0].repo, "https://new/a");
    }

    #[cfg(unix)]
    #[test]
    fn test_add_through_symlinked_file_updates_target() {
        let temp_dir = TempDir::new().unwrap();
        let real = temp_dir.path().join("dotfiles-mirrors.yaml");
        fs::write(&real, "repos: []\n").unwrap();
        let home = temp_dir.path().join(".dep");
        fs::create_dir_all(&home).unwrap();
        let link = home.join("mirrors.yaml");
        std::os::unix::fs::symlink(&real, &link).unwrap();

        let outcome = add(&link, MirrorEntry::new("a", "ra", "git")).unwrap();

        assert_eq!(outcome, AddOutcome::Created { new_file: false });
        assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
        assert_eq!(prefixes(&real), vec!["a"]);
    }

    #[test]
    fn test_remove_without_file() {
        let (_temp, path) = mirrors_file();
        assert_eq!(remove(&path, "a").unwrap(), RemoveOutcome::NoFile);
        assert!(!path.exists());
    }

    #[test]
    fn test_remove_unknown_prefix_leaves_file_untouched() {
        let (_temp, path) = mirrors_file();
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        let original = "# my mirrors\nrepos:\n  - prefix: a\n    repo: ra\n    vcs: git\n";
        fs::write(&path, original).unwrap();

        assert_eq!(remove(&path, "zzz").unwrap(), RemoveOutcome::NotFound);
        assert_eq!(fs::read_to_string(&path).unwrap(), original);
    }

    #[test]
    fn test_remove_preserves_order_and_is_idempotent() {
        let (_temp, path) = mirrors_file();
        for prefix in ["a", "b", "c"] {
            add(&path, MirrorEntry::new(prefix, "r", "git")).unwrap();
        }

        assert_eq!(remove(&path, "b").unwrap(), RemoveOutcome::Removed);
        assert_eq!(prefixes(&path), vec!["a", "c"]);

        assert_eq!(remove(&path, "b").unwrap(), RemoveOutcome::NotFound);
        assert_eq!(prefixes(&path), vec!["a", "c"]);
    }

    #[test]
    fn test_list_missing_and_empty() {
        let (_temp, path) = mirrors_file();
        assert!(list(&path).unwrap().is_none());

        add(&path, MirrorEntry::new("a", "ra", "git")).unwrap();
        remove(&path, "a").unwrap();

        let document = list(&path).unwrap().unwrap();
        assert!(document.is_empty());
    }

    #[test]
    fn test_list_does_not_write() {
        let (_temp, path) = mirrors_file();
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        let original = "repos:\n- {vcs: git, repo: ra, prefix: a}\n";
        fs::write(&path, original).unwrap();

        let document = list(&path).unwrap().unwrap();

        assert_eq!(document.repos[0].prefix, "a");
        assert_eq!(fs::read_to_string(&path).unwrap(), original);
    }

    fn distinct_prefixes() -> impl Strategy<Value = Vec<String>> {
        proptest::collection::btree_set("[a-z]{1,6}(/[a-z]{1,6}){0,2}", 1..8)
            .prop_map(|set| set.into_iter().collect::<Vec<_>>())
            .prop_shuffle()
    }

    proptest! {
        #[test]
        fn prop_upsert_existing_keeps_positions(
            prefixes in distinct_prefixes(),
            pick in any::<prop::sample::Index>(),
        ) {
            let mut document = MirrorDocument {
                repos: prefixes
                    .iter()
                    .map(|p| MirrorEntry::new(p.clone(), "old", "git"))
                    .collect(),
            };
            let target = pick.get(&prefixes).clone();

            let outcome = upsert(&mut document, MirrorEntry::new(target.clone(), "new", "hg"));

            prop_assert_eq!(outcome, AddOutcome::Replaced);
            let order: Vec<String> = document.repos.iter().map(|e| e.prefix.clone()).collect();
            prop_assert_eq!(&order, &prefixes);
            let updated = document.find(&target).unwrap();
            prop_assert_eq!(updated.repo.as_str(), "new");
            prop_assert_eq!(document.repos.iter().filter(|e| e.repo == "new").count(), 1);
        }

        #[test]
        fn prop_remove_entry_keeps_relative_order(
            prefixes in distinct_prefixes(),
            pick in any::<prop::sample::Index>(),
        ) {
            let mut document = MirrorDocument {
                repos: prefixes.iter().map(|p| MirrorEntry::new(p.clone(), "r", "")).collect(),
            };
            let target = pick.get(&prefixes).clone();

            prop_assert!(remove_entry(&mut document, &target));
            prop_assert!(!remove_entry(&mut document, &target));

            let expected: Vec<String> = prefixes.into_iter().filter(|p| *p != target).collect();
            let order: Vec<String> = document.repos.into_iter().map(|e| e.prefix).collect();
            prop_assert_eq!(order, expected);
        }
    }
}
