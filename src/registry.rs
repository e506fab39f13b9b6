//! In-memory registry of configured mirrors.
//!
//! A [`MirrorRegistry`] is built once at startup from the user's
//! `mirrors.yaml` and handed to whatever performs dependency resolution. It is
//! not refreshed when the file changes; call [`MirrorRegistry::load`] again to
//! pick up new state.

use std::collections::HashMap;
use std::path::Path;

use crate::error::Result;
use crate::home;
use crate::mirrors;

/// Replacement source for a prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mirror {
    pub repo: String,
    pub vcs: String,
}

/// Mapping from package prefix to its mirror.
#[derive(Debug, Clone, Default)]
pub struct MirrorRegistry {
    mirrors: HashMap<String, Mirror>,
}

impl MirrorRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry loaded from the resolved dep home.
    pub fn load_default() -> Result<Self> {
        let mut registry = Self::new();
        registry.load(home::home())?;
        Ok(registry)
    }

    /// Replace the registry contents with the mirror file under `home`.
    ///
    /// A missing file leaves the registry empty. On a read or parse error the
    /// current contents are kept and the error is returned.
    pub fn load(&mut self, home: &Path) -> Result<()> {
        let path = home::mirrors_path(home);
        let Some(document) = mirrors::load_document(&path)? else {
            self.mirrors.clear();
            return Ok(());
        };

        self.mirrors.clear();
        for entry in document.repos {
            let mirror = Mirror {
                repo: entry.repo,
                vcs: entry.vcs,
            };
            if self.mirrors.insert(entry.prefix.clone(), mirror).is_some() {
                log::warn!(
                    "Duplicate mirror prefix {} in {}; using the last entry",
                    entry.prefix,
                    path.display()
                );
            }
        }

        log::debug!("Loaded {} mirror(s) from {}", self.mirrors.len(), path.display());
        Ok(())
    }

    /// Look up the mirror configured for exactly `prefix`.
    pub fn get(&self, prefix: &str) -> Option<&Mirror> {
        self.mirrors.get(prefix)
    }

    /// Find the mirror for `import_path` by longest configured prefix.
    ///
    /// A prefix matches the path itself or any path below it on a `/`
    /// boundary, so `k8s.io/api` matches `k8s.io/api/core/v1` but not
    /// `k8s.io/apimachinery`. Returns the matched prefix with its mirror.
    pub fn resolve(&self, import_path: &str) -> Option<(&str, &Mirror)> {
        self.mirrors
            .iter()
            .filter(|(prefix, _)| is_path_prefix(prefix, import_path))
            .max_by_key(|(prefix, _)| prefix.len())
            .map(|(prefix, mirror)| (prefix.as_str(), mirror))
    }

    pub fn len(&self) -> usize {
        self.mirrors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mirrors.is_empty()
    }

    /// Iterate over all `(prefix, mirror)` pairs in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Mirror)> {
        self.mirrors.iter().map(|(k, v)| (k.as_str(), v))
    }
}

fn is_path_prefix(prefix: &str, path: &str) -> bool {
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/') || prefix.ends_with('/'),
        None => false,
    }
}
