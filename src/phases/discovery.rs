//! Phase 3: Pairing
//!
//! Finds the documents of one kind in the scratch directory and in the
//! project's package directories, and matches them by component name
//! (`Admin` for `Admin.profile-meta.xml`).
//!
//! When the same component exists in several package directories the first
//! one found wins; the default package directory is searched first.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::document::DocumentKind;
use crate::error::Result;
use crate::filesystem::find_files_with_suffix;
use crate::project::Project;

/// Documents of one kind, by component name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComponentIndex {
    components: BTreeMap<String, PathBuf>,
}

impl ComponentIndex {
    /// Indexes `paths`; files that are not of `kind` are ignored.
    pub fn from_paths(kind: DocumentKind, paths: impl IntoIterator<Item = PathBuf>) -> Self {
        let mut components = BTreeMap::new();
        for path in paths {
            if let Some(name) = kind.component_name(&path) {
                components.entry(name).or_insert(path);
            }
        }
        Self { components }
    }

    /// Indexes every document of `kind` below `root`.
    pub fn scan(kind: DocumentKind, root: &Path) -> Result<Self> {
        Ok(Self::from_paths(kind, find_files_with_suffix(root, kind.suffix())?))
    }

    /// Indexes every local document of `kind` in `project`.
    pub fn scan_project(kind: DocumentKind, project: &Project) -> Result<Self> {
        Ok(Self::from_paths(kind, project.find_local(kind.suffix())?))
    }

    pub fn get(&self, name: &str) -> Option<&Path> {
        self.components.get(name).map(PathBuf::as_path)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.components.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

/// A local document and its retrieved counterpart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityPair {
    pub name: String,
    pub local: PathBuf,
    pub retrieved: PathBuf,
}

/// Result of matching local against retrieved documents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pairing {
    pub pairs: Vec<EntityPair>,
    /// Local components the org did not return.
    pub local_only: Vec<String>,
    /// Retrieved components with no local file.
    pub retrieved_only: Vec<String>,
}

/// Matches `local` and `retrieved` by component name.
pub fn pair(local: &ComponentIndex, retrieved: &ComponentIndex) -> Pairing {
    let mut pairing = Pairing::default();
    for (name, retrieved_path) in &retrieved.components {
        match local.get(name) {
            Some(local_path) => pairing.pairs.push(EntityPair {
                name: name.clone(),
                local: local_path.to_path_buf(),
                retrieved: retrieved_path.clone(),
            }),
            None => pairing.retrieved_only.push(name.clone()),
        }
    }
    pairing.local_only = local
        .names()
        .filter(|name| retrieved.get(name).is_none())
        .map(str::to_string)
        .collect();
    pairing
}
