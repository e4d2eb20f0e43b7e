//! Salesforce project layout.
//!
//! A project is a directory holding `sfdx-project.json`. Its
//! `packageDirectories` say where local metadata lives; the one flagged
//! `default` (or the first) receives files the tool creates.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::defaults;
use crate::error::{Error, Result};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProjectDescriptor {
    #[serde(default)]
    package_directories: Vec<PackageDirectoryEntry>,
}

#[derive(Debug, Deserialize)]
struct PackageDirectoryEntry {
    path: String,
    #[serde(default)]
    default: bool,
}

/// A loaded Salesforce project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    root: PathBuf,
    /// Absolute package directories; the default one first.
    package_dirs: Vec<PathBuf>,
}

impl Project {
    /// Loads the project descriptor found in `root`.
    pub fn load(root: &Path) -> Result<Self> {
        let descriptor_path = root.join(defaults::PROJECT_DESCRIPTOR);
        if !descriptor_path.is_file() {
            return Err(Error::Project {
                message: format!("{} not found in {}", defaults::PROJECT_DESCRIPTOR, root.display()),
                hint: Some(
                    "run the command from a Salesforce project or pass --project-dir".to_string(),
                ),
            });
        }

        let content = std::fs::read_to_string(&descriptor_path)?;
        let descriptor: ProjectDescriptor =
            serde_json::from_str(&content).map_err(|e| Error::Project {
                message: format!("invalid {}: {}", descriptor_path.display(), e),
                hint: None,
            })?;

        let mut entries = descriptor.package_directories;
        if entries.is_empty() {
            return Err(Error::Project {
                message: format!("{} declares no packageDirectories", descriptor_path.display()),
                hint: Some("add at least one entry such as {\"path\": \"force-app\", \"default\": true}".to_string()),
            });
        }
        // Stable sort keeps declaration order among non-default entries.
        entries.sort_by_key(|entry| !entry.default);

        let package_dirs = entries
            .into_iter()
            .map(|entry| root.join(entry.path.trim_end_matches('/')))
            .collect();

        Ok(Self {
            root: root.to_path_buf(),
            package_dirs,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn package_dirs(&self) -> &[PathBuf] {
        &self.package_dirs
    }

    /// `<default package dir>/main/default`, where new files are placed.
    pub fn default_source_dir(&self) -> PathBuf {
        self.package_dirs[0].join("main").join("default")
    }

    pub fn working_dir(&self) -> PathBuf {
        defaults::working_dir(&self.root)
    }

    pub fn scratch_dir(&self) -> PathBuf {
        self.working_dir().join(defaults::SCRATCH_DIR_NAME)
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.working_dir().join(defaults::MANIFEST_FILE_NAME)
    }

    /// Local files ending with `suffix` across every package directory.
    pub fn find_local(&self, suffix: &str) -> Result<Vec<PathBuf>> {
        let mut found = Vec::new();
        for dir in &self.package_dirs {
            found.extend(crate::filesystem::find_files_with_suffix(dir, suffix)?);
        }
        Ok(found)
    }
}
