//! Default names and locations used by sf-toolbox.
//!
//! This module provides the well-known file and directory names shared by the
//! commands and the update pipeline, so every component resolves the same
//! paths inside a Salesforce project.

use std::path::{Path, PathBuf};

/// Directory, relative to the project root, that holds configs and scratch data.
pub const WORKING_DIR_NAME: &str = ".sf-toolbox";

/// Scratch directory (inside the working dir) that receives retrieved metadata.
pub const SCRATCH_DIR_NAME: &str = "retrieved";

/// File name of the serialized retrieval manifest.
pub const MANIFEST_FILE_NAME: &str = "manifest.xml";

/// File name of the profile update configuration.
pub const PROFILE_CONFIG_FILE_NAME: &str = "profileUpdateConfig.json";

/// File name of the translation update configuration.
pub const TRANSLATION_CONFIG_FILE_NAME: &str = "translationUpdateConfig.json";

/// Salesforce project descriptor.
pub const PROJECT_DESCRIPTOR: &str = "sfdx-project.json";

/// Namespace carried by every Metadata API document root.
pub const METADATA_NAMESPACE: &str = "http://soap.sforce.com/2006/04/metadata";

/// Program used to reach the org when `--sf-bin` is not given.
pub const DEFAULT_SF_BIN: &str = "sf";

/// Returns the working directory of the project at `project_root`.
pub fn working_dir(project_root: &Path) -> PathBuf {
    project_root.join(WORKING_DIR_NAME)
}

/// Returns the conventional profile configuration path.
pub fn profile_config_path(project_root: &Path) -> PathBuf {
    working_dir(project_root).join(PROFILE_CONFIG_FILE_NAME)
}

/// Returns the conventional translation configuration path.
pub fn translation_config_path(project_root: &Path) -> PathBuf {
    working_dir(project_root).join(TRANSLATION_CONFIG_FILE_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_paths_live_in_working_dir() {
        let root = Path::new("/project");
        assert_eq!(
            profile_config_path(root),
            PathBuf::from("/project/.sf-toolbox/profileUpdateConfig.json")
        );
        assert_eq!(
            translation_config_path(root),
            PathBuf::from("/project/.sf-toolbox/translationUpdateConfig.json")
        );
    }
}
