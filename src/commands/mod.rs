//! # CLI Command Implementations
//!
//! This module contains the implementation for each subcommand of the
//! `sf-toolbox` command-line tool. Each subcommand is defined in its own file.
//!
//! ## Structure
//!
//! Each command module contains:
//! - An `Args` struct that defines the command-specific arguments and options,
//!   derived using `clap`.
//! - An `execute` function that takes the parsed `Args` and performs the
//!   command's logic by calling into the `sf_toolbox` library.
//!
//! `init-config` and `update` exist once per [`Family`]; the family decides
//! which configuration document and which update pipeline they use.

pub mod completions;
pub mod init;
pub mod update;

use std::path::{Path, PathBuf};

use sf_toolbox::defaults;

/// The two kinds of metadata the tool updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    Profiles,
    Translations,
}

impl Family {
    /// Subcommand name, as typed on the command line.
    pub fn command_name(self) -> &'static str {
        match self {
            Family::Profiles => "profiles",
            Family::Translations => "translations",
        }
    }

    /// Default configuration path for a project rooted at `root`.
    pub fn config_path(self, root: &Path) -> PathBuf {
        match self {
            Family::Profiles => defaults::profile_config_path(root),
            Family::Translations => defaults::translation_config_path(root),
        }
    }

    /// Command that creates the configuration template.
    pub fn init_command(self) -> String {
        format!("sf-toolbox {} init-config", self.command_name())
    }
}

/// `--project-dir`, or the current directory.
pub fn project_root(project_dir: Option<PathBuf>) -> anyhow::Result<PathBuf> {
    match project_dir {
        Some(dir) => Ok(dir),
        None => Ok(std::env::current_dir()?),
    }
}
