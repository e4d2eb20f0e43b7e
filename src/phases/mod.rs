//! The update pipeline.
//!
//! ## Overview
//!
//! An update run goes through these phases, in order:
//! 1. ManifestBuilt - compile the configuration into a `package.xml`
//! 2. Retrieved - fetch the manifest's components into a scratch directory
//! 3. Paired - match retrieved documents with their local counterparts
//! 4. Merged - graft the selected categories onto the local documents
//! 5. Canonicalized - normalize ordering of every touched document
//! 6. Written - write documents whose bytes changed
//! 7. CleanedUp - remove the scratch directory
//!
//! Any error before CleanedUp aborts the run. A failed cleanup is reported as
//! a warning on an otherwise successful [`UpdateReport`].

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

pub mod discovery;
pub mod orchestrator;
pub mod profiles;
pub mod translations;
pub mod write;

/// Pipeline phase, logged on every transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
    Start,
    ManifestBuilt,
    Retrieved,
    Paired,
    Merged,
    Canonicalized,
    Written,
    CleanedUp,
    Done,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Start => "start",
            Phase::ManifestBuilt => "manifest built",
            Phase::Retrieved => "retrieved",
            Phase::Paired => "paired",
            Phase::Merged => "merged",
            Phase::Canonicalized => "canonicalized",
            Phase::Written => "written",
            Phase::CleanedUp => "cleaned up",
            Phase::Done => "done",
        };
        f.write_str(name)
    }
}

pub(crate) fn enter(phase: Phase) {
    log::debug!("phase: {}", phase);
}

/// Outcome of an update run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReport {
    pub success: bool,
    /// Local documents rewritten after a merge.
    pub written: Vec<PathBuf>,
    /// Retrieved documents copied in because no local copy existed.
    pub copied: Vec<PathBuf>,
    /// Local files or directories removed because the org no longer has them.
    pub deleted: Vec<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cleanup_warning: Option<String>,
}

impl UpdateReport {
    /// True when the run left the project untouched.
    pub fn is_unchanged(&self) -> bool {
        self.written.is_empty() && self.copied.is_empty() && self.deleted.is_empty()
    }

    pub(crate) fn record_written(&mut self, path: PathBuf) {
        log::info!("updated {}", path.display());
        self.written.push(path);
    }

    pub(crate) fn record_copied(&mut self, path: PathBuf) {
        log::info!("created {}", path.display());
        self.copied.push(path);
    }

    pub(crate) fn record_deleted(&mut self, path: PathBuf) {
        log::info!("deleted {}", path.display());
        self.deleted.push(path);
    }
}
