//! Orchestrator for complete update runs
//!
//! Ties the phases together for the two update families. The scratch
//! directory is emptied before retrieval and removed afterwards, whether the
//! merge succeeded or not; only a successful run reports a failed removal,
//! as a warning on the report.

use crate::config::{CompiledProfileConfig, CompiledTranslationConfig};
use crate::error::{Error, Result};
use crate::filesystem::{remove_file_if_exists, ScratchDir};
use crate::manifest::{build_profile_manifest, build_translation_manifest, Manifest};
use crate::org::OrgConnection;
use crate::project::Project;

use super::{enter, profiles, translations, Phase, UpdateReport};

/// Runs a profile update against `org`.
pub fn run_profile_update(
    project: &Project,
    config: &CompiledProfileConfig,
    org: &dyn OrgConnection,
) -> Result<UpdateReport> {
    enter(Phase::Start);
    let manifest = build_profile_manifest(config, org)?;
    enter(Phase::ManifestBuilt);

    let scratch = retrieve(project, &manifest, org)?;
    let mut report = UpdateReport::default();
    let outcome = profiles::execute(project, scratch.path(), config, &mut report);
    finish(project, scratch, outcome, report)
}

/// Runs a translation update against `org`.
pub fn run_translation_update(
    project: &Project,
    config: &CompiledTranslationConfig,
    org: &dyn OrgConnection,
) -> Result<UpdateReport> {
    enter(Phase::Start);
    let plan = build_translation_manifest(config, org)?;
    enter(Phase::ManifestBuilt);

    let scratch = retrieve(project, &plan.manifest, org)?;
    let mut report = UpdateReport::default();
    let outcome = translations::execute(project, scratch.path(), config, &plan, &mut report);
    finish(project, scratch, outcome, report)
}

fn retrieve(project: &Project, manifest: &Manifest, org: &dyn OrgConnection) -> Result<ScratchDir> {
    let manifest_path = project.manifest_path();
    manifest.write(&manifest_path)?;
    log::debug!("manifest written to {}", manifest_path.display());

    let scratch = ScratchDir::acquire(project.scratch_dir())?;
    if let Err(e) = org.retrieve(&manifest_path, scratch.path()) {
        discard(project, scratch);
        return Err(e);
    }
    enter(Phase::Retrieved);
    Ok(scratch)
}

/// Cleans up after a failed run; the original error wins.
fn discard(project: &Project, scratch: ScratchDir) {
    if let Err(e) = cleanup(project, scratch) {
        log::warn!("{}", e);
    }
}

fn cleanup(project: &Project, scratch: ScratchDir) -> Result<()> {
    let released = scratch.release();
    if let Err(e) = remove_file_if_exists(&project.manifest_path()) {
        log::debug!("could not remove manifest: {}", e);
    }
    released
}

fn finish(
    project: &Project,
    scratch: ScratchDir,
    outcome: Result<()>,
    mut report: UpdateReport,
) -> Result<UpdateReport> {
    if let Err(e) = outcome {
        discard(project, scratch);
        return Err(e);
    }

    match cleanup(project, scratch) {
        Ok(()) => enter(Phase::CleanedUp),
        Err(e @ Error::CleanupFailed { .. }) => {
            log::warn!("{}", e);
            report.cleanup_warning = Some(e.to_string());
        }
        Err(e) => return Err(e),
    }

    report.success = true;
    enter(Phase::Done);
    Ok(report)
}
