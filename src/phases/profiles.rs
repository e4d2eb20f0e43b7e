//! Phase 4: Profile reconciliation
//!
//! Every local profile with a retrieved counterpart is merged category by
//! category and staged for writing. Profiles present on only one side are
//! left alone: a profile missing locally is not created, and a local profile
//! the org did not return is not touched.

use std::path::Path;

use crate::config::CompiledProfileConfig;
use crate::document::{Document, DocumentKind};
use crate::error::Result;
use crate::merge::profile::apply_profile_update;
use crate::project::Project;

use super::discovery::{pair, ComponentIndex};
use super::write::PendingDocuments;
use super::{enter, Phase, UpdateReport};

/// Merges retrieved profiles into the project and writes the result.
pub fn execute(
    project: &Project,
    scratch: &Path,
    config: &CompiledProfileConfig,
    report: &mut UpdateReport,
) -> Result<()> {
    let local = ComponentIndex::scan_project(DocumentKind::Profile, project)?;
    let retrieved = ComponentIndex::scan(DocumentKind::Profile, scratch)?;
    let pairing = pair(&local, &retrieved);
    enter(Phase::Paired);

    for name in &pairing.retrieved_only {
        log::warn!("profile '{}' has no local file, skipping", name);
    }
    for name in &pairing.local_only {
        log::debug!("profile '{}' was not retrieved, leaving it as is", name);
    }

    let mut pending = PendingDocuments::new();
    for entity in pairing.pairs {
        let mut current = Document::from_file(DocumentKind::Profile, &entity.local)?;
        let fetched = Document::from_file(DocumentKind::Profile, &entity.retrieved)?;
        let changed = apply_profile_update(&mut current, &fetched, config);
        log::debug!("profile '{}': changed categories {:?}", entity.name, changed);
        pending.insert(entity.local, current);
    }
    enter(Phase::Merged);

    pending.flush(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ItemSwitch, ProfileConfig};
    use std::fs;
    use tempfile::TempDir;

    const PROFILE: &str = r#"<Profile xmlns="http://soap.sforce.com/2006/04/metadata">
    <custom>false</custom>
</Profile>
"#;

    #[test]
    fn test_unpaired_profiles_are_logged_and_skipped() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("sfdx-project.json"),
            r#"{"packageDirectories":[{"path":"force-app"}]}"#,
        )
        .unwrap();
        let local = temp.path().join("force-app/main/default/profiles");
        fs::create_dir_all(&local).unwrap();
        fs::write(local.join("Sales.profile-meta.xml"), PROFILE).unwrap();

        let scratch = temp.path().join("scratch/profiles");
        fs::create_dir_all(&scratch).unwrap();
        fs::write(scratch.join("Partner.profile-meta.xml"), PROFILE).unwrap();

        let project = Project::load(temp.path()).unwrap();
        let config = CompiledProfileConfig::compile(ProfileConfig {
            apex_classes: Some(ItemSwitch::all()),
            ..Default::default()
        })
        .unwrap();
        let mut report = UpdateReport::default();

        testing_logger::setup();
        execute(&project, &temp.path().join("scratch"), &config, &mut report).unwrap();

        assert!(report.is_unchanged());
        assert!(!local.join("Partner.profile-meta.xml").exists());
        testing_logger::validate(|logs| {
            assert!(logs.iter().any(|l| l.level == log::Level::Warn
                && l.body == "profile 'Partner' has no local file, skipping"));
            assert!(logs.iter().any(|l| l.level == log::Level::Debug
                && l.body.contains("'Sales' was not retrieved")));
        });
    }
}
