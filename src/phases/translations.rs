//! Phase 4: Translation reconciliation
//!
//! Works per `Entity-lang` object translation and per language bundle. For
//! each document the outcome depends on which sides exist:
//!
//! | retrieved | local | action                                   |
//! |-----------|-------|------------------------------------------|
//! | yes       | no    | copy the retrieved file into the project |
//! | yes       | yes   | merge each effective category            |
//! | no        | yes   | delete the local translation             |
//! | no        | no    | nothing                                  |
//!
//! Field translations are separate files in the object translation's
//! directory and are synchronized file by file.

use std::path::{Path, PathBuf};

use crate::config::{CompiledTranslationConfig, ItemSwitch, TranslationCategory, TranslationEntityConfig};
use crate::document::{Document, DocumentKind, FIELD_TRANSLATION_SUFFIX};
use crate::error::Result;
use crate::filesystem::{
    find_files_with_suffix, remove_dir_all_with_retry, remove_file_if_exists, write_if_changed,
};
use crate::manifest::TranslationPlan;
use crate::merge::translation::apply_translation_category;
use crate::project::Project;
use crate::selector::{bundle_selector, object_translation_selector, Selector};

use super::discovery::ComponentIndex;
use super::write::PendingDocuments;
use super::{enter, Phase, UpdateReport};

const OBJECT_TRANSLATIONS_DIR: &str = "objectTranslations";
const TRANSLATIONS_DIR: &str = "translations";

/// Merges retrieved translations into the project and writes the result.
pub fn execute(
    project: &Project,
    scratch: &Path,
    config: &CompiledTranslationConfig,
    plan: &TranslationPlan,
    report: &mut UpdateReport,
) -> Result<()> {
    let local_objects = local_index(
        DocumentKind::ObjectTranslation,
        project,
        needs_local_scan(config, plan, TranslationCategory::is_object_level),
    )?;
    let retrieved_objects = ComponentIndex::scan(DocumentKind::ObjectTranslation, scratch)?;
    let local_bundles = local_index(
        DocumentKind::Translations,
        project,
        needs_local_scan(config, plan, TranslationCategory::is_bundle_level),
    )?;
    let retrieved_bundles = ComponentIndex::scan(DocumentKind::Translations, scratch)?;
    enter(Phase::Paired);

    let source_dir = project.default_source_dir();
    let mut pending = PendingDocuments::new();

    for entity in config.entities() {
        for language in &plan.languages {
            let component = format!("{}-{}", entity.name(), language);
            if !plan.object_translations.contains(&component) {
                continue;
            }
            let local = local_objects.get(&component).map(Path::to_path_buf).unwrap_or_else(|| {
                source_dir
                    .join(OBJECT_TRANSLATIONS_DIR)
                    .join(&component)
                    .join(DocumentKind::ObjectTranslation.file_name(&component))
            });
            reconcile_object_translation(
                entity,
                plan,
                &component,
                retrieved_objects.get(&component),
                &local,
                &mut pending,
                report,
            )?;
        }
    }

    let bundle_categories: Vec<(TranslationCategory, Selector)> = plan
        .effective
        .iter()
        .copied()
        .filter(|c| c.is_bundle_level())
        .map(|c| (c, bundle_selector(config, c)))
        .collect();
    if !bundle_categories.is_empty() {
        for language in &plan.languages {
            let local = local_bundles.get(language).map(Path::to_path_buf).unwrap_or_else(|| {
                source_dir
                    .join(TRANSLATIONS_DIR)
                    .join(DocumentKind::Translations.file_name(language))
            });
            reconcile_bundle(
                &bundle_categories,
                retrieved_bundles.get(language),
                &local,
                &mut pending,
                report,
            )?;
        }
    }
    enter(Phase::Merged);

    pending.flush(report)
}

/// True when an effective category of the given level selects named items.
/// Field translations are plain files next to the object translation and
/// never need it.
fn needs_local_scan(
    config: &CompiledTranslationConfig,
    plan: &TranslationPlan,
    level: fn(TranslationCategory) -> bool,
) -> bool {
    plan.effective
        .iter()
        .copied()
        .filter(|c| level(*c) && *c != TranslationCategory::Fields)
        .any(|c| config.is_named_only(c))
}

/// Local documents of `kind` across every package directory. Wildcard-only
/// runs write to the default source directory and skip the scan.
fn local_index(kind: DocumentKind, project: &Project, scan: bool) -> Result<ComponentIndex> {
    if scan {
        return ComponentIndex::scan_project(kind, project);
    }
    log::debug!("{:?}: wildcard selection only, using default locations", kind);
    Ok(ComponentIndex::default())
}

/// Copies `from` over `to` when the bytes differ, recording the outcome.
fn sync_file(from: &Path, to: &Path, report: &mut UpdateReport) -> Result<()> {
    let existed = to.exists();
    let content = std::fs::read(from)?;
    if write_if_changed(to, &content)? {
        if existed {
            report.record_written(to.to_path_buf());
        } else {
            report.record_copied(to.to_path_buf());
        }
    }
    Ok(())
}

fn reconcile_object_translation(
    entity: &TranslationEntityConfig,
    plan: &TranslationPlan,
    component: &str,
    retrieved: Option<&Path>,
    local: &Path,
    pending: &mut PendingDocuments,
    report: &mut UpdateReport,
) -> Result<()> {
    // Only a directory named after the component is owned by it.
    let local_dir = local
        .parent()
        .filter(|dir| dir.file_name().and_then(|n| n.to_str()) == Some(component));

    let Some(retrieved) = retrieved else {
        if let Some(dir) = local_dir.filter(|dir| dir.is_dir()) {
            if remove_dir_all_with_retry(dir)? {
                report.record_deleted(dir.to_path_buf());
            }
        } else if remove_file_if_exists(local)? {
            report.record_deleted(local.to_path_buf());
        }
        return Ok(());
    };

    let categories: Vec<(TranslationCategory, Selector)> = plan
        .effective
        .iter()
        .copied()
        .filter(|c| c.is_object_level() && *c != TranslationCategory::Fields)
        .filter_map(|c| object_translation_selector(entity, c).map(|s| (c, s)))
        .collect();

    if !local.is_file() {
        sync_file(retrieved, local, report)?;
    } else if !categories.is_empty() {
        let fetched = Document::from_file(DocumentKind::ObjectTranslation, retrieved)?;
        let document = pending.load(DocumentKind::ObjectTranslation, local)?;
        for (category, selector) in &categories {
            if apply_translation_category(document, &fetched, *category, selector) {
                log::debug!("{}: merged {}", component, category);
            }
        }
    }

    if plan.is_effective(TranslationCategory::Fields) {
        if let Some(fields) = entity.fields.as_ref().filter(|f| f.is_active()) {
            let retrieved_dir = retrieved.parent().unwrap_or(Path::new("."));
            let local_dir = local.parent().unwrap_or(Path::new("."));
            reconcile_field_translations(fields, retrieved_dir, local_dir, report)?;
        }
    }
    Ok(())
}

fn field_translation_path(dir: &Path, field: &str) -> PathBuf {
    dir.join(format!("{}{}", field, FIELD_TRANSLATION_SUFFIX))
}

fn reconcile_field_translations(
    fields: &ItemSwitch,
    retrieved_dir: &Path,
    local_dir: &Path,
    report: &mut UpdateReport,
) -> Result<()> {
    if fields.all_items {
        let retrieved = find_files_with_suffix(retrieved_dir, FIELD_TRANSLATION_SUFFIX)?;
        for stale in find_files_with_suffix(local_dir, FIELD_TRANSLATION_SUFFIX)? {
            let kept = stale
                .file_name()
                .is_some_and(|name| retrieved_dir.join(name).is_file());
            if !kept && remove_file_if_exists(&stale)? {
                report.record_deleted(stale);
            }
        }
        for file in retrieved {
            if let Some(name) = file.file_name() {
                sync_file(&file, &local_dir.join(name), report)?;
            }
        }
        return Ok(());
    }

    for field in fields.names() {
        let source = field_translation_path(retrieved_dir, field);
        let target = field_translation_path(local_dir, field);
        if source.is_file() {
            sync_file(&source, &target, report)?;
        } else if remove_file_if_exists(&target)? {
            report.record_deleted(target);
        }
    }
    Ok(())
}

fn reconcile_bundle(
    categories: &[(TranslationCategory, Selector)],
    retrieved: Option<&Path>,
    local: &Path,
    pending: &mut PendingDocuments,
    report: &mut UpdateReport,
) -> Result<()> {
    match retrieved {
        None => {
            if remove_file_if_exists(local)? {
                report.record_deleted(local.to_path_buf());
            }
        }
        Some(retrieved) if !local.is_file() => sync_file(retrieved, local, report)?,
        Some(retrieved) => {
            let fetched = Document::from_file(DocumentKind::Translations, retrieved)?;
            let document = pending.load(DocumentKind::Translations, local)?;
            for (category, selector) in categories {
                apply_translation_category(document, &fetched, *category, selector);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn field_file(dir: &Path, field: &str, label: &str) {
        fs::create_dir_all(dir).unwrap();
        fs::write(field_translation_path(dir, field), label).unwrap();
    }

    #[test]
    fn test_wildcard_fields_mirror_retrieved() {
        let temp = TempDir::new().unwrap();
        let retrieved = temp.path().join("r/Account-fr");
        let local = temp.path().join("l/Account-fr");
        field_file(&retrieved, "Name", "Nom");
        field_file(&retrieved, "Industry", "Secteur");
        field_file(&local, "Name", "Nom");
        field_file(&local, "Obsolete__c", "Ancien");

        let mut report = UpdateReport::default();
        reconcile_field_translations(&ItemSwitch::all(), &retrieved, &local, &mut report).unwrap();

        assert!(!field_translation_path(&local, "Obsolete__c").exists());
        assert!(field_translation_path(&local, "Industry").exists());
        assert_eq!(report.copied, vec![field_translation_path(&local, "Industry")]);
        assert_eq!(report.deleted, vec![field_translation_path(&local, "Obsolete__c")]);
        // Identical content is not rewritten.
        assert!(report.written.is_empty());
    }

    #[test]
    fn test_named_fields_copy_or_delete() {
        let temp = TempDir::new().unwrap();
        let retrieved = temp.path().join("r/Account-fr");
        let local = temp.path().join("l/Account-fr");
        field_file(&retrieved, "Name", "Nom du compte");
        field_file(&local, "Name", "Nom");
        field_file(&local, "Gone__c", "Parti");
        field_file(&local, "Other__c", "Autre");

        let mut report = UpdateReport::default();
        reconcile_field_translations(
            &ItemSwitch::named(["Name", "Gone__c"]),
            &retrieved,
            &local,
            &mut report,
        )
        .unwrap();

        assert_eq!(
            fs::read_to_string(field_translation_path(&local, "Name")).unwrap(),
            "Nom du compte"
        );
        assert!(!field_translation_path(&local, "Gone__c").exists());
        assert!(field_translation_path(&local, "Other__c").exists());
        assert_eq!(report.written.len(), 1);
        assert_eq!(report.deleted.len(), 1);
    }

    fn write(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn rule_translation(message: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<CustomObjectTranslation xmlns="http://soap.sforce.com/2006/04/metadata">
    <validationRules>
        <errorMessage>{}</errorMessage>
        <name>Rule_A</name>
    </validationRules>
</CustomObjectTranslation>
"#,
            message
        )
    }

    fn plan(component: &str, effective: &[TranslationCategory]) -> TranslationPlan {
        TranslationPlan {
            manifest: crate::manifest::Manifest::new("60.0"),
            languages: vec!["fr".to_string()],
            object_translations: [component.to_string()].into_iter().collect(),
            effective: effective.iter().copied().collect(),
        }
    }

    fn account_rules(rules: ItemSwitch) -> CompiledTranslationConfig {
        CompiledTranslationConfig::compile(crate::config::TranslationConfig {
            s_objects: vec![TranslationEntityConfig {
                api_name: "Account".to_string(),
                validation_rules: Some(rules),
                ..Default::default()
            }],
            ..Default::default()
        })
        .unwrap()
    }

    /// A project whose only local `Account-fr` lives in the second package.
    fn two_package_project(root: &Path) -> (Project, PathBuf) {
        write(
            &root.join("sfdx-project.json"),
            r#"{"packageDirectories":[{"path":"force-app","default":true},{"path":"extra-app"}]}"#,
        );
        fs::create_dir_all(root.join("force-app/main/default")).unwrap();
        let local = root.join(
            "extra-app/main/default/objectTranslations/Account-fr/Account-fr.objectTranslation-meta.xml",
        );
        write(&local, &rule_translation("Ancien message"));
        write(
            &root.join("scratch/objectTranslations/Account-fr/Account-fr.objectTranslation-meta.xml"),
            &rule_translation("Nouveau message"),
        );
        (Project::load(root).unwrap(), local)
    }

    #[test]
    fn test_wildcard_only_writes_to_default_package() {
        let temp = TempDir::new().unwrap();
        let (project, elsewhere) = two_package_project(temp.path());
        let config = account_rules(ItemSwitch::all());
        let default_path = project
            .default_source_dir()
            .join("objectTranslations/Account-fr/Account-fr.objectTranslation-meta.xml");

        let mut report = UpdateReport::default();
        execute(
            &project,
            &temp.path().join("scratch"),
            &config,
            &plan("Account-fr", &[TranslationCategory::ValidationRules]),
            &mut report,
        )
        .unwrap();

        assert_eq!(report.copied, vec![default_path.clone()]);
        assert!(fs::read_to_string(&default_path).unwrap().contains("Nouveau message"));
        assert_eq!(
            fs::read_to_string(&elsewhere).unwrap(),
            rule_translation("Ancien message")
        );
    }

    #[test]
    fn test_named_items_merge_into_discovered_file() {
        let temp = TempDir::new().unwrap();
        let (project, elsewhere) = two_package_project(temp.path());
        let config = account_rules(ItemSwitch::named(["Rule_A"]));

        let mut report = UpdateReport::default();
        execute(
            &project,
            &temp.path().join("scratch"),
            &config,
            &plan("Account-fr", &[TranslationCategory::ValidationRules]),
            &mut report,
        )
        .unwrap();

        assert_eq!(report.written, vec![elsewhere.clone()]);
        assert!(report.copied.is_empty());
        assert!(fs::read_to_string(&elsewhere).unwrap().contains("Nouveau message"));
        assert!(!project.default_source_dir().join("objectTranslations").exists());
    }

    #[test]
    fn test_entity_missing_in_org_removes_component_dir() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("objectTranslations/Gone__c-fr");
        let local = dir.join("Gone__c-fr.objectTranslation-meta.xml");
        write(&local, &rule_translation("Parti"));
        field_file(&dir, "Status__c", "Statut");
        let entity = TranslationEntityConfig {
            api_name: "Gone__c".to_string(),
            fields: Some(ItemSwitch::all()),
            ..Default::default()
        };

        let mut pending = PendingDocuments::new();
        let mut report = UpdateReport::default();
        reconcile_object_translation(
            &entity,
            &plan("Gone__c-fr", &[TranslationCategory::Fields]),
            "Gone__c-fr",
            None,
            &local,
            &mut pending,
            &mut report,
        )
        .unwrap();

        assert!(!dir.exists());
        assert!(!field_translation_path(&dir, "Status__c").exists());
        assert_eq!(report.deleted, vec![dir]);
        assert!(pending.is_empty());
    }

    #[test]
    fn test_bundle_missing_in_org_deletes_local() {
        let temp = TempDir::new().unwrap();
        let local = temp.path().join("translations/de.translation-meta.xml");
        fs::create_dir_all(local.parent().unwrap()).unwrap();
        fs::write(&local, "<Translations/>").unwrap();

        let mut pending = PendingDocuments::new();
        let mut report = UpdateReport::default();
        reconcile_bundle(
            &[(TranslationCategory::CustomLabels, Selector::All)],
            None,
            &local,
            &mut pending,
            &mut report,
        )
        .unwrap();

        assert!(!local.exists());
        assert_eq!(report.deleted, vec![local]);
        assert!(pending.is_empty());
    }
}
