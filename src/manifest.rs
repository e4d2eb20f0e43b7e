//! # Retrieval Manifest
//!
//! Builds the `package.xml` describing exactly what an update run fetches
//! from the org.
//!
//! A [`Manifest`] is a list of type groups (`ApexClass`, `Layout`...) each
//! holding member names or the `*` wildcard. Builders:
//!
//! - [`build_profile_manifest`] for profile updates. The `Profile` group is
//!   always present with `*`, since profiles are only ever retrieved whole.
//! - [`build_translation_manifest`] for translation updates. It also returns
//!   the activated languages, the object translation components to expect and
//!   the categories that still have something to retrieve once org lookups
//!   are resolved.
//!
//! Some members cannot be named from configuration alone and are resolved
//! against org listings:
//!
//! - custom metadata types (`CustomObject` names ending in `__mdt`)
//! - custom settings (global describe)
//! - tabs (REST `tabs` resource); `standard-<Entity>` tabs add `<Entity>` to
//!   the `CustomObject` group and never appear in the `CustomTab` group
//! - layouts (`Entity-Layout`, with a namespace spliced as
//!   `Entity-ns__Layout`)
//! - object quick actions, workflows and global quick actions

use std::collections::BTreeSet;
use std::path::Path;

use crate::config::{
    CompiledProfileConfig, CompiledTranslationConfig, ItemSwitch, ProfileCategory,
    TranslationCategory,
};
use crate::document::{write_xml, Record};
use crate::error::{Error, Result};
use crate::org::{FileProperties, OrgConnection};

/// Wildcard member.
pub const WILDCARD: &str = "*";

/// Tab name prefix marking a standard entity's tab.
pub const STANDARD_TAB_PREFIX: &str = "standard-";

/// Suffix of custom metadata type names.
pub const CUSTOM_METADATA_SUFFIX: &str = "__mdt";

/// Metadata API type names used in manifests.
pub mod types {
    pub const APEX_CLASS: &str = "ApexClass";
    pub const APEX_PAGE: &str = "ApexPage";
    pub const CUSTOM_APPLICATION: &str = "CustomApplication";
    pub const CUSTOM_LABELS: &str = "CustomLabels";
    pub const CUSTOM_OBJECT: &str = "CustomObject";
    pub const CUSTOM_OBJECT_TRANSLATION: &str = "CustomObjectTranslation";
    pub const CUSTOM_PERMISSION: &str = "CustomPermission";
    pub const CUSTOM_TAB: &str = "CustomTab";
    pub const EXTERNAL_DATA_SOURCE: &str = "ExternalDataSource";
    pub const FLOW: &str = "Flow";
    pub const LAYOUT: &str = "Layout";
    pub const PROFILE: &str = "Profile";
    pub const QUICK_ACTION: &str = "QuickAction";
    pub const REPORT_TYPE: &str = "ReportType";
    pub const TRANSLATIONS: &str = "Translations";
    pub const WORKFLOW: &str = "Workflow";
}

/// One `<types>` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestGroup {
    pub name: String,
    pub members: Vec<String>,
}

/// A retrieval manifest, not yet serialized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    version: String,
    groups: Vec<ManifestGroup>,
}

impl Manifest {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            groups: Vec::new(),
        }
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Adds members to the group `type_name`, creating it on first use.
    /// Duplicate members are ignored and empty additions create nothing.
    pub fn add<I, S>(&mut self, type_name: &str, members: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let members: Vec<String> = members.into_iter().map(Into::into).collect();
        if members.is_empty() {
            return;
        }
        let index = match self.groups.iter().position(|g| g.name == type_name) {
            Some(index) => index,
            None => {
                self.groups.push(ManifestGroup {
                    name: type_name.to_string(),
                    members: Vec::new(),
                });
                self.groups.len() - 1
            }
        };
        let group = &mut self.groups[index];
        for member in members {
            if !group.members.contains(&member) {
                group.members.push(member);
            }
        }
    }

    pub fn groups(&self) -> &[ManifestGroup] {
        &self.groups
    }

    /// Members of `type_name`, empty when the group is absent.
    pub fn members(&self, type_name: &str) -> &[String] {
        self.groups
            .iter()
            .find(|g| g.name == type_name)
            .map(|g| g.members.as_slice())
            .unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.groups.iter().all(|g| g.members.is_empty())
    }

    /// Renders the manifest as `package.xml`.
    pub fn to_xml(&self) -> String {
        let mut package = Record::new();
        for group in &self.groups {
            let mut types = Record::new();
            for member in &group.members {
                types = types.with_text("members", member.as_str());
            }
            package = package.with_record("types", types.with_text("name", group.name.as_str()));
        }
        package = package.with_text("version", self.version.as_str());
        write_xml("Package", &package)
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_xml())?;
        Ok(())
    }
}

/// `*` for a wildcard switch, otherwise its names.
fn switch_members(switch: &ItemSwitch) -> Vec<String> {
    if switch.all_items {
        vec![WILDCARD.to_string()]
    } else {
        switch.names().into_iter().map(str::to_string).collect()
    }
}

/// Layout member name, splicing the namespace into the layout segment.
pub fn layout_member(layout: &FileProperties) -> String {
    match (layout.namespace(), layout.full_name.split_once('-')) {
        (Some(namespace), Some((entity, name))) => format!("{}-{}__{}", entity, namespace, name),
        _ => layout.full_name.clone(),
    }
}

fn insert_ordered(members: &mut Vec<String>, name: &str) {
    if !name.is_empty() && !members.iter().any(|m| m == name) {
        members.push(name.to_string());
    }
}

// ---------------------------------------------------------------------------
// Profiles
// ---------------------------------------------------------------------------

/// Builds the manifest for a profile update.
pub fn build_profile_manifest(
    config: &CompiledProfileConfig,
    org: &dyn OrgConnection,
) -> Result<Manifest> {
    let raw = config.config();
    let mut manifest = Manifest::new(org.api_version());

    let mut entities: Vec<String> = Vec::new();
    if ProfileCategory::ALL
        .iter()
        .any(|c| c.is_per_entity() && config.is_active(*c))
    {
        for entity in config.entities() {
            insert_ordered(&mut entities, entity.name());
        }
    }

    if let Some(switch) = active_switch(config, ProfileCategory::CustomMetadataTypes) {
        if switch.all_items {
            for cmt in org.list_metadata(types::CUSTOM_OBJECT)? {
                if cmt.full_name.ends_with(CUSTOM_METADATA_SUFFIX) {
                    insert_ordered(&mut entities, &cmt.full_name);
                }
            }
        } else {
            for name in switch.names() {
                insert_ordered(&mut entities, name);
            }
        }
    }

    if let Some(switch) = active_switch(config, ProfileCategory::CustomSettings) {
        if switch.all_items {
            for sobject in org.describe_global()? {
                if sobject.is_custom_setting {
                    insert_ordered(&mut entities, &sobject.name);
                }
            }
        } else {
            for name in switch.names() {
                insert_ordered(&mut entities, name);
            }
        }
    }

    let mut tab_members: Vec<String> = Vec::new();
    if let Some(switch) = active_switch(config, ProfileCategory::CustomTabs) {
        if switch.all_items {
            for tab in org.list_tabs(org.api_version())? {
                if tab.name.starts_with(STANDARD_TAB_PREFIX) {
                    if let Some(entity) = tab.sobject_name.as_deref() {
                        insert_ordered(&mut entities, entity);
                    }
                }
            }
            tab_members.push(WILDCARD.to_string());
        } else {
            for name in switch.names() {
                match name.strip_prefix(STANDARD_TAB_PREFIX) {
                    Some(entity) => insert_ordered(&mut entities, entity),
                    None => insert_ordered(&mut tab_members, name),
                }
            }
        }
    }

    manifest.add(types::CUSTOM_OBJECT, entities);

    if config.is_active(ProfileCategory::LayoutAssignments) {
        let owners: Vec<&str> = config
            .entities()
            .filter(|e| e.retrieve_layout_assignments)
            .map(|e| e.name())
            .collect();
        let layouts = org.list_metadata(types::LAYOUT)?;
        let mut members = Vec::new();
        for owner in owners {
            let prefix = format!("{}-", owner);
            for layout in layouts.iter().filter(|l| l.full_name.starts_with(&prefix)) {
                insert_ordered(&mut members, &layout_member(layout));
            }
        }
        manifest.add(types::LAYOUT, members);
    }

    for (category, type_name) in [
        (ProfileCategory::ApexClasses, types::APEX_CLASS),
        (ProfileCategory::ApexPages, types::APEX_PAGE),
        (ProfileCategory::CustomApplications, types::CUSTOM_APPLICATION),
        (ProfileCategory::CustomPermissions, types::CUSTOM_PERMISSION),
    ] {
        if let Some(switch) = active_switch(config, category) {
            manifest.add(type_name, switch_members(switch));
        }
    }

    manifest.add(types::CUSTOM_TAB, tab_members);

    if let Some(switch) = active_switch(config, ProfileCategory::ExternalDataSources) {
        manifest.add(types::EXTERNAL_DATA_SOURCE, switch_members(switch));
    }

    // User permissions and login settings live in the profile itself, so a
    // manifest holding only the Profile group still has work to do.
    let profile_only = config.is_active(ProfileCategory::UserPermissions)
        || raw.login_ip_ranges
        || raw.login_hours;
    if manifest.is_empty() && !profile_only {
        return Err(Error::ManifestEmpty {
            operation: "profiles".to_string(),
        });
    }
    manifest.add(types::PROFILE, [WILDCARD]);

    Ok(manifest)
}

fn active_switch(config: &CompiledProfileConfig, category: ProfileCategory) -> Option<&ItemSwitch> {
    if !config.is_active(category) {
        return None;
    }
    config.config().switch(category)
}

// ---------------------------------------------------------------------------
// Translations
// ---------------------------------------------------------------------------

/// Result of planning a translation retrieve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationPlan {
    pub manifest: Manifest,
    /// Languages enabled in the org.
    pub languages: Vec<String>,
    /// `Entity-lang` components requested.
    pub object_translations: BTreeSet<String>,
    /// Active categories left after org lookups.
    pub effective: BTreeSet<TranslationCategory>,
}

impl TranslationPlan {
    pub fn is_effective(&self, category: TranslationCategory) -> bool {
        self.effective.contains(&category)
    }
}

/// Members found by matching configured entities against an org listing.
/// Wildcard entities take every item starting with `Entity<sep>`, named
/// entities take the exact `Entity<sep>Name` items.
fn resolve_entity_children(
    config: &CompiledTranslationConfig,
    category: TranslationCategory,
    listing: &[FileProperties],
    separator: char,
    render: impl Fn(&FileProperties) -> String,
) -> Vec<String> {
    let mut members = Vec::new();
    for entity in config.entities() {
        let Some(switch) = entity.switch(category).filter(|s| s.is_active()) else {
            continue;
        };
        let prefix = format!("{}{}", entity.name(), separator);
        if switch.all_items {
            for item in listing.iter().filter(|i| i.full_name.starts_with(&prefix)) {
                insert_ordered(&mut members, &render(item));
            }
        } else {
            for name in switch.names() {
                let full_name = format!("{}{}", prefix, name);
                if let Some(item) = listing.iter().find(|i| i.full_name == full_name) {
                    insert_ordered(&mut members, &render(item));
                }
            }
        }
    }
    members
}

/// Builds the manifest for a translation update.
pub fn build_translation_manifest(
    config: &CompiledTranslationConfig,
    org: &dyn OrgConnection,
) -> Result<TranslationPlan> {
    let mut manifest = Manifest::new(org.api_version());
    let mut effective: BTreeSet<TranslationCategory> = config.active_categories().collect();

    let languages: Vec<String> = org
        .list_metadata(types::TRANSLATIONS)?
        .into_iter()
        .map(|l| l.full_name)
        .collect();
    log::debug!("activated languages: {:?}", languages);

    if config.is_active(TranslationCategory::Layouts) {
        let listing = org.list_metadata(types::LAYOUT)?;
        let members = resolve_entity_children(
            config,
            TranslationCategory::Layouts,
            &listing,
            '-',
            layout_member,
        );
        if members.is_empty() {
            effective.remove(&TranslationCategory::Layouts);
        }
        manifest.add(types::LAYOUT, members);
    }

    if config.is_active(TranslationCategory::QuickActions) {
        let listing = org.list_metadata(types::QUICK_ACTION)?;
        let members = resolve_entity_children(
            config,
            TranslationCategory::QuickActions,
            &listing,
            '.',
            |item| item.full_name.clone(),
        );
        if members.is_empty() {
            effective.remove(&TranslationCategory::QuickActions);
        }
        manifest.add(types::QUICK_ACTION, members);
    }

    if config.is_active(TranslationCategory::WorkflowTasks) {
        let listing = org.list_metadata(types::WORKFLOW)?;
        let mut members = Vec::new();
        for entity in config
            .entities()
            .filter(|e| e.activates(TranslationCategory::WorkflowTasks))
        {
            if listing.iter().any(|w| w.full_name == entity.name()) {
                insert_ordered(&mut members, entity.name());
            }
        }
        if members.is_empty() {
            effective.remove(&TranslationCategory::WorkflowTasks);
        }
        manifest.add(types::WORKFLOW, members);
    }

    let mut object_translations = BTreeSet::new();
    if effective.iter().any(|c| c.is_object_level()) {
        let mut entities = Vec::new();
        let mut components = Vec::new();
        for entity in config.entities() {
            insert_ordered(&mut entities, entity.name());
            for language in &languages {
                let component = format!("{}-{}", entity.name(), language);
                insert_ordered(&mut components, &component);
                object_translations.insert(component);
            }
        }
        manifest.add(types::CUSTOM_OBJECT, entities);
        manifest.add(types::CUSTOM_OBJECT_TRANSLATION, components);
    }

    for (category, type_name) in [
        (TranslationCategory::CustomApplications, types::CUSTOM_APPLICATION),
        (TranslationCategory::CustomLabels, types::CUSTOM_LABELS),
        (TranslationCategory::Flows, types::FLOW),
        (TranslationCategory::GlobalQuickActions, types::QUICK_ACTION),
        (TranslationCategory::ReportTypes, types::REPORT_TYPE),
    ] {
        if !config.is_active(category) {
            continue;
        }
        let switch = config
            .config()
            .switch(category)
            .expect("active bundle category has a switch");

        let members: Vec<String> = match category {
            // Labels are a single component; named labels still need the
            // whole CustomLabels file.
            TranslationCategory::CustomLabels => vec![WILDCARD.to_string()],
            TranslationCategory::GlobalQuickActions if switch.all_items => org
                .list_global_quick_actions(org.api_version())?
                .into_iter()
                .map(|a| a.name)
                .collect(),
            _ => switch_members(switch),
        };

        if members.is_empty() {
            effective.remove(&category);
        }
        manifest.add(type_name, members);
    }

    if effective.iter().any(|c| c.is_bundle_level()) {
        manifest.add(types::TRANSLATIONS, [WILDCARD]);
    }

    if manifest.is_empty() {
        return Err(Error::ManifestEmpty {
            operation: "translations".to_string(),
        });
    }

    Ok(TranslationPlan {
        manifest,
        languages,
        object_translations,
        effective,
    })
}
