//! # Update Configuration
//!
//! This module defines the two configuration documents that drive an update
//! run, `profileUpdateConfig.json` and `translationUpdateConfig.json`, and
//! compiles them into the set of active categories the rest of the pipeline
//! works from.
//!
//! ## Shape
//!
//! Both documents share one building block, the [`ItemSwitch`]:
//!
//! ```json
//! { "allItems": false, "itemsFor": ["MyClass", "OtherClass"] }
//! ```
//!
//! `allItems` selects every item of the category and takes precedence over
//! `itemsFor`. The legacy key pairs `allPermissions`/`permissionsFor` and
//! `allTranslations`/`translationsFor` are accepted as aliases.
//!
//! Switches appear either per entity (inside `sObjects`) or globally. The
//! profile document also carries two all-or-nothing toggles, `loginIpRanges`
//! and `loginHours`.
//!
//! ## Compiling
//!
//! [`CompiledProfileConfig::compile`] and [`CompiledTranslationConfig::compile`]
//! derive per-category activity flags and reject documents that activate
//! nothing. Compilation is pure; the compiled value is immutable for the rest
//! of the run.

use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Wildcard-or-list selection for one category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ItemSwitch {
    /// Select every item of the category.
    #[serde(default, alias = "allPermissions", alias = "allTranslations")]
    pub all_items: bool,
    /// Select only these items when `all_items` is false.
    #[serde(default, alias = "permissionsFor", alias = "translationsFor")]
    pub items_for: Vec<String>,
}

impl ItemSwitch {
    /// Switch selecting every item.
    pub fn all() -> Self {
        Self {
            all_items: true,
            items_for: Vec::new(),
        }
    }

    /// Switch selecting the given names.
    pub fn named<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            all_items: false,
            items_for: names.into_iter().map(Into::into).collect(),
        }
    }

    /// True when the switch selects anything.
    pub fn is_active(&self) -> bool {
        self.all_items || !self.names().is_empty()
    }

    /// True when the switch selects an explicit list only.
    pub fn is_named_only(&self) -> bool {
        !self.all_items && !self.names().is_empty()
    }

    /// Trimmed, de-duplicated item names in declaration order.
    pub fn names(&self) -> Vec<&str> {
        let mut seen = BTreeSet::new();
        self.items_for
            .iter()
            .map(|name| name.trim())
            .filter(|name| !name.is_empty() && seen.insert(*name))
            .collect()
    }
}

fn switch_active(switch: &Option<ItemSwitch>) -> bool {
    switch.as_ref().is_some_and(ItemSwitch::is_active)
}

// ---------------------------------------------------------------------------
// Profiles
// ---------------------------------------------------------------------------

/// Per-entity section of the profile configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ProfileEntityConfig {
    /// Entity API name, e.g. `Account` or `Invoice__c`.
    pub api_name: String,
    #[serde(default)]
    pub retrieve_object_permissions: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<ItemSwitch>,
    #[serde(default)]
    pub retrieve_record_type_visibilities: bool,
    #[serde(default)]
    pub retrieve_layout_assignments: bool,
}

impl ProfileEntityConfig {
    /// Trimmed entity API name.
    pub fn name(&self) -> &str {
        self.api_name.trim()
    }
}

/// The `profileUpdateConfig.json` document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ProfileConfig {
    #[serde(default, rename = "sObjects")]
    pub s_objects: Vec<ProfileEntityConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apex_classes: Option<ItemSwitch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apex_pages: Option<ItemSwitch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_applications: Option<ItemSwitch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_metadata_types: Option<ItemSwitch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_permissions: Option<ItemSwitch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_settings: Option<ItemSwitch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_tabs: Option<ItemSwitch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_permissions: Option<ItemSwitch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_data_source: Option<ItemSwitch>,
    #[serde(default)]
    pub login_ip_ranges: bool,
    #[serde(default)]
    pub login_hours: bool,
}

/// Profile permission categories an update can touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ProfileCategory {
    ObjectPermissions,
    FieldPermissions,
    RecordTypeVisibilities,
    LayoutAssignments,
    ApexClasses,
    ApexPages,
    CustomApplications,
    CustomMetadataTypes,
    CustomPermissions,
    CustomSettings,
    CustomTabs,
    UserPermissions,
    ExternalDataSources,
    LoginIpRanges,
    LoginHours,
}

impl ProfileCategory {
    /// Every category, in merge order.
    pub const ALL: [ProfileCategory; 15] = [
        ProfileCategory::ObjectPermissions,
        ProfileCategory::FieldPermissions,
        ProfileCategory::RecordTypeVisibilities,
        ProfileCategory::LayoutAssignments,
        ProfileCategory::ApexClasses,
        ProfileCategory::ApexPages,
        ProfileCategory::CustomApplications,
        ProfileCategory::CustomMetadataTypes,
        ProfileCategory::CustomPermissions,
        ProfileCategory::CustomSettings,
        ProfileCategory::CustomTabs,
        ProfileCategory::UserPermissions,
        ProfileCategory::ExternalDataSources,
        ProfileCategory::LoginIpRanges,
        ProfileCategory::LoginHours,
    ];

    /// True for categories configured per entity under `sObjects`.
    pub fn is_per_entity(self) -> bool {
        matches!(
            self,
            ProfileCategory::ObjectPermissions
                | ProfileCategory::FieldPermissions
                | ProfileCategory::RecordTypeVisibilities
                | ProfileCategory::LayoutAssignments
        )
    }
}

impl fmt::Display for ProfileCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProfileCategory::ObjectPermissions => "object permissions",
            ProfileCategory::FieldPermissions => "field permissions",
            ProfileCategory::RecordTypeVisibilities => "record type visibilities",
            ProfileCategory::LayoutAssignments => "layout assignments",
            ProfileCategory::ApexClasses => "Apex classes",
            ProfileCategory::ApexPages => "Apex pages",
            ProfileCategory::CustomApplications => "custom applications",
            ProfileCategory::CustomMetadataTypes => "custom metadata types",
            ProfileCategory::CustomPermissions => "custom permissions",
            ProfileCategory::CustomSettings => "custom settings",
            ProfileCategory::CustomTabs => "custom tabs",
            ProfileCategory::UserPermissions => "user permissions",
            ProfileCategory::ExternalDataSources => "external data sources",
            ProfileCategory::LoginIpRanges => "login IP ranges",
            ProfileCategory::LoginHours => "login hours",
        };
        f.write_str(name)
    }
}

impl ProfileConfig {
    /// Hand-editable template: one placeholder entity and every switch at its
    /// identity default.
    pub fn template() -> Self {
        Self {
            s_objects: vec![ProfileEntityConfig {
                api_name: "Account".to_string(),
                retrieve_object_permissions: false,
                fields: Some(ItemSwitch::default()),
                retrieve_record_type_visibilities: false,
                retrieve_layout_assignments: false,
            }],
            apex_classes: Some(ItemSwitch::default()),
            apex_pages: Some(ItemSwitch::default()),
            custom_applications: Some(ItemSwitch::default()),
            custom_metadata_types: Some(ItemSwitch::default()),
            custom_permissions: Some(ItemSwitch::default()),
            custom_settings: Some(ItemSwitch::default()),
            custom_tabs: Some(ItemSwitch::default()),
            user_permissions: Some(ItemSwitch::default()),
            external_data_source: Some(ItemSwitch::default()),
            login_ip_ranges: false,
            login_hours: false,
        }
    }

    /// Global switch backing a non per-entity category.
    pub fn switch(&self, category: ProfileCategory) -> Option<&ItemSwitch> {
        match category {
            ProfileCategory::ApexClasses => self.apex_classes.as_ref(),
            ProfileCategory::ApexPages => self.apex_pages.as_ref(),
            ProfileCategory::CustomApplications => self.custom_applications.as_ref(),
            ProfileCategory::CustomMetadataTypes => self.custom_metadata_types.as_ref(),
            ProfileCategory::CustomPermissions => self.custom_permissions.as_ref(),
            ProfileCategory::CustomSettings => self.custom_settings.as_ref(),
            ProfileCategory::CustomTabs => self.custom_tabs.as_ref(),
            ProfileCategory::UserPermissions => self.user_permissions.as_ref(),
            ProfileCategory::ExternalDataSources => self.external_data_source.as_ref(),
            _ => None,
        }
    }

    fn activates(&self, category: ProfileCategory) -> bool {
        match category {
            ProfileCategory::ObjectPermissions => {
                self.s_objects.iter().any(|e| e.retrieve_object_permissions)
            }
            ProfileCategory::FieldPermissions => {
                self.s_objects.iter().any(|e| switch_active(&e.fields))
            }
            ProfileCategory::RecordTypeVisibilities => self
                .s_objects
                .iter()
                .any(|e| e.retrieve_record_type_visibilities),
            ProfileCategory::LayoutAssignments => {
                self.s_objects.iter().any(|e| e.retrieve_layout_assignments)
            }
            ProfileCategory::LoginIpRanges => self.login_ip_ranges,
            ProfileCategory::LoginHours => self.login_hours,
            other => self.switch(other).is_some_and(ItemSwitch::is_active),
        }
    }
}

/// A validated profile configuration with its derived activity flags.
#[derive(Debug, Clone)]
pub struct CompiledProfileConfig {
    config: ProfileConfig,
    active: BTreeSet<ProfileCategory>,
}

impl CompiledProfileConfig {
    /// Derive activity flags, failing when nothing is active.
    pub fn compile(config: ProfileConfig) -> Result<Self> {
        let active: BTreeSet<ProfileCategory> = ProfileCategory::ALL
            .into_iter()
            .filter(|category| config.activates(*category))
            .collect();

        if active.is_empty() {
            return Err(Error::ConfigEmpty {
                subject: "permissions".to_string(),
            });
        }

        log::debug!("active profile categories: {:?}", active);
        Ok(Self { config, active })
    }

    pub fn config(&self) -> &ProfileConfig {
        &self.config
    }

    pub fn is_active(&self, category: ProfileCategory) -> bool {
        self.active.contains(&category)
    }

    /// Active categories in merge order.
    pub fn active_categories(&self) -> impl Iterator<Item = ProfileCategory> + '_ {
        self.active.iter().copied()
    }

    /// Entities whose per-entity switches touch any profile category.
    pub fn entities(&self) -> impl Iterator<Item = &ProfileEntityConfig> {
        self.config.s_objects.iter().filter(|e| !e.name().is_empty())
    }
}

// ---------------------------------------------------------------------------
// Translations
// ---------------------------------------------------------------------------

/// Per-entity section of the translation configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TranslationEntityConfig {
    pub api_name: String,
    #[serde(default)]
    pub retrieve_object_rename_translations: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<ItemSwitch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layouts: Option<ItemSwitch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_sets: Option<ItemSwitch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quick_actions: Option<ItemSwitch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record_types: Option<ItemSwitch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sharing_reasons: Option<ItemSwitch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation_rules: Option<ItemSwitch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web_links: Option<ItemSwitch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflow_tasks: Option<ItemSwitch>,
}

impl TranslationEntityConfig {
    pub fn name(&self) -> &str {
        self.api_name.trim()
    }

    /// Switch backing an object-level category. `ObjectRenames` has no list
    /// and yields `None`.
    pub fn switch(&self, category: TranslationCategory) -> Option<&ItemSwitch> {
        match category {
            TranslationCategory::Fields => self.fields.as_ref(),
            TranslationCategory::Layouts => self.layouts.as_ref(),
            TranslationCategory::FieldSets => self.field_sets.as_ref(),
            TranslationCategory::QuickActions => self.quick_actions.as_ref(),
            TranslationCategory::RecordTypes => self.record_types.as_ref(),
            TranslationCategory::SharingReasons => self.sharing_reasons.as_ref(),
            TranslationCategory::ValidationRules => self.validation_rules.as_ref(),
            TranslationCategory::WebLinks => self.web_links.as_ref(),
            TranslationCategory::WorkflowTasks => self.workflow_tasks.as_ref(),
            _ => None,
        }
    }

    /// True when the entity activates `category`.
    pub fn activates(&self, category: TranslationCategory) -> bool {
        match category {
            TranslationCategory::ObjectRenames => self.retrieve_object_rename_translations,
            other => self.switch(other).is_some_and(ItemSwitch::is_active),
        }
    }

    /// True when the entity activates any object-level category.
    pub fn has_any_translation(&self) -> bool {
        TranslationCategory::ALL
            .into_iter()
            .filter(|c| c.is_object_level())
            .any(|c| self.activates(c))
    }
}

/// The `translationUpdateConfig.json` document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TranslationConfig {
    #[serde(default, rename = "sObjects")]
    pub s_objects: Vec<TranslationEntityConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_applications: Option<ItemSwitch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_labels: Option<ItemSwitch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flows: Option<ItemSwitch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_quick_actions: Option<ItemSwitch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_types: Option<ItemSwitch>,
}

/// Translation categories an update can touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TranslationCategory {
    ObjectRenames,
    Fields,
    Layouts,
    FieldSets,
    QuickActions,
    RecordTypes,
    SharingReasons,
    ValidationRules,
    WebLinks,
    WorkflowTasks,
    CustomApplications,
    CustomLabels,
    Flows,
    GlobalQuickActions,
    ReportTypes,
}

impl TranslationCategory {
    pub const ALL: [TranslationCategory; 15] = [
        TranslationCategory::ObjectRenames,
        TranslationCategory::Fields,
        TranslationCategory::Layouts,
        TranslationCategory::FieldSets,
        TranslationCategory::QuickActions,
        TranslationCategory::RecordTypes,
        TranslationCategory::SharingReasons,
        TranslationCategory::ValidationRules,
        TranslationCategory::WebLinks,
        TranslationCategory::WorkflowTasks,
        TranslationCategory::CustomApplications,
        TranslationCategory::CustomLabels,
        TranslationCategory::Flows,
        TranslationCategory::GlobalQuickActions,
        TranslationCategory::ReportTypes,
    ];

    /// Categories configured under `sObjects`.
    pub fn is_object_level(self) -> bool {
        !self.is_bundle_level()
    }

    /// Categories stored in the per-language `Translations` bundle.
    pub fn is_bundle_level(self) -> bool {
        matches!(
            self,
            TranslationCategory::CustomApplications
                | TranslationCategory::CustomLabels
                | TranslationCategory::Flows
                | TranslationCategory::GlobalQuickActions
                | TranslationCategory::ReportTypes
        )
    }
}

impl fmt::Display for TranslationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TranslationCategory::ObjectRenames => "object renames",
            TranslationCategory::Fields => "fields",
            TranslationCategory::Layouts => "layouts",
            TranslationCategory::FieldSets => "field sets",
            TranslationCategory::QuickActions => "quick actions",
            TranslationCategory::RecordTypes => "record types",
            TranslationCategory::SharingReasons => "sharing reasons",
            TranslationCategory::ValidationRules => "validation rules",
            TranslationCategory::WebLinks => "web links",
            TranslationCategory::WorkflowTasks => "workflow tasks",
            TranslationCategory::CustomApplications => "custom applications",
            TranslationCategory::CustomLabels => "custom labels",
            TranslationCategory::Flows => "flows",
            TranslationCategory::GlobalQuickActions => "global quick actions",
            TranslationCategory::ReportTypes => "report types",
        };
        f.write_str(name)
    }
}

impl TranslationConfig {
    /// Hand-editable template with every switch at its identity default.
    pub fn template() -> Self {
        Self {
            s_objects: vec![TranslationEntityConfig {
                api_name: "Account".to_string(),
                retrieve_object_rename_translations: false,
                fields: Some(ItemSwitch::default()),
                layouts: Some(ItemSwitch::default()),
                field_sets: Some(ItemSwitch::default()),
                quick_actions: Some(ItemSwitch::default()),
                record_types: Some(ItemSwitch::default()),
                sharing_reasons: Some(ItemSwitch::default()),
                validation_rules: Some(ItemSwitch::default()),
                web_links: Some(ItemSwitch::default()),
                workflow_tasks: Some(ItemSwitch::default()),
            }],
            custom_applications: Some(ItemSwitch::default()),
            custom_labels: Some(ItemSwitch::default()),
            flows: Some(ItemSwitch::default()),
            global_quick_actions: Some(ItemSwitch::default()),
            report_types: Some(ItemSwitch::default()),
        }
    }

    /// Global switch backing a bundle-level category.
    pub fn switch(&self, category: TranslationCategory) -> Option<&ItemSwitch> {
        match category {
            TranslationCategory::CustomApplications => self.custom_applications.as_ref(),
            TranslationCategory::CustomLabels => self.custom_labels.as_ref(),
            TranslationCategory::Flows => self.flows.as_ref(),
            TranslationCategory::GlobalQuickActions => self.global_quick_actions.as_ref(),
            TranslationCategory::ReportTypes => self.report_types.as_ref(),
            _ => None,
        }
    }

    fn activates(&self, category: TranslationCategory) -> bool {
        if category.is_bundle_level() {
            return self.switch(category).is_some_and(ItemSwitch::is_active);
        }
        self.s_objects.iter().any(|e| e.activates(category))
    }

    fn activates_named_only(&self, category: TranslationCategory) -> bool {
        if category.is_bundle_level() {
            return self.switch(category).is_some_and(ItemSwitch::is_named_only);
        }
        self.s_objects
            .iter()
            .any(|e| e.switch(category).is_some_and(ItemSwitch::is_named_only))
    }
}

/// A validated translation configuration with its derived flags.
#[derive(Debug, Clone)]
pub struct CompiledTranslationConfig {
    config: TranslationConfig,
    active: BTreeSet<TranslationCategory>,
    named_only: BTreeSet<TranslationCategory>,
}

impl CompiledTranslationConfig {
    /// Derive activity and named-items-only flags, failing when nothing is
    /// active.
    pub fn compile(config: TranslationConfig) -> Result<Self> {
        let active: BTreeSet<TranslationCategory> = TranslationCategory::ALL
            .into_iter()
            .filter(|category| config.activates(*category))
            .collect();

        if active.is_empty() {
            return Err(Error::ConfigEmpty {
                subject: "translations".to_string(),
            });
        }

        let named_only = TranslationCategory::ALL
            .into_iter()
            .filter(|category| config.activates_named_only(*category))
            .collect();

        log::debug!("active translation categories: {:?}", active);
        Ok(Self {
            config,
            active,
            named_only,
        })
    }

    pub fn config(&self) -> &TranslationConfig {
        &self.config
    }

    pub fn is_active(&self, category: TranslationCategory) -> bool {
        self.active.contains(&category)
    }

    /// True when at least one entity (or the global switch) selects the
    /// category through an explicit list without the wildcard.
    pub fn is_named_only(&self, category: TranslationCategory) -> bool {
        self.named_only.contains(&category)
    }

    pub fn active_categories(&self) -> impl Iterator<Item = TranslationCategory> + '_ {
        self.active.iter().copied()
    }

    /// Entities that activate at least one object-level category.
    pub fn entities(&self) -> impl Iterator<Item = &TranslationEntityConfig> {
        self.config
            .s_objects
            .iter()
            .filter(|e| !e.name().is_empty() && e.has_any_translation())
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Parses a configuration document from a JSON string.
pub fn parse<T: DeserializeOwned>(content: &str, path: &Path) -> Result<T> {
    serde_json::from_str(content).map_err(|e| Error::ConfigParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Reads a configuration document. `init_command` names the command that
/// creates a template, used in the hint when the file is absent.
pub fn from_file<T: DeserializeOwned>(path: &Path, init_command: &str) -> Result<T> {
    if !path.exists() {
        return Err(Error::ConfigMissing {
            path: path.to_path_buf(),
            hint: Some(format!(
                "Run '{}' or provide a path with the '--config' flag",
                init_command
            )),
        });
    }
    let content = std::fs::read_to_string(path)?;
    parse(&content, path)
}

/// Renders a configuration as the pretty JSON written by `init-config`.
pub fn to_pretty_json<T: Serialize>(config: &T) -> Result<String> {
    let mut rendered = serde_json::to_string_pretty(config)?;
    rendered.push('\n');
    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_profile(json: &str) -> ProfileConfig {
        parse(json, Path::new("profileUpdateConfig.json")).unwrap()
    }

    fn parse_translation(json: &str) -> TranslationConfig {
        parse(json, Path::new("translationUpdateConfig.json")).unwrap()
    }

    mod item_switch_tests {
        use super::*;

        #[test]
        fn test_all_items_wins_over_list() {
            let switch = ItemSwitch {
                all_items: true,
                items_for: vec!["A".to_string()],
            };
            assert!(switch.is_active());
            assert!(!switch.is_named_only());
        }

        #[test]
        fn test_list_only_is_named_only() {
            let switch = ItemSwitch::named(["A"]);
            assert!(switch.is_active());
            assert!(switch.is_named_only());
        }

        #[test]
        fn test_blank_names_do_not_activate() {
            let switch = ItemSwitch::named(["  ", ""]);
            assert!(!switch.is_active());
        }

        #[test]
        fn test_names_are_trimmed_and_deduplicated() {
            let switch = ItemSwitch::named([" A ", "B", "A"]);
            assert_eq!(switch.names(), vec!["A", "B"]);
        }

        #[test]
        fn test_legacy_aliases() {
            let switch: ItemSwitch =
                serde_json::from_str(r#"{"allPermissions": false, "permissionsFor": ["X"]}"#)
                    .unwrap();
            assert_eq!(switch, ItemSwitch::named(["X"]));

            let switch: ItemSwitch =
                serde_json::from_str(r#"{"allTranslations": true}"#).unwrap();
            assert!(switch.all_items);
        }
    }

    mod profile_tests {
        use super::*;

        #[test]
        fn test_compile_derives_activity() {
            let config = parse_profile(
                r#"{
                    "sObjects": [
                        {"apiName": "Account", "retrieveObjectPermissions": true,
                         "fields": {"itemsFor": ["Name"]}},
                        {"apiName": "Contact", "retrieveLayoutAssignments": true}
                    ],
                    "apexClasses": {"allItems": true},
                    "customTabs": {"itemsFor": []},
                    "loginHours": true
                }"#,
            );
            let compiled = CompiledProfileConfig::compile(config).unwrap();

            assert!(compiled.is_active(ProfileCategory::ObjectPermissions));
            assert!(compiled.is_active(ProfileCategory::FieldPermissions));
            assert!(compiled.is_active(ProfileCategory::LayoutAssignments));
            assert!(compiled.is_active(ProfileCategory::ApexClasses));
            assert!(compiled.is_active(ProfileCategory::LoginHours));
            assert!(!compiled.is_active(ProfileCategory::RecordTypeVisibilities));
            assert!(!compiled.is_active(ProfileCategory::CustomTabs));
            assert!(!compiled.is_active(ProfileCategory::LoginIpRanges));
        }

        #[test]
        fn test_toggle_alone_is_enough() {
            let config = parse_profile(r#"{"loginIpRanges": true}"#);
            let compiled = CompiledProfileConfig::compile(config).unwrap();
            let active: Vec<_> = compiled.active_categories().collect();
            assert_eq!(active, vec![ProfileCategory::LoginIpRanges]);
        }

        #[test]
        fn test_empty_config_rejected() {
            let err = CompiledProfileConfig::compile(ProfileConfig::default()).unwrap_err();
            assert!(matches!(err, Error::ConfigEmpty { ref subject } if subject == "permissions"));
        }

        #[test]
        fn test_template_compiles_to_empty() {
            let err = CompiledProfileConfig::compile(ProfileConfig::template()).unwrap_err();
            assert!(matches!(err, Error::ConfigEmpty { .. }));
        }

        #[test]
        fn test_template_lists_every_category() {
            let rendered = to_pretty_json(&ProfileConfig::template()).unwrap();
            for key in [
                "sObjects",
                "retrieveObjectPermissions",
                "fields",
                "retrieveRecordTypeVisibilities",
                "retrieveLayoutAssignments",
                "apexClasses",
                "apexPages",
                "customApplications",
                "customMetadataTypes",
                "customPermissions",
                "customSettings",
                "customTabs",
                "userPermissions",
                "externalDataSource",
                "loginIpRanges",
                "loginHours",
            ] {
                assert!(rendered.contains(&format!("\"{}\"", key)), "missing {}", key);
            }
            assert!(rendered.ends_with("}\n"));
        }

        #[test]
        fn test_template_round_trips() {
            let rendered = to_pretty_json(&ProfileConfig::template()).unwrap();
            assert_eq!(parse_profile(&rendered), ProfileConfig::template());
        }

        #[test]
        fn test_unknown_key_rejected() {
            let err = parse::<ProfileConfig>(
                r#"{"apexClass": {"allItems": true}}"#,
                Path::new("cfg.json"),
            )
            .unwrap_err();
            match err {
                Error::ConfigParse { message, .. } => assert!(message.contains("apexClass")),
                other => panic!("unexpected error: {other:?}"),
            }
        }
    }

    mod translation_tests {
        use super::*;

        #[test]
        fn test_named_only_flags() {
            let config = parse_translation(
                r#"{
                    "sObjects": [
                        {"apiName": "Account",
                         "layouts": {"allTranslations": true},
                         "validationRules": {"itemsFor": ["Rule_1"]}},
                        {"apiName": "Case",
                         "layouts": {"itemsFor": ["Case Layout"]}}
                    ],
                    "customLabels": {"allItems": true},
                    "flows": {"itemsFor": ["My_Flow"]}
                }"#,
            );
            let compiled = CompiledTranslationConfig::compile(config).unwrap();

            assert!(compiled.is_active(TranslationCategory::Layouts));
            assert!(compiled.is_named_only(TranslationCategory::Layouts));
            assert!(compiled.is_named_only(TranslationCategory::ValidationRules));
            assert!(compiled.is_active(TranslationCategory::CustomLabels));
            assert!(!compiled.is_named_only(TranslationCategory::CustomLabels));
            assert!(compiled.is_named_only(TranslationCategory::Flows));
            assert!(!compiled.is_active(TranslationCategory::ObjectRenames));
        }

        #[test]
        fn test_rename_flag_activates_object_renames() {
            let config = parse_translation(
                r#"{"sObjects": [{"apiName": "Account", "retrieveObjectRenameTranslations": true}]}"#,
            );
            let compiled = CompiledTranslationConfig::compile(config).unwrap();
            assert!(compiled.is_active(TranslationCategory::ObjectRenames));
            assert_eq!(compiled.entities().count(), 1);
        }

        #[test]
        fn test_empty_config_rejected() {
            let err =
                CompiledTranslationConfig::compile(TranslationConfig::template()).unwrap_err();
            assert!(matches!(err, Error::ConfigEmpty { ref subject } if subject == "translations"));
        }

        #[test]
        fn test_inactive_entities_are_skipped() {
            let config = parse_translation(
                r#"{
                    "sObjects": [
                        {"apiName": "Account", "fields": {"allItems": true}},
                        {"apiName": "Contact"}
                    ]
                }"#,
            );
            let compiled = CompiledTranslationConfig::compile(config).unwrap();
            let names: Vec<_> = compiled.entities().map(|e| e.name()).collect();
            assert_eq!(names, vec!["Account"]);
        }
    }

    #[test]
    fn test_missing_file_reports_init_command() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");
        let err = from_file::<ProfileConfig>(&path, "sf-toolbox profiles init-config").unwrap_err();
        match err {
            Error::ConfigMissing { hint, .. } => {
                assert!(hint.unwrap().contains("sf-toolbox profiles init-config"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
