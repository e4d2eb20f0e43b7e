//! Profile reconciliation.
//!
//! Maps every [`ProfileCategory`] to the profile field it owns and applies
//! the active ones to a local profile.

use crate::config::{CompiledProfileConfig, ProfileCategory};
use crate::document::{Document, DocumentKind};
use crate::merge::{apply_rule, CategoryRule};
use crate::selector::profile_selector;

/// Field and key of a profile category.
pub fn rule(category: ProfileCategory) -> CategoryRule {
    match category {
        ProfileCategory::ObjectPermissions => CategoryRule::keyed("objectPermissions", "object"),
        ProfileCategory::FieldPermissions => {
            CategoryRule::composite("fieldPermissions", "field", '.')
        }
        ProfileCategory::RecordTypeVisibilities => {
            CategoryRule::composite("recordTypeVisibilities", "recordType", '.')
        }
        ProfileCategory::LayoutAssignments => {
            CategoryRule::composite("layoutAssignments", "layout", '-')
        }
        ProfileCategory::ApexClasses => CategoryRule::keyed("classAccesses", "apexClass"),
        ProfileCategory::ApexPages => CategoryRule::keyed("pageAccesses", "apexPage"),
        ProfileCategory::CustomApplications => {
            CategoryRule::keyed("applicationVisibilities", "application")
        }
        ProfileCategory::CustomMetadataTypes => {
            CategoryRule::keyed("customMetadataTypeAccesses", "name")
        }
        ProfileCategory::CustomPermissions => CategoryRule::keyed("customPermissions", "name"),
        ProfileCategory::CustomSettings => CategoryRule::keyed("customSettingAccesses", "name"),
        ProfileCategory::CustomTabs => CategoryRule::keyed("tabVisibilities", "tab"),
        ProfileCategory::UserPermissions => CategoryRule::keyed("userPermissions", "name"),
        ProfileCategory::ExternalDataSources => {
            CategoryRule::keyed("externalDataSourceAccesses", "externalDataSource")
        }
        ProfileCategory::LoginIpRanges => CategoryRule::overwrite("loginIpRanges"),
        ProfileCategory::LoginHours => CategoryRule::overwrite("loginHours"),
    }
}

/// Applies every active category of `config` to `current`, taking records
/// from `retrieved`. Returns the categories that changed.
pub fn apply_profile_update(
    current: &mut Document,
    retrieved: &Document,
    config: &CompiledProfileConfig,
) -> Vec<ProfileCategory> {
    debug_assert_eq!(current.kind(), DocumentKind::Profile);
    debug_assert_eq!(retrieved.kind(), DocumentKind::Profile);

    let mut changed = Vec::new();
    for category in config.active_categories() {
        let selector = profile_selector(config, category);
        if apply_rule(current.root_mut(), retrieved.root(), &rule(category), &selector) {
            changed.push(category);
        }
    }
    changed
}
