//! Translation reconciliation.
//!
//! Object-level categories live in `<Entity>-<lang>.objectTranslation-meta.xml`
//! documents, bundle-level categories in `<lang>.translation-meta.xml`.
//! Field translations are separate files and are reconciled at file level by
//! the update pipeline, so they have no rule here.

use crate::config::TranslationCategory;
use crate::document::{Document, DocumentKind};
use crate::merge::{apply_rule, CategoryRule};
use crate::selector::Selector;

/// Field and key of a translation category, or `None` for field
/// translations.
pub fn rule(category: TranslationCategory) -> Option<CategoryRule> {
    let rule = match category {
        TranslationCategory::Fields => return None,
        TranslationCategory::ObjectRenames => CategoryRule::keyed("caseValues", "caseType"),
        TranslationCategory::Layouts => CategoryRule::keyed("layouts", "layout"),
        TranslationCategory::FieldSets => CategoryRule::keyed("fieldSets", "name"),
        TranslationCategory::QuickActions => CategoryRule::keyed("quickActions", "name"),
        TranslationCategory::RecordTypes => CategoryRule::keyed("recordTypes", "name"),
        TranslationCategory::SharingReasons => CategoryRule::keyed("sharingReasons", "name"),
        TranslationCategory::ValidationRules => CategoryRule::keyed("validationRules", "name"),
        TranslationCategory::WebLinks => CategoryRule::keyed("webLinks", "name"),
        TranslationCategory::WorkflowTasks => CategoryRule::keyed("workflowTasks", "name"),
        TranslationCategory::CustomApplications => {
            CategoryRule::keyed("customApplications", "name")
        }
        TranslationCategory::CustomLabels => CategoryRule::keyed("customLabels", "name"),
        TranslationCategory::Flows => CategoryRule::keyed("flowDefinitions", "fullName"),
        TranslationCategory::GlobalQuickActions => CategoryRule::keyed("quickActions", "name"),
        TranslationCategory::ReportTypes => CategoryRule::keyed("reportTypes", "name"),
    };
    Some(rule)
}

/// Document family holding `category`.
pub fn document_kind(category: TranslationCategory) -> DocumentKind {
    if category.is_bundle_level() {
        DocumentKind::Translations
    } else {
        DocumentKind::ObjectTranslation
    }
}

/// Applies one translation category to `current`. Returns whether the
/// document changed.
pub fn apply_translation_category(
    current: &mut Document,
    retrieved: &Document,
    category: TranslationCategory,
    selector: &Selector,
) -> bool {
    debug_assert_eq!(current.kind(), document_kind(category));
    match rule(category) {
        Some(rule) => apply_rule(current.root_mut(), retrieved.root(), &rule, selector),
        None => false,
    }
}
