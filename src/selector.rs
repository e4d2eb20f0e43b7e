//! Selectors: which records of a category are taken from the org.
//!
//! A [`Selector`] is either [`Selector::All`] (replace the whole category)
//! or an ordered, de-duplicated list of [`SelectorKey`]s. A key matches one
//! record exactly (`Account.Name`) or every record sharing an entity prefix
//! (`Account.*`, or `Account-*` for layouts).
//!
//! Selectors are derived from the compiled configuration on every call and
//! never cached.

use std::collections::BTreeSet;
use std::fmt;

use crate::config::{
    CompiledProfileConfig, CompiledTranslationConfig, ItemSwitch, ProfileCategory,
    TranslationCategory, TranslationEntityConfig,
};
use crate::merge::{profile, MergeShape};

/// Identity of one or more records inside a category.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SelectorKey {
    /// Matches the record whose key equals the string.
    Exact(String),
    /// Matches every record whose key starts with the string.
    Prefix(String),
}

impl SelectorKey {
    /// Parses the textual form: a `*` anywhere turns the part before it into
    /// a prefix.
    pub fn parse(text: &str) -> Self {
        match text.find('*') {
            Some(index) => SelectorKey::Prefix(text[..index].to_string()),
            None => SelectorKey::Exact(text.to_string()),
        }
    }

    /// Key matching every child of `entity`, e.g. `Account.` for fields.
    pub fn entity(entity: &str, separator: char) -> Self {
        SelectorKey::Prefix(format!("{}{}", entity, separator))
    }

    pub fn matches(&self, key: &str) -> bool {
        match self {
            SelectorKey::Exact(exact) => key == exact,
            SelectorKey::Prefix(prefix) => key.starts_with(prefix.as_str()),
        }
    }
}

impl fmt::Display for SelectorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectorKey::Exact(exact) => f.write_str(exact),
            SelectorKey::Prefix(prefix) => write!(f, "{}*", prefix),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// Take the retrieved category wholesale.
    All,
    /// Take only the records matched by these keys.
    Keys(Vec<SelectorKey>),
}

impl Selector {
    /// Builds a key selector, dropping keys whose textual form repeats.
    pub fn keys<I>(keys: I) -> Self
    where
        I: IntoIterator<Item = SelectorKey>,
    {
        let mut seen = BTreeSet::new();
        let keys = keys
            .into_iter()
            .filter(|key| seen.insert(key.to_string()))
            .collect();
        Selector::Keys(keys)
    }

    /// Selector for a wildcard-or-list switch.
    pub fn from_switch(switch: &ItemSwitch) -> Self {
        if switch.all_items {
            Selector::All
        } else {
            Selector::keys(
                switch
                    .names()
                    .into_iter()
                    .map(|name| SelectorKey::Exact(name.to_string())),
            )
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Selector::All)
    }

    /// True when the selector names nothing at all.
    pub fn is_empty(&self) -> bool {
        matches!(self, Selector::Keys(keys) if keys.is_empty())
    }

    /// True when some key selects `key`. `All` selects everything.
    pub fn selects(&self, key: &str) -> bool {
        match self {
            Selector::All => true,
            Selector::Keys(keys) => keys.iter().any(|k| k.matches(key)),
        }
    }
}

fn entity_separator(category: ProfileCategory) -> char {
    match profile::rule(category).shape {
        MergeShape::Keyed {
            separator: Some(separator),
            ..
        } => separator,
        _ => '.',
    }
}

/// Selector for a profile category, derived fresh from `config`.
pub fn profile_selector(config: &CompiledProfileConfig, category: ProfileCategory) -> Selector {
    let entities = config.entities();
    match category {
        ProfileCategory::ObjectPermissions => Selector::keys(
            entities
                .filter(|e| e.retrieve_object_permissions)
                .map(|e| SelectorKey::Exact(e.name().to_string())),
        ),
        ProfileCategory::FieldPermissions => {
            let separator = entity_separator(category);
            let mut keys = Vec::new();
            for entity in entities {
                let Some(fields) = entity.fields.as_ref().filter(|f| f.is_active()) else {
                    continue;
                };
                if fields.all_items {
                    keys.push(SelectorKey::entity(entity.name(), separator));
                } else {
                    keys.extend(fields.names().into_iter().map(|field| {
                        SelectorKey::Exact(format!("{}{}{}", entity.name(), separator, field))
                    }));
                }
            }
            Selector::keys(keys)
        }
        ProfileCategory::RecordTypeVisibilities => {
            let separator = entity_separator(category);
            Selector::keys(
                entities
                    .filter(|e| e.retrieve_record_type_visibilities)
                    .map(|e| SelectorKey::entity(e.name(), separator)),
            )
        }
        ProfileCategory::LayoutAssignments => {
            let separator = entity_separator(category);
            Selector::keys(
                entities
                    .filter(|e| e.retrieve_layout_assignments)
                    .map(|e| SelectorKey::entity(e.name(), separator)),
            )
        }
        ProfileCategory::LoginIpRanges | ProfileCategory::LoginHours => Selector::All,
        generic => {
            let switch = config
                .config()
                .switch(generic)
                .expect("active profile category has a switch");
            Selector::from_switch(switch)
        }
    }
}

/// Selector for an object-level translation category of one entity, or
/// `None` when the entity does not activate the category.
pub fn object_translation_selector(
    entity: &TranslationEntityConfig,
    category: TranslationCategory,
) -> Option<Selector> {
    if !entity.activates(category) {
        return None;
    }
    match category {
        TranslationCategory::ObjectRenames => Some(Selector::All),
        keyed => entity.switch(keyed).map(Selector::from_switch),
    }
}

/// Selector for a bundle-level translation category.
pub fn bundle_selector(
    config: &CompiledTranslationConfig,
    category: TranslationCategory,
) -> Selector {
    let switch = config
        .config()
        .switch(category)
        .expect("active bundle category has a switch");
    Selector::from_switch(switch)
}
