//! # sf-toolbox Library
//!
//! Reconciles the profiles and translations of a local Salesforce project
//! with a live org. A run retrieves exactly the components a configuration
//! file asks for, grafts the selected categories onto the local documents
//! and writes them back in a canonical, diff-stable form.
//!
//! ## Quick Example
//!
//! ```
//! use sf_toolbox::config::{self, CompiledProfileConfig, ProfileConfig};
//! use sf_toolbox::document::{Document, DocumentKind};
//! use sf_toolbox::merge::profile::apply_profile_update;
//! use std::path::Path;
//!
//! let config: ProfileConfig = config::parse(
//!     r#"{ "apexClasses": { "allItems": true } }"#,
//!     Path::new("profileUpdateConfig.json"),
//! )
//! .unwrap();
//! let config = CompiledProfileConfig::compile(config).unwrap();
//!
//! let xml = |class: &str| format!(
//!     r#"<Profile xmlns="http://soap.sforce.com/2006/04/metadata">
//!         <classAccesses><apexClass>{}</apexClass><enabled>true</enabled></classAccesses>
//!     </Profile>"#,
//!     class
//! );
//! let mut local = Document::parse(DocumentKind::Profile, &xml("Old"), Path::new("local")).unwrap();
//! let org = Document::parse(DocumentKind::Profile, &xml("New"), Path::new("org")).unwrap();
//!
//! apply_profile_update(&mut local, &org, &config);
//! assert!(local.to_xml().contains("<apexClass>New</apexClass>"));
//! ```
//!
//! ## Core Concepts
//!
//! - **Configuration (`config`)**: the JSON documents selecting what to
//!   update, and their compiled form with per-category activity flags.
//! - **Manifest (`manifest`)**: turns a compiled configuration into a
//!   `package.xml`, resolving wildcards against org listings.
//! - **Documents (`document`, `canonical`)**: a field-ordered tree model of
//!   metadata XML and its deterministic ordering.
//! - **Merge (`merge`, `selector`)**: one keyed merge algorithm driven by
//!   per-category tables.
//! - **Org (`org`)**: the [`org::OrgConnection`] seam and its Salesforce CLI
//!   implementation.
//! - **Phases (`phases`)**: the update pipeline, from manifest to cleanup.

pub mod canonical;
pub mod config;
pub mod defaults;
pub mod document;
pub mod error;
pub mod filesystem;
pub mod manifest;
pub mod merge;
pub mod org;
pub mod output;
pub mod phases;
pub mod project;
pub mod selector;

#[cfg(test)]
mod canonical_proptest;
