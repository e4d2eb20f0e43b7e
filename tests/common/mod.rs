//! Shared fixtures for the CLI end-to-end tests.
//!
//! Builds throw-away Salesforce projects and, on Unix, a stand-in `sf`
//! executable that answers the few Salesforce CLI commands an update issues.

#![allow(dead_code)]

use assert_fs::prelude::*;
use assert_fs::TempDir;
use std::path::PathBuf;

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use assert_fs::TempDir;
    pub use predicates::prelude::*;
}

pub const PROJECT_DESCRIPTOR: &str =
    r#"{"packageDirectories":[{"path":"force-app","default":true}],"sourceApiVersion":"60.0"}"#;

pub const LOCAL_ADMIN: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Profile xmlns="http://soap.sforce.com/2006/04/metadata">
    <classAccesses>
        <apexClass>LegacyController</apexClass>
        <enabled>true</enabled>
    </classAccesses>
    <custom>false</custom>
    <userLicense>Salesforce</userLicense>
</Profile>
"#;

pub const ORG_ADMIN: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Profile xmlns="http://soap.sforce.com/2006/04/metadata">
    <userLicense>Salesforce</userLicense>
    <classAccesses>
        <apexClass>InvoiceService</apexClass>
        <enabled>true</enabled>
    </classAccesses>
    <custom>false</custom>
</Profile>
"#;

/// An empty Salesforce project with one package directory.
pub fn sf_project() -> TempDir {
    let temp = TempDir::new().unwrap();
    temp.child("sfdx-project.json")
        .write_str(PROJECT_DESCRIPTOR)
        .unwrap();
    temp.child("force-app/main/default").create_dir_all().unwrap();
    temp
}

/// A project holding a local `Admin` profile.
pub fn sf_project_with_admin() -> TempDir {
    let temp = sf_project();
    temp.child("force-app/main/default/profiles/Admin.profile-meta.xml")
        .write_str(LOCAL_ADMIN)
        .unwrap();
    temp
}

pub fn write_profile_config(project: &TempDir, json: &str) {
    project
        .child(".sf-toolbox/profileUpdateConfig.json")
        .write_str(json)
        .unwrap();
}

pub fn write_translation_config(project: &TempDir, json: &str) {
    project
        .child(".sf-toolbox/translationUpdateConfig.json")
        .write_str(json)
        .unwrap();
}

/// Writes an executable stand-in for the Salesforce CLI.
///
/// `org display` reports API version 60.0, `org list metadata` lists `fr` for
/// `Translations` and nothing otherwise, and `project retrieve start` copies
/// `fixture` into the requested output directory, failing when `fixture`
/// does not exist.
#[cfg(unix)]
pub fn fake_sf(dir: &TempDir, fixture: &std::path::Path) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let script = format!(
        r#"#!/bin/sh
case "$1 $2" in
  "org display")
    echo '{{"status":0,"result":{{"apiVersion":"60.0","alias":"dev"}}}}'
    ;;
  "org list")
    type=""
    while [ $# -gt 0 ]; do
      if [ "$1" = "--metadata-type" ]; then type="$2"; fi
      shift
    done
    if [ "$type" = "Translations" ]; then
      echo '{{"status":0,"result":[{{"fullName":"fr","namespacePrefix":""}}]}}'
    else
      echo '{{"status":0,"result":[]}}'
    fi
    ;;
  "project retrieve")
    out=""
    while [ $# -gt 0 ]; do
      if [ "$1" = "--output-dir" ]; then out="$2"; fi
      shift
    done
    mkdir -p "$out"
    cp -R "{fixture}/." "$out/" 2>/dev/null || {{
      echo '{{"status":1,"message":"retrieve failed"}}'
      exit 1
    }}
    echo '{{"status":0,"result":{{"success":true,"files":[]}}}}'
    ;;
  *)
    echo '{{"status":1,"message":"unexpected command: '"$*"'"}}'
    exit 1
    ;;
esac
"#,
        fixture = fixture.display()
    );

    let path = dir.path().join("fake-sf");
    std::fs::write(&path, script).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// A retrieve fixture holding the org's version of `Admin`.
pub fn admin_fixture() -> TempDir {
    let fixture = TempDir::new().unwrap();
    fixture
        .child("profiles/Admin.profile-meta.xml")
        .write_str(ORG_ADMIN)
        .unwrap();
    fixture
}
