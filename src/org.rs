//! Access to the Salesforce org.
//!
//! The update pipeline only talks to the org through the [`OrgConnection`]
//! trait. [`SfCli`] implements it by shelling out to the Salesforce CLI
//! (`sf`), which already handles authentication, API versions and the
//! asynchronous retrieve protocol:
//!
//! - `sf org display` for the API version
//! - `sf org list metadata` for metadata listings
//! - `sf api request rest` for describe, tab and quick action listings
//! - `sf project retrieve start` for the manifest-driven retrieve
//!
//! Every call passes `--json` where supported and maps a non-zero status to
//! [`Error::OrgCommand`] or [`Error::RetrievalFailed`].

use std::path::{Path, PathBuf};
use std::process::Command;

use serde::Deserialize;
use serde_json::Value as JsonValue;

use crate::error::{Error, Result};

/// One entry of a metadata listing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileProperties {
    pub full_name: String,
    #[serde(default)]
    pub namespace_prefix: Option<String>,
}

impl FileProperties {
    pub fn new(full_name: impl Into<String>) -> Self {
        Self {
            full_name: full_name.into(),
            namespace_prefix: None,
        }
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace_prefix = Some(namespace.into());
        self
    }

    /// Namespace prefix, ignoring the empty string some APIs return.
    pub fn namespace(&self) -> Option<&str> {
        self.namespace_prefix
            .as_deref()
            .filter(|prefix| !prefix.is_empty())
    }
}

/// One entry of the global describe.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SObjectSummary {
    pub name: String,
    #[serde(default, rename = "customSetting")]
    pub is_custom_setting: bool,
}

/// One tab as returned by the REST `tabs` resource.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabDescription {
    pub name: String,
    #[serde(default)]
    pub sobject_name: Option<String>,
}

/// One global quick action.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct QuickActionSummary {
    pub name: String,
}

/// Read-only listings plus the retrieve operation the pipeline needs.
pub trait OrgConnection {
    /// API version used for manifests and REST calls, e.g. `60.0`.
    fn api_version(&self) -> &str;

    fn list_metadata(&self, metadata_type: &str) -> Result<Vec<FileProperties>>;

    fn describe_global(&self) -> Result<Vec<SObjectSummary>>;

    fn list_tabs(&self, api_version: &str) -> Result<Vec<TabDescription>>;

    fn list_global_quick_actions(&self, api_version: &str) -> Result<Vec<QuickActionSummary>>;

    /// Retrieves the components of `manifest` into `destination`, blocking
    /// until the org reports a terminal status.
    fn retrieve(&self, manifest: &Path, destination: &Path) -> Result<()>;
}

/// [`OrgConnection`] backed by the Salesforce CLI.
#[derive(Debug, Clone)]
pub struct SfCli {
    program: PathBuf,
    target_org: String,
    project_root: PathBuf,
    api_version: String,
}

impl SfCli {
    /// Resolves the org's API version and returns a ready connection.
    ///
    /// Commands run from `project_root`, which must hold `sfdx-project.json`.
    pub fn connect(program: &Path, target_org: &str, project_root: &Path) -> Result<Self> {
        let mut cli = Self {
            program: program.to_path_buf(),
            target_org: target_org.to_string(),
            project_root: project_root.to_path_buf(),
            api_version: String::new(),
        };

        let display = cli.run_json(&["org", "display"])?;
        cli.api_version = display
            .get("apiVersion")
            .and_then(JsonValue::as_str)
            .map(str::to_string)
            .ok_or_else(|| Error::OrgCommand {
                command: "org display".to_string(),
                message: "response has no apiVersion".to_string(),
            })?;

        log::debug!(
            "connected to {} with API version {}",
            cli.target_org,
            cli.api_version
        );
        Ok(cli)
    }

    pub fn target_org(&self) -> &str {
        &self.target_org
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(args)
            .args(["--target-org", self.target_org.as_str()])
            .current_dir(&self.project_root);
        command
    }

    fn execute(&self, args: &[&str], json_flag: bool) -> Result<String> {
        let mut command = self.command(args);
        if json_flag {
            command.arg("--json");
        }
        log::debug!("running {} {}", self.program.display(), args.join(" "));

        let output = command.output().map_err(|e| Error::OrgCommand {
            command: args.join(" "),
            message: format!("could not run {}: {}", self.program.display(), e),
        })?;
        let stdout = String::from_utf8_lossy(&output.stdout).to_string();

        // With --json the CLI reports failures on stdout, so only fail here
        // when there is nothing to parse.
        if !output.status.success() && stdout.trim().is_empty() {
            return Err(Error::OrgCommand {
                command: args.join(" "),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(stdout)
    }

    fn run_json(&self, args: &[&str]) -> Result<JsonValue> {
        let stdout = self.execute(args, true)?;
        parse_envelope(&args.join(" "), &stdout)
    }

    fn rest_get(&self, resource: &str) -> Result<JsonValue> {
        let args = ["api", "request", "rest", resource];
        let stdout = self.execute(&args, false)?;
        serde_json::from_str(&stdout).map_err(|e| Error::OrgCommand {
            command: args.join(" "),
            message: format!("unreadable response: {}", e),
        })
    }
}

/// Extracts `result` from the CLI's `--json` envelope.
pub fn parse_envelope(command: &str, stdout: &str) -> Result<JsonValue> {
    let envelope: JsonValue = serde_json::from_str(stdout).map_err(|e| Error::OrgCommand {
        command: command.to_string(),
        message: format!("unreadable response: {}", e),
    })?;

    let status = envelope.get("status").and_then(JsonValue::as_i64).unwrap_or(1);
    if status != 0 {
        let message = envelope
            .get("message")
            .and_then(JsonValue::as_str)
            .unwrap_or("unknown error")
            .to_string();
        return Err(Error::OrgCommand {
            command: command.to_string(),
            message,
        });
    }

    Ok(envelope.get("result").cloned().unwrap_or(JsonValue::Null))
}

/// Decodes a metadata listing. A single entry may come back as an object.
pub fn parse_file_properties(result: JsonValue) -> Result<Vec<FileProperties>> {
    let entries = match result {
        JsonValue::Null => return Ok(Vec::new()),
        JsonValue::Array(_) => result,
        single => JsonValue::Array(vec![single]),
    };
    Ok(serde_json::from_value(entries)?)
}

/// Finds the first failed component of a retrieve result, if any.
fn retrieve_failure(result: &JsonValue) -> Option<String> {
    if result.get("success").and_then(JsonValue::as_bool) == Some(false) {
        let messages: Vec<String> = result
            .get("messages")
            .and_then(JsonValue::as_array)
            .map(|messages| {
                messages
                    .iter()
                    .filter_map(|m| m.get("problem").and_then(JsonValue::as_str))
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        return Some(if messages.is_empty() {
            "the org reported an unsuccessful retrieve".to_string()
        } else {
            messages.join("; ")
        });
    }

    result
        .get("files")
        .and_then(JsonValue::as_array)
        .and_then(|files| {
            files
                .iter()
                .find(|f| f.get("state").and_then(JsonValue::as_str) == Some("Failed"))
        })
        .map(|failed| {
            failed
                .get("error")
                .and_then(JsonValue::as_str)
                .unwrap_or("a component failed to retrieve")
                .to_string()
        })
}

impl OrgConnection for SfCli {
    fn api_version(&self) -> &str {
        &self.api_version
    }

    fn list_metadata(&self, metadata_type: &str) -> Result<Vec<FileProperties>> {
        let result = self.run_json(&[
            "org",
            "list",
            "metadata",
            "--metadata-type",
            metadata_type,
            "--api-version",
            &self.api_version,
        ])?;
        parse_file_properties(result)
    }

    fn describe_global(&self) -> Result<Vec<SObjectSummary>> {
        let body = self.rest_get(&format!("/services/data/v{}/sobjects", self.api_version))?;
        let sobjects = body.get("sobjects").cloned().unwrap_or(JsonValue::Array(Vec::new()));
        Ok(serde_json::from_value(sobjects)?)
    }

    fn list_tabs(&self, api_version: &str) -> Result<Vec<TabDescription>> {
        let body = self.rest_get(&format!("/services/data/v{}/tabs", api_version))?;
        Ok(serde_json::from_value(body)?)
    }

    fn list_global_quick_actions(&self, api_version: &str) -> Result<Vec<QuickActionSummary>> {
        let body = self.rest_get(&format!("/services/data/v{}/quickActions", api_version))?;
        Ok(serde_json::from_value(body)?)
    }

    fn retrieve(&self, manifest: &Path, destination: &Path) -> Result<()> {
        let manifest = manifest.to_string_lossy();
        let destination = destination.to_string_lossy();
        let args = [
            "project",
            "retrieve",
            "start",
            "--manifest",
            manifest.as_ref(),
            "--output-dir",
            destination.as_ref(),
            "--api-version",
            self.api_version.as_str(),
            "--wait",
            "60",
        ];
        let stdout = self.execute(&args, true)?;
        let result = parse_envelope("project retrieve start", &stdout).map_err(|e| match e {
            Error::OrgCommand { message, .. } => Error::RetrievalFailed { message },
            other => other,
        })?;

        if let Some(message) = retrieve_failure(&result) {
            return Err(Error::RetrievalFailed { message });
        }
        Ok(())
    }
}
