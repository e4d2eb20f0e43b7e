//! # Update Command Implementation
//!
//! Implements `profiles update` and `translations update`:
//!
//! 1. Load and compile the configuration (fails before any org access when
//!    the file is missing, invalid or activates nothing).
//! 2. Load the Salesforce project descriptor.
//! 3. Connect to the org through the Salesforce CLI.
//! 4. Run the update pipeline and print its report.

use anyhow::Result;
use clap::Args;
use std::path::{Path, PathBuf};

use sf_toolbox::config::{
    self, CompiledProfileConfig, CompiledTranslationConfig, ProfileConfig, TranslationConfig,
};
use sf_toolbox::defaults::DEFAULT_SF_BIN;
use sf_toolbox::org::SfCli;
use sf_toolbox::output::{dim, emoji, header, spinner, OutputConfig};
use sf_toolbox::phases::orchestrator::{run_profile_update, run_translation_update};
use sf_toolbox::phases::UpdateReport;
use sf_toolbox::project::Project;

use super::{project_root, Family};

/// Retrieve the configured components and merge them into the project
#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Alias or username of the org to retrieve from
    #[arg(short = 'o', long, value_name = "ALIAS")]
    pub target_org: String,

    /// Path to the configuration file (defaults to .sf-toolbox/<family config>)
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Salesforce project root (defaults to the current directory)
    #[arg(long, value_name = "PATH")]
    pub project_dir: Option<PathBuf>,

    /// Salesforce CLI executable
    #[arg(long, value_name = "PATH", env = "SF_TOOLBOX_SF_BIN", default_value = DEFAULT_SF_BIN)]
    pub sf_bin: PathBuf,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

/// Execute the `update` command for `family`.
pub fn execute(family: Family, args: UpdateArgs, output: &OutputConfig) -> Result<()> {
    let root = project_root(args.project_dir)?;
    let config_path = args.config.unwrap_or_else(|| family.config_path(&root));
    let init_command = family.init_command();

    let report = match family {
        Family::Profiles => {
            let raw: ProfileConfig = config::from_file(&config_path, &init_command)?;
            let compiled = CompiledProfileConfig::compile(raw)?;
            let project = Project::load(&root)?;
            let org = connect(&args.sf_bin, &args.target_org, &project, output)?;
            let progress = spinner(output, "Updating profiles");
            let result = run_profile_update(&project, &compiled, &org);
            progress.finish_and_clear();
            result?
        }
        Family::Translations => {
            let raw: TranslationConfig = config::from_file(&config_path, &init_command)?;
            let compiled = CompiledTranslationConfig::compile(raw)?;
            let project = Project::load(&root)?;
            let org = connect(&args.sf_bin, &args.target_org, &project, output)?;
            let progress = spinner(output, "Updating translations");
            let result = run_translation_update(&project, &compiled, &org);
            progress.finish_and_clear();
            result?
        }
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(family, &report, &root, output);
    }
    Ok(())
}

fn connect(sf_bin: &Path, target_org: &str, project: &Project, output: &OutputConfig) -> Result<SfCli> {
    let progress = spinner(output, &format!("Connecting to {}", target_org));
    let result = SfCli::connect(sf_bin, target_org, project.root());
    progress.finish_and_clear();
    Ok(result?)
}

fn display_path(path: &Path, root: &Path) -> String {
    path.strip_prefix(root).unwrap_or(path).display().to_string()
}

fn print_report(family: Family, report: &UpdateReport, root: &Path, output: &OutputConfig) {
    if report.is_unchanged() {
        println!(
            "{} {} already up to date",
            emoji(output, "✅", "[OK]"),
            header(output, family.command_name())
        );
    } else {
        println!(
            "{} {} updated",
            emoji(output, "✅", "[OK]"),
            header(output, family.command_name())
        );
        for (label, paths) in [
            ("updated", &report.written),
            ("created", &report.copied),
            ("deleted", &report.deleted),
        ] {
            for path in paths {
                println!("  {} {}", dim(output, label), display_path(path, root));
            }
        }
    }

    if let Some(warning) = &report.cleanup_warning {
        eprintln!("{} {}", emoji(output, "⚠️ ", "[WARN]"), warning);
    }
}
