//! # Init Config Command Implementation
//!
//! Implements `profiles init-config` and `translations init-config`, which
//! write a configuration template to `.sf-toolbox/` in the project. Every
//! category is present with identity defaults (empty lists, `false` flags),
//! so the template activates nothing until it is edited.
//!
//! An existing configuration file is never overwritten unless `--force` is
//! given.

use anyhow::Result;
use clap::Args;
use std::fs;
use std::path::PathBuf;

use sf_toolbox::config::{to_pretty_json, ProfileConfig, TranslationConfig};
use sf_toolbox::output::{emoji, OutputConfig};

use super::{project_root, Family};

/// Write a configuration template to edit before the first update
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Salesforce project root (defaults to the current directory)
    #[arg(long, value_name = "PATH")]
    pub project_dir: Option<PathBuf>,

    /// Overwrite an existing configuration file
    #[arg(short, long)]
    pub force: bool,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Execute the `init-config` command for `family`.
pub fn execute(family: Family, args: InitArgs, output: &OutputConfig) -> Result<()> {
    let root = project_root(args.project_dir)?;
    let config_path = family.config_path(&root);

    if config_path.exists() && !args.force {
        anyhow::bail!(
            "Configuration file '{}' already exists. Use --force to overwrite.",
            config_path.display()
        );
    }

    let content = match family {
        Family::Profiles => to_pretty_json(&ProfileConfig::template())?,
        Family::Translations => to_pretty_json(&TranslationConfig::template())?,
    };

    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&config_path, content)?;
    log::info!("wrote {}", config_path.display());

    if args.json {
        println!("{}", serde_json::json!({ "path": config_path }));
    } else {
        println!(
            "{} Created {}",
            emoji(output, "✅", "[OK]"),
            config_path.display()
        );
        println!(
            "{} Edit it, then run `sf-toolbox {} update --target-org <alias>`",
            emoji(output, "💡", "[HINT]"),
            family.command_name()
        );
    }

    Ok(())
}
