//! CLI argument parsing and command dispatch

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands::{self, Family};
use sf_toolbox::output::OutputConfig;

/// sf-toolbox - Keep Salesforce profiles and translations in sync with an org
#[derive(Parser, Debug)]
#[command(name = "sf-toolbox")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace); RUST_LOG takes precedence
    #[arg(
        long,
        global = true,
        value_name = "LEVEL",
        default_value = "warn",
        value_parser = ["off", "error", "warn", "info", "debug", "trace"]
    )]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Update profile permissions from an org
    Profiles {
        #[command(subcommand)]
        command: FamilyCommand,
    },

    /// Update translations from an org
    Translations {
        #[command(subcommand)]
        command: FamilyCommand,
    },

    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

#[derive(Subcommand, Debug)]
enum FamilyCommand {
    /// Write a configuration template to edit before the first update
    InitConfig(commands::init::InitArgs),

    /// Retrieve the configured components and merge them into the project
    Update(commands::update::UpdateArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        init_logging(&self.log_level);
        let output = OutputConfig::from_env_and_flag(&self.color);

        let (family, command) = match self.command {
            Commands::Profiles { command } => (Family::Profiles, command),
            Commands::Translations { command } => (Family::Translations, command),
            Commands::Completions(args) => return commands::completions::execute(args),
        };

        match command {
            FamilyCommand::InitConfig(args) => commands::init::execute(family, args, &output),
            FamilyCommand::Update(args) => commands::update::execute(family, args, &output),
        }
    }
}

fn init_logging(level: &str) {
    let env = env_logger::Env::default().default_filter_or(level);
    // A second initialisation only happens in tests; keep the first logger.
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .format_target(false)
        .try_init();
}
