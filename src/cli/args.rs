//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `build`: write localized copies of the sources, one tree per locale
//! - `check`: run the same pipeline in memory and report problems
//! - `init`: write a default `.trinlinerc.json`

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }

    /// Get the verbose flag from the command's common args.
    pub fn verbose(&self) -> bool {
        match &self.command {
            Some(Command::Build(cmd)) => cmd.common.verbose,
            Some(Command::Check(cmd)) => cmd.common.verbose,
            Some(Command::Init) | None => false,
        }
    }
}

/// Common arguments shared by `build` and `check`.
#[derive(Debug, Clone, Default, Args)]
pub struct CommonArgs {
    /// Source code root directory (overrides config file)
    #[arg(long)]
    pub source_root: Option<PathBuf>,

    /// Catalogs directory path (overrides config file)
    #[arg(long)]
    pub catalogs_root: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Args)]
pub struct BuildCommand {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Locale to build (overrides config file, repeatable)
    #[arg(long = "locale", short = 'l')]
    pub locales: Vec<String>,

    /// Output directory (overrides config file)
    #[arg(long)]
    pub out_dir: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct CheckCommand {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Locale to check (overrides config file, repeatable)
    #[arg(long = "locale", short = 'l')]
    pub locales: Vec<String>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Inline translations and write one localized source tree per locale
    Build(BuildCommand),
    /// Localize in memory and report untranslated or broken call sites
    Check(CheckCommand),
    /// Initialize a new .trinlinerc.json configuration file
    Init,
}
