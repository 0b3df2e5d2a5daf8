//! Command-line interface definitions.
//!
//! Defines all CLI arguments and subcommands using clap.

use crate::config::defaults::CONFIG_FILE;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Folio static site builder CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Config file path (default: folio.toml)
    #[arg(short, long, global = true, default_value = CONFIG_FILE)]
    pub config: PathBuf,

    /// Only print errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// subcommands (default: build)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Arguments of the build command
#[derive(clap::Args, Debug, Clone, Default)]
pub struct BuildArgs {
    /// Content directory path (overrides `[build] input`)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Output directory path (overrides `[build] output`)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Minify the html content
    #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub minify: Option<bool>,

    /// Remove the output directory before building
    #[arg(long)]
    pub clean: bool,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Build the site into the output directory
    Build {
        #[command(flatten)]
        build_args: BuildArgs,
    },

    /// Create a starter site
    Init {
        /// the name(path) of site directory, related to the working directory
        name: Option<PathBuf>,
    },
}

impl Cli {
    pub const fn is_init(&self) -> bool {
        matches!(self.command, Some(Commands::Init { .. }))
    }

    /// Build arguments, `None` for commands that do not build.
    pub fn build_args(&self) -> Option<BuildArgs> {
        match &self.command {
            Some(Commands::Build { build_args }) => Some(build_args.clone()),
            None => Some(BuildArgs::default()),
            Some(Commands::Init { .. }) => None,
        }
    }
}
