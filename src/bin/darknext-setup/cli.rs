//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell as CompletionShell;

use darknext_setup::util::shell::ColorChoice;

/// Set up a DARKNEXT checkout: virtual environment, dependencies,
/// configuration file and a self-test run.
///
/// With no subcommand, runs the full bootstrap.
#[derive(Parser)]
#[command(name = "darknext-setup")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Coloring: auto, always, never
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    pub color: ColorChoice,

    /// Output format for messages
    #[arg(long, global = true, value_enum, default_value_t = MessageFormat::Human)]
    pub message_format: MessageFormat,

    /// Project root (defaults to the current directory)
    #[arg(long, global = true, env = "DARKNEXT_ROOT")]
    pub root: Option<PathBuf>,

    /// Python interpreter used to create the virtual environment
    #[arg(long, global = true, env = "DARKNEXT_PYTHON")]
    pub python: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MessageFormat {
    Human,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the bootstrap procedure (the default)
    Run(RunArgs),

    /// Check the checkout without changing anything
    Doctor,

    /// Print usage instructions for the installed monitor
    Hints,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Do not run the dependency installer
    #[arg(long)]
    pub skip_install: bool,

    /// Do not run the entry point self-test
    #[arg(long)]
    pub skip_self_test: bool,

    /// Show what would be done without doing it
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: CompletionShell,
}
