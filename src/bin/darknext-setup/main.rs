//! darknext-setup CLI - bootstrap a DARKNEXT checkout

use anyhow::Result;
use clap::Parser;
use miette::Diagnostic;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands, MessageFormat};
use darknext_setup::util::{GlobalContext, Shell};
use darknext_setup::BootstrapError;

fn main() {
    let cli = Cli::parse();

    let shell = Shell::from_flags(
        cli.quiet,
        cli.verbose,
        cli.color,
        cli.message_format == MessageFormat::Json,
    );

    if let Err(e) = run(cli, &shell) {
        let code = match e.downcast_ref::<BootstrapError>() {
            Some(err) => {
                shell.error(err);
                if let Some(help) = err.help() {
                    if !shell.is_json() {
                        eprintln!("help: {}", help);
                    }
                }
                err.exit_code()
            }
            None => {
                shell.error(format!("{:#}", e));
                1
            }
        };
        std::process::exit(code);
    }
}

fn run(cli: Cli, shell: &Shell) -> Result<()> {
    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("darknext_setup=debug")
    } else {
        EnvFilter::new("darknext_setup=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let mut ctx = match cli.root {
        Some(root) => GlobalContext::with_root(root)?,
        None => GlobalContext::new()?,
    };
    ctx.set_verbose(cli.verbose);

    // Execute command
    match cli.command.unwrap_or(Commands::Run(Default::default())) {
        Commands::Run(args) => commands::run::execute(&ctx, shell, cli.python, args),
        Commands::Doctor => commands::doctor::execute(&ctx, cli.python),
        Commands::Hints => commands::hints::execute(&ctx, shell),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}
