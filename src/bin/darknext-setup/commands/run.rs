//! `darknext-setup run` command (also the bare invocation)

use std::path::PathBuf;

use anyhow::Result;

use crate::cli::RunArgs;
use darknext_setup::ops::{bootstrap, usage_hints, BootstrapOptions, SystemRunner};
use darknext_setup::util::{GlobalContext, Shell};

pub fn execute(
    ctx: &GlobalContext,
    shell: &Shell,
    python: Option<PathBuf>,
    args: RunArgs,
) -> Result<()> {
    // Load configuration (global + project)
    let config = ctx.load_config();
    let layout = ctx.layout(&config);

    // CLI overrides config
    let mut opts = BootstrapOptions::from_config(&config);
    if python.is_some() {
        opts.python = python;
    }
    opts.skip_install = args.skip_install;
    opts.skip_self_test = args.skip_self_test;
    opts.dry_run = args.dry_run;

    tracing::debug!("bootstrapping {}", layout.root().display());
    let report = bootstrap(&layout, &opts, &mut SystemRunner, shell)?;

    if shell.is_json() {
        shell.json_event(&serde_json::json!({
            "reason": "bootstrap-finished",
            "dry_run": opts.dry_run,
            "created": report.created_anything(),
            "self_test_code": report.self_test_code,
        }));
    } else if !opts.dry_run {
        shell.println("");
        for line in usage_hints(&layout) {
            shell.println(line);
        }
    }

    Ok(())
}
