//! `darknext-setup doctor` command

use std::path::PathBuf;

use anyhow::Result;

use darknext_setup::ops::{doctor, format_report, DoctorOptions};
use darknext_setup::util::GlobalContext;

pub fn execute(ctx: &GlobalContext, python: Option<PathBuf>) -> Result<()> {
    let config = ctx.load_config();
    let layout = ctx.layout(&config);

    let options = DoctorOptions {
        python: python.or(config.python.interpreter),
    };

    let report = doctor(&layout, &options);

    print!("{}", format_report(&report, ctx.is_verbose()));

    // Exit with error code if required checks failed
    if !report.all_required_passed() {
        std::process::exit(1);
    }

    Ok(())
}
