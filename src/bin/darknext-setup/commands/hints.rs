//! `darknext-setup hints` command

use anyhow::Result;

use darknext_setup::ops::usage_hints;
use darknext_setup::util::{GlobalContext, Shell};

pub fn execute(ctx: &GlobalContext, shell: &Shell) -> Result<()> {
    let config = ctx.load_config();
    let layout = ctx.layout(&config);
    let hints = usage_hints(&layout);

    if shell.is_json() {
        shell.json_event(&serde_json::json!({ "reason": "hints", "lines": hints }));
    } else {
        for line in hints {
            println!("{}", line);
        }
    }

    Ok(())
}
