//! Usage instructions printed after a successful bootstrap.

use crate::core::layout::venv_bin_name;
use crate::core::ProjectLayout;

/// Environment variables the entry point reads from the configuration file.
pub const CONFIG_VARIABLES: &[(&str, &str)] = &[
    ("TOR_PROXY_HOST", "Tor SOCKS proxy host"),
    ("TOR_PROXY_PORT", "Tor SOCKS proxy port"),
    ("MONGODB_URI", "database connection URI"),
    ("TELEGRAM_BOT_TOKEN", "Telegram alert bot token"),
    ("TELEGRAM_CHAT_ID", "Telegram chat to alert"),
    ("EMAIL_USERNAME", "SMTP login for e-mail alerts"),
    ("EMAIL_PASSWORD", "SMTP password for e-mail alerts"),
    ("EMAIL_RECIPIENT", "address e-mail alerts go to"),
];

/// Entry point modes.
pub const MODES: &[(&str, &str)] = &[
    ("single", "scan the configured URLs once"),
    ("continuous", "scan repeatedly every --interval seconds"),
    ("test", "check that every component initializes"),
    ("stats", "show stored findings statistics"),
];

/// Entry point flags.
pub const FLAGS: &[(&str, &str)] = &[
    ("--config, -c <path>", "configuration file"),
    ("--urls, -u <path>", "file with URLs to scan"),
    ("--interval, -i <secs>", "interval for continuous mode (default 3600)"),
    ("--verbose, -v", "enable verbose logging"),
];

/// Build the usage instructions for a project.
pub fn usage_hints(layout: &ProjectLayout) -> Vec<String> {
    let mut lines = Vec::new();
    let config = layout.display(&layout.config_file());
    let entry = layout.display(&layout.entry_point());
    let python = layout.display(&layout.venv_python());

    lines.push("Setup complete.".to_string());
    lines.push(String::new());
    lines.push(format!("Edit `{}` to configure:", config));
    for (var, what) in CONFIG_VARIABLES {
        lines.push(format!("  {:<20} {}", var, what));
    }

    lines.push(String::new());
    lines.push("Activate the environment:".to_string());
    lines.push(format!("  {}", activation_command(layout)));

    lines.push(String::new());
    lines.push("Run the monitor:".to_string());
    for (mode, what) in MODES {
        lines.push(format!("  {} {} --mode {:<11} # {}", python, entry, mode, what));
    }

    lines.push(String::new());
    lines.push("Options:".to_string());
    for (flag, what) in FLAGS {
        lines.push(format!("  {:<24} {}", flag, what));
    }

    lines
}

/// Activation command for the host platform.
pub fn activation_command(layout: &ProjectLayout) -> String {
    let bin = layout.display(&layout.venv_dir().join(venv_bin_name()));
    if cfg!(windows) {
        format!("{}\\activate", bin)
    } else {
        format!("source {}/activate", bin)
    }
}
