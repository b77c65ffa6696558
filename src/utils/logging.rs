// file: src/utils/logging.rs
// description: tracing subscriber setup and colored console status lines

use colored::*;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

// Dependencies that log archive internals at debug level
const QUIET_TARGETS: [&str; 2] = ["zip", "quick_xml"];

/// Installs the global subscriber. `RUST_LOG` wins over `verbose` when set.
/// Returns false when a subscriber was already installed.
pub fn init_logger(colored_output: bool, verbose: bool) -> bool {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let directives = QUIET_TARGETS
            .iter()
            .fold(level.to_string(), |acc, target| format!("{acc},{target}=warn"));
        EnvFilter::new(directives)
    });

    let fmt_layer = fmt::layer()
        .with_target(verbose)
        .with_thread_ids(false)
        .with_file(verbose)
        .with_line_number(verbose)
        .compact()
        .with_ansi(colored_output);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .is_ok()
}

pub fn format_success(msg: &str) -> String {
    format!("{} {}", "✓".green().bold(), msg.green())
}

pub fn format_error(msg: &str) -> String {
    format!("{} {}", "✗".red().bold(), msg.red())
}

pub fn format_warning(msg: &str) -> String {
    format!("{} {}", "⚠".yellow().bold(), msg.yellow())
}

pub fn format_info(msg: &str) -> String {
    format!("{} {}", "ℹ".blue().bold(), msg)
}

/// `label: value` summary line with a dimmed label.
pub fn format_field(label: &str, value: &str) -> String {
    format!("  {} {}", format!("{label}:").dimmed(), value)
}
