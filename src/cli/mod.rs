// src/cli/mod.rs

//! Command-line parsing, sessions and command handlers.

use clap::Parser;

use crate::models::{SessionMode, TaskTrackConfig};

pub mod dispatcher;
pub mod handlers;
pub mod input;
pub mod session;

/// Replaces the semantic tags used in message templates (`<title>`, `<cmd>`, ...)
/// with ANSI styles, or strips them when colors are off.
pub fn render_markup(template: &str) -> String {
    let use_colors = colored::control::SHOULD_COLORIZE.should_colorize();

    let title = if use_colors { "\x1b[1;33m" } else { "" }; // Bold Yellow
    let hl = if use_colors { "\x1b[1;36m" } else { "" }; // Bold Cyan
    let cmd = if use_colors { "\x1b[36m" } else { "" }; // Cyan
    let group = if use_colors { "\x1b[1;32m" } else { "" }; // Bold Green
    let dim = if use_colors { "\x1b[2m" } else { "" };
    let reset = if use_colors { "\x1b[0m" } else { "" };

    template
        .replace("<title>", title)
        .replace("</title>", reset)
        .replace("<hl>", hl)
        .replace("</hl>", reset)
        .replace("<cmd>", cmd)
        .replace("</cmd>", reset)
        .replace("<group>", group)
        .replace("</group>", reset)
        .replace("<dim>", dim)
        .replace("</dim>", reset)
}

/// Builds the color-aware `--help` page once; clap keeps the reference.
fn build_help_string() -> &'static str {
    Box::leak(render_markup(t!("cli.help.template")).into_boxed_str())
}

/// tasktrack: a small terminal task tracker backed by a single JSON file.
#[derive(Parser, Debug, Default)]
#[command(
    author,
    version,
    about,
    help_template = { build_help_string() },
    styles = clap::builder::Styles::styled()
        .header(clap::builder::styling::AnsiColor::Yellow.on_default().bold())
        .usage(clap::builder::styling::AnsiColor::Yellow.on_default().bold())
        .literal(clap::builder::styling::AnsiColor::Cyan.on_default().bold())
        .placeholder(clap::builder::styling::AnsiColor::Green.on_default()),
)]
#[command(disable_help_subcommand = true)]
pub struct Cli {
    /// Runs a single command and exits (e.g. `add`, `updateStatus`, `allTasks`, `help`).
    #[arg(short = 'c', long = "command", value_name = "COMMAND")]
    pub command: Option<String>,

    /// Task index for `update`, `delete` and `updateStatus`.
    #[arg(long, value_name = "INDEX", allow_hyphen_values = true)]
    pub index: Option<String>,

    /// Task name for `add` and `update`.
    #[arg(long, value_name = "NAME", allow_hyphen_values = true)]
    pub name: Option<String>,

    /// Task status (0, 1 or 2) for `update` and `updateStatus`.
    #[arg(long, value_name = "STATUS", allow_hyphen_values = true)]
    pub status: Option<String>,

    /// Path of the tasks file. Overrides the config file and TASKTRACK_FILE.
    #[arg(short = 'f', long = "file", value_name = "PATH")]
    pub file: Option<String>,

    /// Seconds between background reloads of the tasks file.
    #[arg(long, value_name = "SECONDS")]
    pub refresh_secs: Option<u64>,

    /// Reload the tasks file in the background during this session.
    #[arg(long, overrides_with = "no_refresh")]
    pub refresh: bool,

    /// Never reload the tasks file in the background during this session.
    #[arg(long, overrides_with = "refresh")]
    pub no_refresh: bool,
}

impl Cli {
    /// `-c` selects a one-shot session; without it the REPL starts.
    pub fn mode(&self) -> SessionMode {
        if self.command.is_some() {
            SessionMode::OneShot
        } else {
            SessionMode::Interactive
        }
    }

    /// Applies the flag layer, the highest-priority configuration source.
    pub fn apply_overrides(&self, config: &mut TaskTrackConfig) {
        if let Some(file) = &self.file {
            config.tasks_file = file.clone();
        }
        if let Some(secs) = self.refresh_secs {
            config.refresh.interval_secs = secs;
        }

        let toggle = if self.refresh {
            Some(true)
        } else if self.no_refresh {
            Some(false)
        } else {
            None
        };
        if let Some(enabled) = toggle {
            match self.mode() {
                SessionMode::Interactive => config.refresh.interactive = enabled,
                SessionMode::OneShot => config.refresh.oneshot = enabled,
            }
        }
    }
}
