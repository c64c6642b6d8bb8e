//! `mcp-notes` command-line entry point.
//!
//! # Responsibility
//! - Resolve configuration from flags and environment variables.
//! - Initialize optional file logging, open the store, dispatch one tool call.
//! - Map failures to a non-zero exit status instead of panicking.

use clap::{Parser, Subcommand};
use log::{error, info};
use mcp_notes_core::{core_version, default_log_level, init_logging, NoteStore};
use mcp_notes_tools::{call_tool, tool_definitions};
use serde_json::Value;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "mcp-notes", version, about = "Tagged markdown notes backed by one JSON file")]
struct Cli {
    /// Path of the persisted notes document.
    #[arg(long, env = "MCP_NOTES_FILE", default_value = "notes.json")]
    notes_file: PathBuf,

    /// Absolute directory for rolling log files; logging is off when unset.
    #[arg(long, env = "MCP_NOTES_LOG_DIR")]
    log_dir: Option<PathBuf>,

    /// Log level: trace|debug|info|warn|error.
    #[arg(long, env = "MCP_NOTES_LOG_LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the tool catalogue as JSON.
    Tools,
    /// Invoke one tool with JSON arguments.
    Call {
        /// Tool name, e.g. `create_note`.
        tool: String,
        /// JSON object with the tool arguments.
        #[arg(default_value = "{}")]
        arguments: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        if let Err(err) = init_logging(level, log_dir) {
            eprintln!("warning: logging disabled: {err}");
        }
    }
    info!(
        "event=cli_start module=cli status=ok core_version={}",
        core_version()
    );

    match run(cli) {
        Ok(code) => code,
        Err(message) => {
            error!("event=cli_run module=cli status=error error={message}");
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode, String> {
    match cli.command {
        Command::Tools => {
            let rendered = serde_json::to_string_pretty(&tool_definitions())
                .map_err(|err| format!("failed to render tool catalogue: {err}"))?;
            println!("{rendered}");
            Ok(ExitCode::SUCCESS)
        }
        Command::Call { tool, arguments } => {
            let arguments: Value = serde_json::from_str(&arguments)
                .map_err(|err| format!("arguments must be valid JSON: {err}"))?;
            let mut store = NoteStore::open(&cli.notes_file).map_err(|err| err.to_string())?;

            let output = call_tool(&mut store, &tool, &arguments);
            println!("{}", output.text);
            Ok(if output.is_error {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            })
        }
    }
}
