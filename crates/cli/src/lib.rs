pub mod commands;

use clap::{Parser, Subcommand};
use std::process::ExitCode;
use travel_core::config::{AppConfig, LoadOptions, LogFormat};

#[derive(Debug, Parser)]
#[command(
    name = "travel",
    about = "Travel desk operator CLI",
    long_about = "Create the travel request table, load demo requests, inspect configuration, check readiness, and call tools directly.",
    after_help = "Examples:\n  travel doctor --json\n  travel seed\n  travel tool get_travel_requests_by_status --args '{\"search_term\":\"pendientes\"}'"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Create the travel request table and indexes when missing")]
    Migrate,
    #[command(about = "Insert demo travel requests covering every status (idempotent)")]
    Seed,
    #[command(
        about = "Inspect effective configuration values with source attribution and redaction"
    )]
    Config,
    #[command(about = "Validate config, database, table and toolbox readiness")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "Invoke a tool with JSON arguments and print its raw output")]
    Tool {
        #[arg(help = "Tool name, e.g. request_travel_booking_logic")]
        name: String,
        #[arg(long, default_value = "{}", help = "Tool arguments as a JSON object")]
        args: String,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_logging();

    let result = match cli.command {
        Command::Migrate => commands::migrate::run(),
        Command::Seed => commands::seed::run(),
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
        Command::Doctor { json } => {
            commands::CommandResult { exit_code: 0, output: commands::doctor::run(json) }
        }
        Command::Tool { name, args } => commands::tool::run(&name, &args),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}

/// Diagnostics go to stderr so stdout stays one JSON envelope. Commands
/// report configuration failures themselves, so a bad config only skips this.
fn init_logging() {
    let Ok(config) = AppConfig::load(LoadOptions::default()) else {
        return;
    };
    let log_level = config.logging.level.parse::<tracing::Level>().unwrap_or(tracing::Level::WARN);
    let builder = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_max_level(log_level);

    let _ = match config.logging.format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
}
