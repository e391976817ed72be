//! # Centauri CLI
//!
//! Command-line interface for sending commands to an ELEGOO Centauri Carbon.
//!
//! ## Usage
//!
//! ```bash
//! # List available commands
//! centauri --list-commands
//!
//! # Request printer status
//! centauri 0
//!
//! # List files, printing only the payload
//! centauri 258 --clean
//!
//! # Start printing /local/benchy.gcode
//! centauri 128 benchy
//! ```
//!
//! Set `RUST_LOG=debug` to see the raw messages exchanged with the printer.

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use centauri::{
    CentauriError, CommandCatalog, OutputMode, PrinterClient, SessionConfig,
    printer::DEFAULT_CONFIG_PATH,
};

/// Send a command to an ELEGOO Centauri Carbon
#[derive(Parser, Debug)]
#[command(name = "centauri")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Command key to send (omit to see available commands)
    command: Option<String>,

    /// Parameter for commands that take one (e.g. a file name for 128)
    parameter: Option<String>,

    /// List available commands
    #[arg(long)]
    list_commands: bool,

    /// Print only the reply payload, without the Ack field
    #[arg(long)]
    clean: bool,

    /// Configuration file with printer_ip and mainboard_id
    #[arg(long, value_name = "FILE", default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Command catalog to use instead of the built-in one
    #[arg(long, value_name = "FILE")]
    commands: Option<PathBuf>,

    /// Seconds to wait for a reply (0 waits forever; overrides the config file)
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let catalog = match load_catalog(cli.commands.as_ref()) {
        Ok(catalog) => catalog,
        Err(e) => return fail_startup(e),
    };

    // List commands if --list-commands flag or no command specified
    let Some(command) = cli.command.as_deref().filter(|_| !cli.list_commands) else {
        print_commands(&catalog);
        return ExitCode::SUCCESS;
    };

    let mut config = match SessionConfig::from_path(&cli.config) {
        Ok(config) => config,
        Err(e) => return fail_startup(e),
    };
    if let Some(secs) = cli.timeout {
        config = config.with_timeout((secs > 0).then(|| Duration::from_secs(secs)));
    }

    let mode = if cli.clean {
        OutputMode::Clean
    } else {
        OutputMode::Raw
    };

    let client = PrinterClient::new(config, catalog);
    match client.send(command, cli.parameter.as_deref(), mode).await {
        Ok(reply) => match serde_json::to_string_pretty(&reply) {
            Ok(text) => println!("{}", text),
            Err(e) => println!("❌ Error: {}", e),
        },
        Err(e) => println!("❌ Error: {}", e),
    }

    ExitCode::SUCCESS
}

fn load_catalog(path: Option<&PathBuf>) -> Result<CommandCatalog, CentauriError> {
    match path {
        Some(path) => CommandCatalog::from_path(path),
        None => CommandCatalog::builtin(),
    }
}

fn fail_startup(err: CentauriError) -> ExitCode {
    println!("❌ Error: {}", err);
    ExitCode::FAILURE
}

/// Print the catalog in key order
fn print_commands(catalog: &CommandCatalog) {
    println!("Available commands:");
    for (key, description) in catalog.list_all() {
        let needs_parameter = catalog
            .get(key)
            .and_then(|def| def.parameter.as_ref())
            .map(|slot| format!(" <{}>", slot.field().to_lowercase()))
            .unwrap_or_default();
        println!("  {:>5}{:<12} {}", key, needs_parameter, description);
    }
}
