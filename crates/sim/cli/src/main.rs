use std::process::ExitCode;

use clap::Parser;
use simkit_apdu_transport_pcsc::PcscDeviceManager;

mod commands;
mod utils;

use commands::*;
use utils::{display, reader};

#[derive(Parser)]
#[command(version, about = "Read, update and authenticate with GSM SIM cards")]
struct Cli {
    /// Optional reader name to use (will auto-detect if not specified)
    #[arg(long)]
    reader: Option<String>,

    /// Debug level output
    #[arg(short, long)]
    debug: bool,

    #[command(flatten)]
    args: SimArgs,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    setup_logging(cli.debug);

    // Bad combinations are rejected before any reader is opened
    let request = match cli.args.request() {
        Ok(request) => request,
        Err(e) => {
            eprintln!("{}", display::error(&e.to_string()));
            return ExitCode::from(2);
        }
    };

    match execute(cli.reader.as_deref(), request) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", display::error(&e.to_string()));
            ExitCode::FAILURE
        }
    }
}

fn execute(reader_name: Option<&str>, request: Request) -> Result<(), Box<dyn std::error::Error>> {
    let manager = PcscDeviceManager::new()?;

    match request {
        Request::Operation { operation, pin } => {
            let transport = reader::connect(&manager, reader_name)?;
            operation_command(transport, &operation, pin.as_ref())
        }
        Request::Triplet { rand, pin } => {
            let transport = reader::connect(&manager, reader_name)?;
            triplet_command(transport, rand, pin.as_ref())
        }
    }
}

fn setup_logging(debug: bool) {
    let level = if debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_ansi(true)
        .init();
}
