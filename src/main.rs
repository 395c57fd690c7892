#![deny(dead_code)] // DO NOT REMOVE THIS EVER
use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use log::{error, info};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

mod utils;

use toxbridge::config::{BridgeConfig, ConfigOverrides};
use toxbridge::credentials::{self, SessionToken};
use toxbridge::envelope::{self, HttpResponse};
use toxbridge::{persistence, presence, snapshot};
use toxbridge::{BridgeError, CoreHandle, MemoryCore, PUBLIC_ID_SIZE};

/// Command line arguments for toxbridge
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "toxbridge: friend list snapshots, state persistence and session credentials for a messaging core."
)]
struct Args {
    /// State file to load and save (overrides TOXBRIDGE_STATE_PATH)
    #[arg(long, value_name = "PATH")]
    state: Option<PathBuf>,

    /// Write logs to this file instead of stderr (overrides TOXBRIDGE_LOG_FILE)
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// off, error, warn, info, debug or trace (overrides TOXBRIDGE_LOG_LEVEL)
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print a new session token
    Token {
        /// Number of entropy bytes (1 to 4096)
        #[arg(long, value_parser = clap::value_parser!(u16).range(1..=credentials::MAX_TOKEN_BYTES as i64))]
        bytes: Option<u16>,
    },
    /// Print the SHA-512 digest of INPUT
    Digest { input: String },
    /// Check INPUT against a stored digest
    Verify { input: String, digest: String },
    /// Print the friend list from the state file as JSON
    Snapshot,
    /// Add a friend to the state file
    AddFriend {
        /// Public identifier as hex
        public_id: String,
        name: String,
    },
    /// Set our own status (NONE, AWAY or BUSY) in the state file
    SetStatus { status: String },
}

fn main() -> ExitCode {
    let args = Args::parse();

    let token_bytes = match &args.command {
        Command::Token { bytes } => bytes.map(usize::from),
        _ => None,
    };
    let config = match BridgeConfig::resolve(ConfigOverrides {
        state_path: args.state.clone(),
        log_file: args.log_file.clone(),
        log_level: args.log_level.clone(),
        token_bytes,
    }) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = utils::setup_logging(config.log_file.as_deref(), config.log_level) {
        eprintln!("Warning: failed to set up logging: {:#}", e);
    }
    info!("System information: {} {}", std::env::consts::OS, std::env::consts::ARCH);

    match run(args.command, &config) {
        Ok(code) => code,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command, config: &BridgeConfig) -> Result<ExitCode> {
    match command {
        Command::Token { .. } => match SessionToken::generate(config.token_bytes) {
            Ok(token) => {
                println!("{}", token);
                Ok(ExitCode::SUCCESS)
            }
            Err(e) => {
                // Every later token would be suspect too, so stop here
                error!("{}; terminating", e);
                eprintln!("Fatal: {}", e);
                Ok(ExitCode::FAILURE)
            }
        },
        Command::Digest { input } => {
            println!("{}", credentials::digest(&input));
            Ok(ExitCode::SUCCESS)
        }
        Command::Verify { input, digest } => {
            if credentials::verify_digest(&input, &digest) {
                println!("ok");
                Ok(ExitCode::SUCCESS)
            } else {
                println!("mismatch");
                Ok(ExitCode::FAILURE)
            }
        }
        Command::Snapshot => {
            let handle = CoreHandle::new(MemoryCore::new());
            let result = persistence::load_shared(&handle, &config.state_path)
                .and_then(|()| snapshot::build_snapshot_shared(&handle))
                .and_then(|records| Ok(serde_json::to_string_pretty(&records)?));
            match result {
                Ok(json) => {
                    println!("{}", json);
                    Ok(ExitCode::SUCCESS)
                }
                Err(e) => Ok(report(&e)),
            }
        }
        Command::AddFriend { public_id, name } => {
            let bytes = hex::decode(public_id.trim()).context("Public id is not valid hex")?;
            let public_id = <[u8; PUBLIC_ID_SIZE]>::try_from(bytes.as_slice()).map_err(|_| {
                anyhow!("Public id must be {} bytes, got {}", PUBLIC_ID_SIZE, bytes.len())
            })?;

            let handle = match open_state(&config.state_path) {
                Ok(handle) => handle,
                Err(e) => return Ok(report(&e)),
            };
            let number = handle.write()?.add_friend(public_id, &name)?;
            if let Err(e) = save_state(&handle, &config.state_path)? {
                return Ok(report(&e));
            }
            println!("{}", number);
            Ok(ExitCode::SUCCESS)
        }
        Command::SetStatus { status } => {
            let handle = match open_state(&config.state_path) {
                Ok(handle) => handle,
                Err(e) => return Ok(report(&e)),
            };
            if let Err(e) = presence::set_presence_shared(&handle, &status) {
                return Ok(report(&e));
            }
            if let Err(e) = save_state(&handle, &config.state_path)? {
                return Ok(report(&e));
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Load the state file, or start empty if it does not exist yet
fn open_state(path: &Path) -> Result<CoreHandle<MemoryCore>, BridgeError> {
    let handle = CoreHandle::new(MemoryCore::new());
    persistence::load_existing_shared(&handle, path)?;
    Ok(handle)
}

/// Save the state file; the inner error is for the client envelope
fn save_state(handle: &CoreHandle<MemoryCore>, path: &Path) -> Result<Result<(), BridgeError>> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Could not create {}", parent.display()))?;
        }
    }
    Ok(persistence::save_shared(handle, path))
}

/// Print the error envelope a client would receive and fail
fn report(err: &BridgeError) -> ExitCode {
    let mut response: Option<HttpResponse> = None;
    envelope::reject_with(&mut response, err);
    if let Some(response) = response {
        println!("{}", String::from_utf8_lossy(&response.body));
    }
    ExitCode::FAILURE
}
