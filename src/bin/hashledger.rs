#![forbid(unsafe_code)]
//! HashLedger command line: an interactive session over an in-memory ledger.

use clap::{Parser, Subcommand};
use colored::*;
use hashledger::cli::{session_keys, Shell};
use hashledger::config::{load_config, parse_log_level};
use hashledger::crypto::KeyPair;
use hashledger::Ledger;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "hashledger", version, about = "Signed transfers in hash-linked blocks")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Start the interactive session (default)
    Run {
        /// Hex-encoded 32-byte secp256k1 secret key
        #[arg(long)]
        private_key: Option<String>,
        /// Hex-encoded secp256k1 public key
        #[arg(long)]
        public_key: Option<String>,
    },
    /// Print a freshly generated key pair
    Keygen,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    let level = match cli.log_level.as_deref() {
        Some(level) => parse_log_level(level)?,
        None => config.log_level()?,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();

    match cli.command.unwrap_or(Command::Run {
        private_key: None,
        public_key: None,
    }) {
        Command::Keygen => {
            let keypair = KeyPair::generate();
            println!("{}", "🔑 New key pair".bright_green().bold());
            println!("Private key: {}", hex::encode(keypair.secret_key_bytes()).yellow());
            println!("Public key:  {}", hex::encode(keypair.public_key_bytes()).bright_white());
        }
        Command::Run {
            private_key,
            public_key,
        } => {
            let private_key = match private_key.or(config.keys.private_key.clone()) {
                Some(hex_key) => hex_key,
                None => rpassword::prompt_password("Your private key: ")?,
            };
            let public_key = match public_key.or(config.keys.public_key.clone()) {
                Some(hex_key) => hex_key,
                None => prompt_line("Your public key: ")?,
            };

            let (private_key, public_key) = match session_keys(&private_key, &public_key) {
                Ok(keys) => keys,
                Err(e) => {
                    eprintln!("{}", e.to_string().red());
                    std::process::exit(1);
                }
            };

            let ledger = Ledger::new()?;
            println!("{}", "⛓️  Ledger ready with genesis block".bright_cyan());

            let stdin = io::stdin();
            Shell::new(&ledger, private_key, public_key)
                .show_transactions(config.display.show_transactions)
                .run(stdin.lock(), io::stdout())?;
        }
    }

    Ok(())
}

fn prompt_line(label: &str) -> io::Result<String> {
    print!("{}", label);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}
