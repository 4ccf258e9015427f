//! Lumen license minting tool
//!
//! Runs on the vendor's machine, never on a customer's:
//! 1. `keygen` creates the signing key pair
//! 2. `issue` mints license keys
//! 3. `inspect` explains why a customer's key is rejected
//!
//! Usage:
//!   lumen-mint issue --key signing.pem --version 2.1 --email user@example.com

use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use lumen_license::VersionType;
use lumen_mint::{IssueRequest, describe, inspect, issue, keygen, load_private_key};
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "lumen-mint")]
#[command(about = "Offline minting tool for Lumen license keys")]
struct Args {
    /// Enable verbose debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a new signing key pair
    Keygen {
        /// Where to write the PKCS#8 PEM private key
        #[arg(short, long, default_value = "lumen-signing.pem")]
        out: PathBuf,

        /// Overwrite an existing key file
        #[arg(long)]
        force: bool,
    },

    /// Mint a license key
    Issue {
        /// PKCS#8 PEM private key
        #[arg(short, long, env = "LUMEN_MINT_KEY")]
        key: PathBuf,

        /// Release channel (release, beta, alpha, enterprise)
        #[arg(short = 't', long = "type", default_value = "release")]
        version_type: VersionType,

        /// Version covered: "2" for all of 2.x, "2.1" for 2.1.x, "2.1.3" for one release
        #[arg(long)]
        version: String,

        /// First valid day (YYYY-MM-DD, UTC)
        #[arg(long)]
        from: Option<NaiveDate>,

        /// Last valid day (YYYY-MM-DD, UTC)
        #[arg(long)]
        until: Option<NaiveDate>,

        /// Email the key is bound to, exactly as the customer will enter it
        #[arg(long)]
        email: String,
    },

    /// Explain whether and why a license key validates
    Inspect {
        /// The license key
        token: String,

        /// Email the customer entered
        #[arg(long)]
        email: String,

        /// Application version the customer runs
        #[arg(long)]
        running_version: String,

        /// Base64 public key; defaults to the embedded production key
        #[arg(long)]
        public_key: Option<String>,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();
    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    match args.command {
        Command::Keygen { out, force } => {
            let public_key = keygen(&out, force)?;
            info!("Embed this public key in the application");
            println!("{public_key}");
        }
        Command::Issue {
            key,
            version_type,
            version,
            from,
            until,
            email,
        } => {
            let private_key = load_private_key(&key)?;
            let token = issue(
                &private_key,
                &IssueRequest {
                    version_type,
                    version,
                    valid_from: from,
                    valid_until: until,
                    email,
                },
            )?;
            println!("{token}");
        }
        Command::Inspect {
            token,
            email,
            running_version,
            public_key,
        } => {
            let record = inspect(&token, &email, &running_version, public_key.as_deref())?;
            println!("{}", describe(&record));
            info!("License key is valid");
        }
    }

    Ok(())
}
