//! Hashmoji CLI - emoji fingerprints and identity proofs.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use hashmoji_identity::{IdentityFields, ProfileUpdate};

mod commands;
mod gate;
mod logging;
mod settings;

use crate::commands::Source;
use crate::gate::PromptGate;
use crate::logging::LogFormat;
use crate::settings::Settings;

/// Hashmoji - content fingerprints you can compare at a glance
#[derive(Parser, Debug)]
#[command(name = "hashmoji")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Identity authority URL (overrides configuration)
    #[arg(long, global = true, value_name = "URL")]
    authority: Option<String>,

    /// Configuration file (default: <config dir>/hashmoji/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log format: pretty or json (overrides configuration)
    #[arg(long, global = true, value_name = "FORMAT")]
    log_format: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the fingerprint of text, a file, or standard input
    Hash {
        /// Text to fingerprint
        text: Option<String>,
        /// File to fingerprint
        #[arg(short, long)]
        file: Option<PathBuf>,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check content against expected symbols and/or hex digest
    Verify {
        /// Text to check
        text: Option<String>,
        /// File to check
        #[arg(short, long)]
        file: Option<PathBuf>,
        /// Expected symbols
        #[arg(short, long)]
        symbols: Option<String>,
        /// Expected SHA-256 hex digest
        #[arg(long)]
        hex: Option<String>,
    },

    /// Print the hex form of a symbol sequence
    Decode {
        /// Symbol sequence
        symbols: String,
    },

    /// Show the symbol alphabet
    Alphabet {
        /// List every symbol with its index
        #[arg(long)]
        list: bool,
    },

    /// Manage identity
    Identity {
        #[command(subcommand)]
        command: IdentityCommands,
    },

    /// Create and verify identity proofs
    Proof {
        #[command(subcommand)]
        command: ProofCommands,
    },

    /// Look up a user's profile
    User {
        /// Public key of the user
        public_key: String,
    },
}

#[derive(Subcommand, Debug)]
enum IdentityCommands {
    /// Register a new identity
    Register {
        /// Display name
        #[arg(long)]
        name: String,
        /// Contact email
        #[arg(long)]
        email: String,
        /// Contact phone number
        #[arg(long)]
        phone: String,
        /// GPG key fingerprint
        #[arg(long)]
        gpg: String,
    },

    /// Log in with an existing private key
    Login {
        /// Private key
        private_key: String,
    },

    /// Delete stored keys
    Logout,

    /// Show current identity
    Show {
        /// Also reveal the private key, after confirmation
        #[arg(long)]
        reveal: bool,
    },

    /// Update profile fields
    Update {
        /// Display name
        #[arg(long)]
        name: Option<String>,
        /// Contact email
        #[arg(long)]
        email: Option<String>,
        /// Contact phone number
        #[arg(long)]
        phone: Option<String>,
        /// GPG key fingerprint
        #[arg(long)]
        gpg: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
enum ProofCommands {
    /// Create a proof for the stored identity
    Create,

    /// Verify a proof given as symbols or hex
    Verify {
        /// Proof sequence
        sequence: String,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let mut settings = match Settings::load(cli.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error: invalid configuration: {e}");
            std::process::exit(1);
        }
    };
    if let Some(url) = cli.authority {
        settings.authority_url = url;
    }

    let format = cli
        .log_format
        .as_deref()
        .map_or(settings.log_format, LogFormat::parse);
    logging::init_logging(cli.verbose, format);

    match run(cli.command, &settings).await {
        Ok(0) => {}
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(1);
        }
    }
}

async fn run(command: Commands, settings: &Settings) -> anyhow::Result<i32> {
    match command {
        Commands::Hash { text, file, json } => {
            commands::hash(&Source::from_args(text, file)?, json)?;
        }
        Commands::Verify {
            text,
            file,
            symbols,
            hex,
        } => {
            let source = Source::from_args(text, file)?;
            let outcome = commands::verify(&source, symbols.as_deref(), hex.as_deref())?;
            return Ok(commands::exit_code(outcome));
        }
        Commands::Decode { symbols } => commands::decode(&symbols)?,
        Commands::Alphabet { list } => commands::alphabet(list)?,
        Commands::Identity { command } => {
            let mut protocol = commands::connect(settings)?;
            match command {
                IdentityCommands::Register {
                    name,
                    email,
                    phone,
                    gpg,
                } => {
                    let fields = IdentityFields {
                        name,
                        email,
                        phone_number: phone,
                        gpg_fingerprint: gpg,
                    };
                    commands::identity_register(&mut protocol, fields).await?;
                }
                IdentityCommands::Login { private_key } => {
                    commands::identity_login(&mut protocol, private_key).await?;
                }
                IdentityCommands::Logout => commands::identity_logout(&mut protocol)?,
                IdentityCommands::Show { reveal } => {
                    commands::identity_show(&mut protocol, reveal, &PromptGate)?;
                }
                IdentityCommands::Update {
                    name,
                    email,
                    phone,
                    gpg,
                } => {
                    let update = ProfileUpdate {
                        name,
                        email,
                        phone_number: phone,
                        gpg_fingerprint: gpg,
                    };
                    commands::identity_update(&mut protocol, update).await?;
                }
            }
        }
        Commands::Proof { command } => {
            let mut protocol = commands::connect(settings)?;
            match command {
                ProofCommands::Create => commands::proof_create(&mut protocol).await?,
                ProofCommands::Verify { sequence } => {
                    return commands::proof_verify(&protocol, &sequence).await;
                }
            }
        }
        Commands::User { public_key } => {
            let protocol = commands::connect(settings)?;
            commands::user(&protocol, &public_key).await?;
        }
    }
    Ok(0)
}
