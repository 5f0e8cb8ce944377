//! CLI command implementations.

use anyhow::{bail, Context, Result};
use std::io::Read;
use std::path::PathBuf;

use hashmoji_core::{Fingerprint, FingerprintService, SymbolAlphabet, VerificationOutcome};
use hashmoji_identity::{
    BiometricGate, CredentialStore, HttpAuthority, IdentityAuthority, IdentityFields,
    IdentityProtocol, KeyringCredentialStore, PrivateKey, ProfileUpdate, ProofInput, UserInfo,
    VerificationVerdict, PROOF_VALIDITY_SECS,
};

use crate::settings::Settings;

/// Protocol wired to the configured authority and the OS keyring.
pub type Protocol = IdentityProtocol<HttpAuthority, KeyringCredentialStore>;

/// Where content to fingerprint comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// Literal text.
    Text(String),
    /// A file on disk.
    File(PathBuf),
    /// Standard input.
    Stdin,
}

impl Source {
    /// Picks the source from the positional text and `--file` arguments.
    pub fn from_args(text: Option<String>, file: Option<PathBuf>) -> Result<Self> {
        match (text, file) {
            (Some(_), Some(_)) => bail!("pass either TEXT or --file, not both"),
            (Some(text), None) => Ok(Self::Text(text)),
            (None, Some(path)) => Ok(Self::File(path)),
            (None, None) => Ok(Self::Stdin),
        }
    }

    /// Reads the full content.
    pub fn read(&self) -> Result<Vec<u8>> {
        match self {
            Self::Text(text) => Ok(text.as_bytes().to_vec()),
            Self::File(path) => {
                std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))
            }
            Self::Stdin => {
                let mut buf = Vec::new();
                std::io::stdin()
                    .read_to_end(&mut buf)
                    .context("failed to read standard input")?;
                Ok(buf)
            }
        }
    }
}

/// Computes the fingerprint of `source`.
pub fn fingerprint(service: &FingerprintService<'_>, source: &Source) -> Result<Fingerprint> {
    match source {
        Source::Text(text) => Ok(service.fingerprint_text(text)),
        Source::File(path) => service
            .fingerprint_file(path)
            .with_context(|| format!("failed to fingerprint {}", path.display())),
        Source::Stdin => Ok(service.fingerprint_of(&source.read()?)),
    }
}

/// Prints the fingerprint of `source`.
pub fn hash(source: &Source, json: bool) -> Result<()> {
    let fp = fingerprint(&FingerprintService::default(), source)?;
    tracing::info!(hex = %fp.hex, "Computed fingerprint");

    if json {
        println!("{}", serde_json::to_string_pretty(&fp)?);
    } else {
        println!("{}", fp.symbols);
        println!("{}", fp.hex);
    }
    Ok(())
}

/// Checks `source` against the expected symbols and/or hex and prints the
/// outcome.
pub fn verify(
    source: &Source,
    symbols: Option<&str>,
    hex: Option<&str>,
) -> Result<VerificationOutcome> {
    let bytes = source.read()?;
    let outcome = FingerprintService::default().verify(&bytes, symbols, hex);
    println!("{}", outcome.message());
    Ok(outcome)
}

/// Maps a verification outcome to the process exit code.
pub fn exit_code(outcome: VerificationOutcome) -> i32 {
    match outcome {
        VerificationOutcome::Match => 0,
        VerificationOutcome::Mismatch => 1,
        VerificationOutcome::Invalid => 2,
    }
}

/// Converts a symbol sequence to uppercase hex.
pub fn decode_to_hex(symbols: &str) -> Result<String> {
    Ok(ProofInput::Symbols(symbols.to_string()).to_wire_hex(SymbolAlphabet::global())?)
}

/// Prints the hex form of a symbol sequence.
pub fn decode(symbols: &str) -> Result<()> {
    println!("{}", decode_to_hex(symbols)?);
    Ok(())
}

/// Prints the alphabet size, and every symbol with its index if `list`.
pub fn alphabet(list: bool) -> Result<()> {
    let alphabet = SymbolAlphabet::global();
    println!("{} symbols", alphabet.len());
    if list {
        for (index, symbol) in alphabet.iter().enumerate() {
            println!("{index:>4}  {symbol}  U+{:X}", u32::from(symbol));
        }
    }
    Ok(())
}

// ==================== Identity ====================

/// Builds a protocol against the configured authority.
pub fn connect(settings: &Settings) -> Result<Protocol> {
    let authority = HttpAuthority::with_timeout(&settings.authority_url, settings.timeout())
        .context("failed to create authority client")?;
    tracing::debug!(url = %authority.base_url(), "Using identity authority");
    let store = KeyringCredentialStore::new(&settings.keyring_service);
    Ok(IdentityProtocol::new(authority, store))
}

/// Registers a new identity.
pub async fn identity_register<A, S>(
    protocol: &mut IdentityProtocol<A, S>,
    fields: IdentityFields,
) -> Result<()>
where
    A: IdentityAuthority,
    S: CredentialStore,
{
    let pair = protocol
        .register(&fields)
        .await
        .context("registration failed")?;

    println!("Registered new identity:");
    println!("  Public Key: {}", pair.public_key);
    println!("\nKeys saved to the system keyring.");
    println!("Use 'hashmoji identity show --reveal' to display the private key.");
    Ok(())
}

/// Logs in with an existing private key.
pub async fn identity_login<A, S>(
    protocol: &mut IdentityProtocol<A, S>,
    private_key: String,
) -> Result<()>
where
    A: IdentityAuthority,
    S: CredentialStore,
{
    if !protocol.login(PrivateKey::new(private_key)).await? {
        bail!("private key not recognized by the authority");
    }
    if let Some(public_key) = protocol.public_key()? {
        println!("Logged in as {public_key}");
    }
    Ok(())
}

/// Deletes stored keys.
pub fn identity_logout<A, S>(protocol: &mut IdentityProtocol<A, S>) -> Result<()>
where
    A: IdentityAuthority,
    S: CredentialStore,
{
    protocol.logout()?;
    println!("Logged out. Stored keys deleted.");
    Ok(())
}

/// Shows the stored identity, revealing the private key only if `gate`
/// agrees.
pub fn identity_show<A, S>(
    protocol: &mut IdentityProtocol<A, S>,
    reveal: bool,
    gate: &dyn BiometricGate,
) -> Result<()>
where
    A: IdentityAuthority,
    S: CredentialStore,
{
    protocol.resume()?;
    let Some(public_key) = protocol.public_key()? else {
        println!("No identity configured. Use 'hashmoji identity register' to create one.");
        return Ok(());
    };

    println!("Public Key: {public_key}");
    if reveal {
        let private_key = protocol.reveal_private_key(gate)?;
        println!("Private Key: {}", private_key.expose());
        println!("WARNING: Keep this key secure and never share it!");
    }
    Ok(())
}

/// Updates profile fields of the stored identity.
pub async fn identity_update<A, S>(
    protocol: &mut IdentityProtocol<A, S>,
    update: ProfileUpdate,
) -> Result<()>
where
    A: IdentityAuthority,
    S: CredentialStore,
{
    if update.is_empty() {
        bail!("nothing to update: pass at least one of --name, --email, --phone, --gpg");
    }
    protocol.resume()?;
    protocol.update_user_info(&update).await?;
    println!("Profile updated.");
    Ok(())
}

/// Creates a proof and prints it with its expiry.
pub async fn proof_create<A, S>(protocol: &mut IdentityProtocol<A, S>) -> Result<()>
where
    A: IdentityAuthority,
    S: CredentialStore,
{
    protocol.resume()?;
    let token = protocol.create_proof().await?;

    println!("{}", token.symbols);
    println!("  Hex: {}", token.hex);
    println!(
        "  Valid for {PROOF_VALIDITY_SECS}s, until {}",
        token.expires_at().format("%H:%M:%S UTC")
    );
    Ok(())
}

/// Verifies a proof and prints the verdict. Returns the exit code.
pub async fn proof_verify<A, S>(protocol: &IdentityProtocol<A, S>, sequence: &str) -> Result<i32>
where
    A: IdentityAuthority,
    S: CredentialStore,
{
    let input = ProofInput::parse(sequence)?;
    match protocol.verify_proof(&input).await? {
        VerificationVerdict::Verified {
            public_key,
            created_at,
            created_at_utc,
        } => {
            println!("Verified");
            println!("  Public Key: {public_key}");
            match created_at_utc {
                Some(time) => println!("  Created: {time}"),
                None => println!("  Created: {created_at}"),
            }
            match protocol.fetch_user_info(&public_key).await {
                Ok(Some(info)) => print_user_info(&info),
                Ok(None) => println!("  (no profile)"),
                Err(e) => tracing::warn!(error = %e, "Failed to fetch user info"),
            }
            Ok(0)
        }
        VerificationVerdict::NotVerified { message } => {
            println!("Not verified: {message}");
            Ok(1)
        }
    }
}

/// Looks up and prints a user's profile.
pub async fn user<A, S>(protocol: &IdentityProtocol<A, S>, public_key: &str) -> Result<()>
where
    A: IdentityAuthority,
    S: CredentialStore,
{
    match protocol.fetch_user_info(public_key).await? {
        Some(info) => {
            println!("User {public_key}");
            print_user_info(&info);
            Ok(())
        }
        None => bail!("no user found for {public_key}"),
    }
}

fn print_user_info(info: &UserInfo) {
    for line in user_info_lines(info) {
        println!("  {line}");
    }
}

fn user_info_lines(info: &UserInfo) -> Vec<String> {
    [
        ("Name", &info.name),
        ("Email", &info.email),
        ("Phone", &info.phone_number),
        ("GPG", &info.gpg_fingerprint),
    ]
    .into_iter()
    .filter_map(|(label, value)| value.as_ref().map(|v| format!("{label}: {v}")))
    .collect()
}
