//! Offline minting tool for Lumen license keys.
//!
//! Holds the private key, so it never ships with the application. The
//! binary in `main.rs` is a thin clap wrapper over these functions.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use lumen_license::{
    CredentialRecord, Issuer, KeyPair, PrivateKey, Verifier, VerifierConfig, VersionType,
};
use tracing::{debug, info};

/// What to put in a new license key.
#[derive(Debug, Clone)]
pub struct IssueRequest {
    pub version_type: VersionType,
    pub version: String,
    pub valid_from: Option<NaiveDate>,
    pub valid_until: Option<NaiveDate>,
    pub email: String,
}

/// Generates a key pair, writes the private key as PKCS#8 PEM to
/// `private_out`, and returns the base64 public key to embed in the app.
///
/// Refuses to overwrite an existing file unless `force` is set.
pub fn keygen(private_out: &Path, force: bool) -> Result<String> {
    if private_out.exists() && !force {
        bail!(
            "{} already exists, pass --force to overwrite",
            private_out.display()
        );
    }

    let pair = KeyPair::generate().context("generating key pair")?;
    let pem = pair
        .private_key
        .to_pkcs8_pem()
        .context("encoding private key")?;

    if let Some(parent) = private_out.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    fs::write(private_out, pem)
        .with_context(|| format!("writing {}", private_out.display()))?;
    info!("Wrote private key to {}", private_out.display());

    Ok(pair.public_key.to_base64())
}

/// Reads a PKCS#8 PEM private key from disk.
pub fn load_private_key(path: &Path) -> Result<PrivateKey> {
    let pem = fs::read_to_string(path)
        .with_context(|| format!("reading private key {}", path.display()))?;
    let key = PrivateKey::from_pkcs8_pem(&pem)
        .with_context(|| format!("parsing private key {}", path.display()))?;
    debug!("Loaded private key from {}", path.display());
    Ok(key)
}

/// Mints a license key.
pub fn issue(private_key: &PrivateKey, request: &IssueRequest) -> Result<String> {
    let token = Issuer::new(private_key.clone())
        .issue(
            request.version_type,
            &request.version,
            request.valid_from,
            request.valid_until,
            &request.email,
        )
        .context("issuing license key")?;
    info!(
        version_type = %request.version_type,
        version = %request.version,
        "Issued license key"
    );
    Ok(token)
}

/// Checks a license key and explains exactly why it fails, if it does.
///
/// Uses the embedded production key unless `public_key` is given.
pub fn inspect(
    token: &str,
    email: &str,
    running_version: &str,
    public_key: Option<&str>,
) -> Result<CredentialRecord> {
    let config = match public_key {
        Some(encoded) => VerifierConfig::from_public_key_base64(encoded),
        None => VerifierConfig::embedded(),
    }
    .context("loading public key")?;

    let record = Verifier::new(config)
        .diagnose(token, running_version, email)
        .context("license key rejected")?;
    Ok(record)
}

/// Renders a record for the terminal.
#[must_use]
pub fn describe(record: &CredentialRecord) -> String {
    let bound = |date: Option<NaiveDate>| date.map_or_else(|| "-".to_string(), |d| d.to_string());
    format!(
        "type:        {}\nversion:     {}\nvalid from:  {}\nvalid until: {}",
        record.version_type,
        record.version,
        bound(record.valid_from),
        bound(record.valid_until),
    )
}
