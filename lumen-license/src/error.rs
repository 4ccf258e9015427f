//! Error types for the licensing module.

use thiserror::Error;

/// Reasons a license key can be rejected, or key material can fail to load.
///
/// These are kept distinct for issuer tooling and tests. The application-facing
/// [`Verifier::validate`](crate::Verifier::validate) never exposes them and
/// reports [`InvalidLicense`] instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LicenseError {
    /// Malformed base64, framing, or payload bytes.
    #[error("malformed license key: {0}")]
    Format(String),

    /// ECDSA signature does not verify against the public key.
    #[error("license key signature invalid")]
    Signature,

    /// The email digest in the key does not match the supplied email.
    #[error("license key is bound to a different email")]
    IdentityMismatch,

    /// The validity window has not started yet.
    #[error("license key is not valid before {0}")]
    NotYetValid(chrono::NaiveDate),

    /// The validity window has ended.
    #[error("license key expired on {0}")]
    Expired(chrono::NaiveDate),

    /// The key does not cover the running version.
    #[error("license key for version {licensed} does not cover version {running}")]
    VersionMismatch {
        /// Version string carried by the key.
        licensed: String,
        /// Version of the running application.
        running: String,
    },

    /// A version string could not be parsed.
    #[error("invalid version string {0:?}")]
    InvalidVersion(String),

    /// Public or private key material could not be decoded.
    #[error("invalid key material: {0}")]
    InvalidKey(String),

    /// The stored license file could not be read or written.
    #[error("storage error: {0}")]
    Storage(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for LicenseError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for LicenseError {
    fn from(err: std::io::Error) -> Self {
        Self::Storage(err.to_string())
    }
}

/// Result type for license operations.
pub type LicenseResult<T> = Result<T, LicenseError>;

/// The only failure the application ever sees from validation.
///
/// Every [`LicenseError`] collapses into this so callers cannot tell a bad
/// signature from a wrong email or a tampered byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid license key")]
pub struct InvalidLicense;

/// Why [`LicenseStore::save`](crate::LicenseStore::save) did not persist a pair.
#[derive(Debug, Error)]
pub enum SaveError {
    /// The key did not validate. Carries no reason.
    #[error(transparent)]
    Invalid(#[from] InvalidLicense),

    /// The key validated but could not be written.
    #[error(transparent)]
    Storage(#[from] LicenseError),
}
