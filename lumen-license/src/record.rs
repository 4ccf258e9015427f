//! The signed credential record carried inside every license key.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};

use crate::error::{LicenseError, LicenseResult};
use crate::version::VersionSpec;

/// Size of the email binding digest in bytes.
pub const EMAIL_DIGEST_SIZE: usize = 16;

/// Release channel a license was minted for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionType {
    /// Stable release.
    Release,
    /// Beta channel.
    Beta,
    /// Alpha channel.
    Alpha,
    /// Enterprise build.
    Enterprise,
}

impl VersionType {
    /// Returns the single-byte discriminator used on the wire.
    #[must_use]
    pub fn discriminator(self) -> u8 {
        match self {
            Self::Release => b'R',
            Self::Beta => b'B',
            Self::Alpha => b'A',
            Self::Enterprise => b'E',
        }
    }

    /// Maps a wire discriminator back to a version type.
    #[must_use]
    pub fn from_discriminator(byte: u8) -> Option<Self> {
        match byte {
            b'R' => Some(Self::Release),
            b'B' => Some(Self::Beta),
            b'A' => Some(Self::Alpha),
            b'E' => Some(Self::Enterprise),
            _ => None,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Release => "release",
            Self::Beta => "beta",
            Self::Alpha => "alpha",
            Self::Enterprise => "enterprise",
        }
    }
}

impl fmt::Display for VersionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VersionType {
    type Err = LicenseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "release" | "r" => Ok(Self::Release),
            "beta" | "b" => Ok(Self::Beta),
            "alpha" | "a" => Ok(Self::Alpha),
            "enterprise" | "e" => Ok(Self::Enterprise),
            other => Err(LicenseError::Format(format!("unknown version type {other:?}"))),
        }
    }
}

/// Computes the email binding digest: MD5 over the exact UTF-8 bytes.
///
/// No case folding or trimming is applied.
#[must_use]
pub fn email_digest(email: &str) -> [u8; EMAIL_DIGEST_SIZE] {
    Md5::digest(email.as_bytes()).into()
}

/// The decoded payload of a license key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRecord {
    /// Release channel.
    pub version_type: VersionType,
    /// Version specifier as written by the issuer.
    pub version: String,
    /// First day (UTC) the key is valid, if bounded.
    pub valid_from: Option<NaiveDate>,
    /// Last day (UTC) the key is valid, if bounded.
    pub valid_until: Option<NaiveDate>,
    /// MD5 digest of the bound email.
    pub email_binding: [u8; EMAIL_DIGEST_SIZE],
}

impl CredentialRecord {
    /// Builds a record bound to `email`.
    #[must_use]
    pub fn new(
        version_type: VersionType,
        version: impl Into<String>,
        valid_from: Option<NaiveDate>,
        valid_until: Option<NaiveDate>,
        email: &str,
    ) -> Self {
        Self {
            version_type,
            version: version.into(),
            valid_from,
            valid_until,
            email_binding: email_digest(email),
        }
    }

    /// Returns true if this record is bound to `email`.
    #[must_use]
    pub fn binds_email(&self, email: &str) -> bool {
        self.email_binding == email_digest(email)
    }

    /// Parses the carried version string.
    ///
    /// # Errors
    ///
    /// Returns [`LicenseError::InvalidVersion`] if the issuer wrote an
    /// unparseable version.
    pub fn version_spec(&self) -> LicenseResult<VersionSpec> {
        VersionSpec::parse(&self.version)
    }
}
