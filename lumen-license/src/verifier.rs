//! License key verification.
//!
//! Checks run in a fixed order and stop at the first failure:
//!
//! 1. token framing and base64
//! 2. payload decoding
//! 3. ECDSA signature over the payload, then the email binding
//! 4. validity window
//! 5. version coverage
//!
//! [`Verifier::validate`] is what the application calls. It reports every
//! failure as the same [`InvalidLicense`], so a caller probing with forged
//! keys learns nothing about which check rejected them.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::codec::decode_payload;
use crate::error::{InvalidLicense, LicenseError, LicenseResult};
use crate::key::{DEFAULT_PUBLIC_KEY, PublicKey};
use crate::record::CredentialRecord;
use crate::token::SignedFrame;
use crate::version::VersionSpec;

/// Verifier settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifierConfig {
    /// Key that license signatures must verify against.
    pub public_key: PublicKey,
}

impl VerifierConfig {
    /// Uses `public_key` instead of the embedded production key.
    #[must_use]
    pub fn with_public_key(public_key: PublicKey) -> Self {
        Self { public_key }
    }

    /// Uses a base64 DER `SubjectPublicKeyInfo` instead of the embedded key.
    pub fn from_public_key_base64(encoded: &str) -> LicenseResult<Self> {
        PublicKey::from_base64(encoded).map(Self::with_public_key)
    }

    /// Uses the embedded production key.
    pub fn embedded() -> LicenseResult<Self> {
        Self::from_public_key_base64(DEFAULT_PUBLIC_KEY)
    }
}

/// Verifies license keys against one public key.
#[derive(Debug, Clone)]
pub struct Verifier {
    config: VerifierConfig,
}

impl Verifier {
    /// Creates a verifier from explicit settings.
    #[must_use]
    pub fn new(config: VerifierConfig) -> Self {
        Self { config }
    }

    /// Creates a verifier using the embedded production key.
    pub fn embedded() -> LicenseResult<Self> {
        VerifierConfig::embedded().map(Self::new)
    }

    /// Returns the active settings.
    #[must_use]
    pub fn config(&self) -> &VerifierConfig {
        &self.config
    }

    /// Validates `token` for `email` on the running application version.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidLicense`] if any check fails, without saying which.
    pub fn validate(
        &self,
        token: &str,
        running_version: &str,
        email: &str,
    ) -> Result<CredentialRecord, InvalidLicense> {
        self.validate_at(token, running_version, email, Utc::now())
    }

    /// Same as [`validate`](Self::validate) with an explicit clock reading.
    pub fn validate_at(
        &self,
        token: &str,
        running_version: &str,
        email: &str,
        now: DateTime<Utc>,
    ) -> Result<CredentialRecord, InvalidLicense> {
        match self.diagnose_at(token, running_version, email, now) {
            Ok(record) => {
                debug!(
                    version_type = %record.version_type,
                    version = %record.version,
                    "license key accepted"
                );
                Ok(record)
            }
            Err(_) => {
                warn!("license key rejected");
                Err(InvalidLicense)
            }
        }
    }

    /// Returns true if [`validate`](Self::validate) would succeed.
    #[must_use]
    pub fn is_valid(&self, token: &str, running_version: &str, email: &str) -> bool {
        self.validate(token, running_version, email).is_ok()
    }

    /// Runs every check and reports the specific reason for a rejection.
    ///
    /// For issuer-side tooling and tests. Application code must use
    /// [`validate`](Self::validate) so failures stay indistinguishable.
    pub fn diagnose(
        &self,
        token: &str,
        running_version: &str,
        email: &str,
    ) -> LicenseResult<CredentialRecord> {
        self.diagnose_at(token, running_version, email, Utc::now())
    }

    /// Same as [`diagnose`](Self::diagnose) with an explicit clock reading.
    pub fn diagnose_at(
        &self,
        token: &str,
        running_version: &str,
        email: &str,
        now: DateTime<Utc>,
    ) -> LicenseResult<CredentialRecord> {
        let frame = SignedFrame::decode(token)?;
        let record = decode_payload(&frame.payload)?;

        self.config.public_key.verify(&frame.payload, &frame.signature)?;
        if !record.binds_email(email) {
            return Err(LicenseError::IdentityMismatch);
        }

        check_validity_window(&record, now.date_naive())?;
        check_version(&record, running_version)?;
        Ok(record)
    }
}

/// Checks that `today` falls inside the record's validity window.
///
/// Both bounds are inclusive whole UTC days; a missing bound is open.
pub fn check_validity_window(record: &CredentialRecord, today: NaiveDate) -> LicenseResult<()> {
    match (record.valid_from, record.valid_until) {
        (Some(from), _) if today < from => Err(LicenseError::NotYetValid(from)),
        (_, Some(until)) if today > until => Err(LicenseError::Expired(until)),
        _ => Ok(()),
    }
}

/// Checks that the record's version covers `running_version`.
pub fn check_version(record: &CredentialRecord, running_version: &str) -> LicenseResult<()> {
    let licensed = record
        .version_spec()
        .map_err(|_| LicenseError::Format(format!("unparseable licensed version {:?}", record.version)))?;
    let running = VersionSpec::parse(running_version)?;
    if licensed.covers(&running) {
        Ok(())
    } else {
        Err(LicenseError::VersionMismatch {
            licensed: record.version.clone(),
            running: running_version.to_string(),
        })
    }
}
