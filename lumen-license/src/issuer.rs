//! Offline license key minting.
//!
//! Never ships with the application: it needs the private key.

use chrono::NaiveDate;

use crate::codec::encode_payload;
use crate::error::{LicenseError, LicenseResult};
use crate::key::PrivateKey;
use crate::record::{CredentialRecord, VersionType};
use crate::token::SignedFrame;
use crate::version::VersionSpec;

/// Signs credential records into license keys.
#[derive(Debug, Clone)]
pub struct Issuer {
    private_key: PrivateKey,
}

impl Issuer {
    /// Creates an issuer that signs with `private_key`.
    #[must_use]
    pub fn new(private_key: PrivateKey) -> Self {
        Self { private_key }
    }

    /// Encodes, signs and frames `record` into a token string.
    ///
    /// # Errors
    ///
    /// Returns [`LicenseError::Format`](crate::LicenseError::Format) if the
    /// record cannot be encoded.
    pub fn issue_record(&self, record: &CredentialRecord) -> LicenseResult<String> {
        let payload = encode_payload(record)?;
        let signature = self.private_key.sign(&payload);
        SignedFrame { payload, signature }.encode()
    }

    /// Mints a key for `email` covering `version` on the given channel.
    ///
    /// Rejects an unparseable version and a window that ends before it starts.
    pub fn issue(
        &self,
        version_type: VersionType,
        version: &str,
        valid_from: Option<NaiveDate>,
        valid_until: Option<NaiveDate>,
        email: &str,
    ) -> LicenseResult<String> {
        VersionSpec::parse(version)?;
        if let (Some(from), Some(until)) = (valid_from, valid_until) {
            if from > until {
                return Err(LicenseError::Format(format!(
                    "valid_from {from} is after valid_until {until}"
                )));
            }
        }
        let record = CredentialRecord::new(version_type, version, valid_from, valid_until, email);
        self.issue_record(&record)
    }
}

/// One-shot form of [`Issuer::issue`].
pub fn issue(
    version_type: VersionType,
    version: &str,
    valid_from: Option<NaiveDate>,
    valid_until: Option<NaiveDate>,
    email: &str,
    private_key: &PrivateKey,
) -> LicenseResult<String> {
    Issuer::new(private_key.clone()).issue(version_type, version, valid_from, valid_until, email)
}
