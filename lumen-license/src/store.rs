//! Persistence of the stored license key and the email it was issued to.
//!
//! The pair is kept as a small JSON file. A pair is only written after it
//! validates, so whatever is on disk was accepted at least once.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{InvalidLicense, LicenseError, LicenseResult, SaveError};
use crate::record::CredentialRecord;
use crate::verifier::Verifier;

/// File name used under the default directory.
pub const LICENSE_FILE_NAME: &str = "license.json";

/// A license key and the plaintext email it is bound to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredLicense {
    /// The token string, verbatim.
    pub key: String,
    /// Email the key was issued to.
    pub email: String,
}

/// Reads and writes the stored license pair.
#[derive(Debug, Clone)]
pub struct LicenseStore {
    path: PathBuf,
}

impl LicenseStore {
    /// Uses `license.json` under the platform config directory.
    ///
    /// # Errors
    ///
    /// Returns [`LicenseError::Storage`] if no config directory is known.
    pub fn open_default() -> LicenseResult<Self> {
        let dir = dirs::config_dir()
            .ok_or_else(|| LicenseError::Storage("no config directory".to_string()))?;
        Ok(Self::at(dir.join("lumen").join(LICENSE_FILE_NAME)))
    }

    /// Uses an explicit file path.
    #[must_use]
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the stored pair, or `None` if nothing was saved.
    pub fn load(&self) -> LicenseResult<Option<StoredLicense>> {
        if !self.path.exists() {
            debug!("No license file at {:?}", self.path);
            return Ok(None);
        }
        let contents = fs::read_to_string(&self.path)?;
        Ok(Some(serde_json::from_str(&contents)?))
    }

    /// Validates the pair and writes it if it is accepted.
    ///
    /// Returns the validated record on success. An invalid pair leaves the
    /// existing file untouched.
    pub fn save(
        &self,
        verifier: &Verifier,
        key: &str,
        email: &str,
        running_version: &str,
    ) -> Result<CredentialRecord, SaveError> {
        let key = key.trim();
        let record = verifier.validate(key, running_version, email)?;
        self.write(&StoredLicense {
            key: key.to_string(),
            email: email.to_string(),
        })?;
        info!("Saved license to {:?}", self.path);
        Ok(record)
    }

    /// Loads the stored pair and validates it.
    ///
    /// A missing file, unreadable file and an invalid key all report
    /// [`InvalidLicense`].
    pub fn validate_stored(
        &self,
        verifier: &Verifier,
        running_version: &str,
    ) -> Result<CredentialRecord, InvalidLicense> {
        let stored = match self.load() {
            Ok(Some(stored)) => stored,
            Ok(None) => return Err(InvalidLicense),
            Err(e) => {
                debug!("Failed to load license file {:?}: {}", self.path, e);
                return Err(InvalidLicense);
            }
        };
        verifier.validate(&stored.key, running_version, &stored.email)
    }

    /// Deletes the stored pair. Succeeds if there was nothing to delete.
    pub fn clear(&self) -> LicenseResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                info!("Removed license file {:?}", self.path);
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, stored: &StoredLicense) -> LicenseResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(stored)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        if let Err(e) = fs::rename(&tmp, &self.path) {
            if let Err(cleanup) = fs::remove_file(&tmp) {
                debug!("Failed to remove {:?}: {}", tmp, cleanup);
            }
            return Err(e.into());
        }
        Ok(())
    }
}
