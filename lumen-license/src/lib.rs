//! Offline license keys for Lumen.
//!
//! This module handles:
//! - Minting license keys with an offline-held P-256 private key
//! - Verifying keys in the application with an embedded public key
//! - Binding keys to an email address and a validity window
//! - Matching the licensed version against the running version
//! - Persisting the accepted key and email
//!
//! # Design Principles
//!
//! - **Offline**: verification never touches the network
//! - **Opaque failures**: [`Verifier::validate`] reports every rejection as
//!   [`InvalidLicense`]; [`Verifier::diagnose`] exists for issuer tooling
//! - **Injected keys**: the embedded public key is only the default path,
//!   [`VerifierConfig::embedded`]; any other key can be injected
//!
//! # License Key Format
//!
//! Keys are `base64url_nopad(u16 len || payload || signature)`, where the
//! signature is ECDSA P-256 / SHA-256 over the binary payload. See
//! [`codec`] for the payload layout.

pub mod codec;
mod error;
mod issuer;
mod key;
mod record;
mod store;
mod token;
mod verifier;
mod version;

pub use error::{InvalidLicense, LicenseError, LicenseResult, SaveError};
pub use issuer::{Issuer, issue};
pub use key::{DEFAULT_PUBLIC_KEY, KeyPair, PrivateKey, PublicKey, SIGNATURE_SIZE};
pub use record::{CredentialRecord, EMAIL_DIGEST_SIZE, VersionType, email_digest};
pub use store::{LICENSE_FILE_NAME, LicenseStore, StoredLicense};
pub use token::SignedFrame;
pub use verifier::{Verifier, VerifierConfig, check_validity_window, check_version};
pub use version::VersionSpec;
