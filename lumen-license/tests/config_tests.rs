mod common;

use common::{EMAIL, TEST_PUBLIC_KEY, make_release_key};
use lumen_license::{DEFAULT_PUBLIC_KEY, LicenseError, Verifier, VerifierConfig};

#[test]
fn embedded_config_uses_default_key() {
    let config = VerifierConfig::embedded().unwrap();
    assert_eq!(config.public_key.to_base64(), DEFAULT_PUBLIC_KEY);
    assert_eq!(
        Verifier::embedded().unwrap().config().public_key,
        config.public_key
    );
}

#[test]
fn injected_key_is_used() {
    let config = VerifierConfig::from_public_key_base64(TEST_PUBLIC_KEY).unwrap();
    let verifier = Verifier::new(config);
    assert!(verifier.is_valid(&make_release_key("1"), "1.0.0", EMAIL));
    assert_eq!(verifier.config().public_key.to_base64(), TEST_PUBLIC_KEY);
}

#[test]
fn config_serializes_key_as_base64() {
    let config = VerifierConfig::from_public_key_base64(TEST_PUBLIC_KEY).unwrap();
    let json = serde_json::to_string(&config).unwrap();
    assert_eq!(json, format!(r#"{{"public_key":"{TEST_PUBLIC_KEY}"}}"#));

    let restored: VerifierConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, config);
}

#[test]
fn config_rejects_bad_key() {
    assert!(serde_json::from_str::<VerifierConfig>(r#"{"public_key":"AAAA"}"#).is_err());
    assert!(matches!(
        VerifierConfig::from_public_key_base64("not base64"),
        Err(LicenseError::InvalidKey(_))
    ));
}
