//! Keys minted by an independent implementation with the shared test key.
//!
//! Each vector carries the exact payload bytes the other implementation
//! signed, so the codec is checked byte for byte in both directions.

mod common;

use chrono::NaiveDate;
use common::test_verifier;
use lumen_license::{CredentialRecord, SignedFrame, VersionType, codec, email_digest};
use pretty_assertions::assert_eq;

struct Vector {
    token: &'static str,
    payload_hex: &'static str,
    email: &'static str,
    running_version: &'static str,
    expected: fn() -> CredentialRecord,
}

fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d)
}

const VECTORS: &[Vector] = &[
    Vector {
        token: "HwBSAzEuMgHoBwEBATMIDB_BYPjMaaTwvysDYnUjU9BgAJlKk2CD_KYURKv0HB8l-_S1uPGwEesNVgAS8UVIRCXjuz6Sum03sRad0jg_0ySEcQHylZ6XZLsWx_SnPcwTqg",
        payload_hex: "5203312e3201e80701010133080c1fc160f8cc69a4f0bf2b0362752353d060",
        email: "alice@example.com",
        running_version: "1.2.9",
        expected: || CredentialRecord {
            version_type: VersionType::Release,
            version: "1.2".to_string(),
            valid_from: date(2024, 1, 1),
            valid_until: date(2099, 12, 31),
            email_binding: email_digest("alice@example.com"),
        },
    },
    Vector {
        token: "HgBFCjMuMC4wLXJjLjEAANo0b2d3F8D22iAyifTQ5VKbGcSuF9gwhIviorLib2gbAhOEyBgYGIsOe8Dj-ITJcaZKP8I5AgNsfb8CRoQjQH-1Qv1eyH7DBXELXrgkxqWd",
        payload_hex: "450a332e302e302d72632e310000da346f677717c0f6da203289f4d0e552",
        email: "Bob.Smith@Example.org",
        running_version: "3.0.0",
        expected: || CredentialRecord {
            version_type: VersionType::Enterprise,
            version: "3.0.0-rc.1".to_string(),
            valid_from: None,
            valid_until: None,
            email_binding: email_digest("Bob.Smith@Example.org"),
        },
    },
    Vector {
        token: "GQBCATIAATIIBg8M-vSFcCiwHXjJz7tXU39-IW3e9MNJpcB2dtL8_OhRP66HmJFjakpuhXM2ITscuBKOCVdtWgif7gB2e7Ws7RW-iOYzzmxQfaGtA5Yjn4rhmg",
        payload_hex: "42013200013208060f0cfaf4857028b01d78c9cfbb57537f7e",
        email: "zoë@example.com",
        running_version: "2.17.0-beta.4",
        expected: || CredentialRecord {
            version_type: VersionType::Beta,
            version: "2".to_string(),
            valid_from: None,
            valid_until: date(2098, 6, 15),
            email_binding: email_digest("zoë@example.com"),
        },
    },
];

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

#[test]
fn foreign_keys_validate() {
    let verifier = test_verifier();
    for vector in VECTORS {
        let record = verifier
            .diagnose(vector.token, vector.running_version, vector.email)
            .unwrap_or_else(|e| panic!("{} rejected: {e}", vector.email));
        assert_eq!(record, (vector.expected)());
    }
}

#[test]
fn foreign_payloads_match_local_encoding() {
    for vector in VECTORS {
        let frame = SignedFrame::decode(vector.token).unwrap();
        assert_eq!(hex(&frame.payload), vector.payload_hex);
        assert_eq!(frame.signature.len(), 64);

        let local = codec::encode_payload(&(vector.expected)()).unwrap();
        assert_eq!(hex(&local), vector.payload_hex);
    }
}

#[test]
fn foreign_keys_bound_to_their_email() {
    let verifier = test_verifier();
    for vector in VECTORS {
        assert!(!verifier.is_valid(vector.token, vector.running_version, "mallory@example.com"));
    }
}
