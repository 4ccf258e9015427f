//! Token framing and transport encoding.
//!
//! A token is `u16 LE payload length || payload || signature`, base64-encoded
//! with the URL-safe substitutions `+ -> -` and `/ -> _` and no `=` padding.
//! The signature fills everything after the payload.

use base64::{Engine, engine::general_purpose::STANDARD};

use crate::codec::Reader;
use crate::error::{LicenseError, LicenseResult};

/// Size of the payload length prefix.
const LENGTH_PREFIX_SIZE: usize = 2;

/// A token split into its signed payload and signature bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedFrame {
    /// The bytes covered by the signature.
    pub payload: Vec<u8>,
    /// Signature over `payload`.
    pub signature: Vec<u8>,
}

impl SignedFrame {
    /// Frames and text-encodes the payload and signature.
    ///
    /// # Errors
    ///
    /// Returns [`LicenseError::Format`] if the payload exceeds `u16::MAX` bytes.
    pub fn encode(&self) -> LicenseResult<String> {
        let payload_len = u16::try_from(self.payload.len()).map_err(|_| {
            LicenseError::Format(format!("payload is {} bytes, max {}", self.payload.len(), u16::MAX))
        })?;

        let mut framed =
            Vec::with_capacity(LENGTH_PREFIX_SIZE + self.payload.len() + self.signature.len());
        framed.extend_from_slice(&payload_len.to_le_bytes());
        framed.extend_from_slice(&self.payload);
        framed.extend_from_slice(&self.signature);

        Ok(to_url_safe(&STANDARD.encode(framed)))
    }

    /// Decodes a token string back into payload and signature.
    ///
    /// # Errors
    ///
    /// Returns [`LicenseError::Format`] if the text is not base64, the frame
    /// is shorter than its declared payload, or no signature bytes follow.
    pub fn decode(token: &str) -> LicenseResult<Self> {
        let framed = STANDARD
            .decode(from_url_safe(token.trim()))
            .map_err(|e| LicenseError::Format(format!("invalid base64: {e}")))?;

        let mut reader = Reader::new(&framed);
        let payload_len = reader.u16_le("payload length")? as usize;
        let payload = reader.take(payload_len, "payload")?.to_vec();
        let signature = reader.rest().to_vec();
        if signature.is_empty() {
            return Err(LicenseError::Format("missing signature".to_string()));
        }

        Ok(Self { payload, signature })
    }
}

fn to_url_safe(standard: &str) -> String {
    standard
        .trim_end_matches('=')
        .chars()
        .map(|c| match c {
            '+' => '-',
            '/' => '_',
            other => other,
        })
        .collect()
}

fn from_url_safe(url_safe: &str) -> String {
    let mut standard: String = url_safe
        .chars()
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            other => other,
        })
        .collect();
    while standard.len() % 4 != 0 {
        standard.push('=');
    }
    standard
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_safe_substitution_is_reversible() {
        let standard = "ab+/cd+/e===";
        let safe = to_url_safe(standard);
        assert_eq!(safe, "ab-_cd-_e");
        assert_eq!(from_url_safe(&safe), "ab+/cd+/e===");
    }

    #[test]
    fn padding_restored_to_multiple_of_four() {
        assert_eq!(from_url_safe("QQ"), "QQ==");
        assert_eq!(from_url_safe("QUI"), "QUI=");
        assert_eq!(from_url_safe("QUJD"), "QUJD");
    }

    #[test]
    fn frame_layout() {
        let frame = SignedFrame {
            payload: vec![0xaa, 0xbb, 0xcc],
            signature: vec![0x01, 0x02],
        };
        let token = frame.encode().unwrap();
        assert!(!token.contains('='));
        let raw = STANDARD.decode(from_url_safe(&token)).unwrap();
        assert_eq!(raw, [3, 0, 0xaa, 0xbb, 0xcc, 0x01, 0x02]);
        assert_eq!(SignedFrame::decode(&token).unwrap(), frame);
    }

    #[test]
    fn declared_length_past_end_is_rejected() {
        // length 9, only 3 bytes follow
        let token = to_url_safe(&STANDARD.encode([9u8, 0, 1, 2, 3]));
        assert!(matches!(SignedFrame::decode(&token), Err(LicenseError::Format(_))));
    }

    #[test]
    fn empty_signature_is_rejected() {
        let token = to_url_safe(&STANDARD.encode([1u8, 0, 0x42]));
        assert!(matches!(SignedFrame::decode(&token), Err(LicenseError::Format(_))));
    }

    #[test]
    fn non_base64_is_rejected() {
        assert!(SignedFrame::decode("not*base64!").is_err());
        assert!(SignedFrame::decode("A").is_err());
        assert!(SignedFrame::decode("").is_err());
    }
}
