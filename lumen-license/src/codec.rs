//! Binary payload codec.
//!
//! Layout, little-endian, no padding:
//!
//! ```text
//! u8      version type ('R' | 'B' | 'A' | 'E')
//! u8      version string length N
//! [N]     version string (UTF-8)
//! u8      has valid_from (0 | 1)
//! [4]     u16 year, u8 month, u8 day        (only if flag = 1)
//! u8      has valid_until (0 | 1)
//! [4]     u16 year, u8 month, u8 day        (only if flag = 1)
//! [16]    MD5(email)
//! ```

use chrono::{Datelike, NaiveDate};

use crate::error::{LicenseError, LicenseResult};
use crate::record::{CredentialRecord, EMAIL_DIGEST_SIZE, VersionType};

/// Maximum version string length in bytes.
pub const MAX_VERSION_LEN: usize = u8::MAX as usize;

/// Encodes a record into payload bytes.
///
/// # Errors
///
/// Returns [`LicenseError::Format`] if the version string exceeds 255 bytes
/// or a date year does not fit in a `u16`.
pub fn encode_payload(record: &CredentialRecord) -> LicenseResult<Vec<u8>> {
    let version = record.version.as_bytes();
    let version_len = u8::try_from(version.len()).map_err(|_| {
        LicenseError::Format(format!(
            "version string is {} bytes, max {MAX_VERSION_LEN}",
            version.len()
        ))
    })?;

    let mut out = Vec::with_capacity(2 + version.len() + 2 * 5 + EMAIL_DIGEST_SIZE);
    out.push(record.version_type.discriminator());
    out.push(version_len);
    out.extend_from_slice(version);
    write_date(&mut out, record.valid_from)?;
    write_date(&mut out, record.valid_until)?;
    out.extend_from_slice(&record.email_binding);
    Ok(out)
}

/// Decodes payload bytes into a record.
///
/// # Errors
///
/// Returns [`LicenseError::Format`] on an unknown discriminator, truncated
/// input, a bad flag byte, an impossible date, non-UTF-8 version bytes, or
/// bytes left over after the email digest.
pub fn decode_payload(bytes: &[u8]) -> LicenseResult<CredentialRecord> {
    let mut reader = Reader::new(bytes);

    let discriminator = reader.u8("version type")?;
    let version_type = VersionType::from_discriminator(discriminator).ok_or_else(|| {
        LicenseError::Format(format!("unknown version type byte 0x{discriminator:02x}"))
    })?;

    let version_len = reader.u8("version length")? as usize;
    let version_bytes = reader.take(version_len, "version string")?;
    let version = std::str::from_utf8(version_bytes)
        .map_err(|_| LicenseError::Format("version string is not UTF-8".to_string()))?
        .to_string();

    let valid_from = read_date(&mut reader, "valid_from")?;
    let valid_until = read_date(&mut reader, "valid_until")?;

    let mut email_binding = [0u8; EMAIL_DIGEST_SIZE];
    email_binding.copy_from_slice(reader.take(EMAIL_DIGEST_SIZE, "email digest")?);

    if !reader.is_empty() {
        return Err(LicenseError::Format(format!(
            "{} trailing payload bytes",
            reader.remaining()
        )));
    }

    Ok(CredentialRecord {
        version_type,
        version,
        valid_from,
        valid_until,
        email_binding,
    })
}

fn write_date(out: &mut Vec<u8>, date: Option<NaiveDate>) -> LicenseResult<()> {
    let Some(date) = date else {
        out.push(0);
        return Ok(());
    };
    let year = u16::try_from(date.year())
        .map_err(|_| LicenseError::Format(format!("year {} out of range", date.year())))?;
    out.push(1);
    out.extend_from_slice(&year.to_le_bytes());
    // month() is 1..=12 and day() is 1..=31, both fit in a byte
    out.push(date.month() as u8);
    out.push(date.day() as u8);
    Ok(())
}

fn read_date(reader: &mut Reader<'_>, field: &str) -> LicenseResult<Option<NaiveDate>> {
    match reader.u8(field)? {
        0 => Ok(None),
        1 => {
            let year = reader.u16_le(field)?;
            let month = reader.u8(field)?;
            let day = reader.u8(field)?;
            NaiveDate::from_ymd_opt(i32::from(year), u32::from(month), u32::from(day))
                .map(Some)
                .ok_or_else(|| {
                    LicenseError::Format(format!("{field} {year:04}-{month:02}-{day:02} is not a date"))
                })
        }
        flag => Err(LicenseError::Format(format!("{field} flag is {flag}, expected 0 or 1"))),
    }
}

/// Cursor over a byte slice that reports truncation as a format error.
pub(crate) struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub(crate) fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub(crate) fn take(&mut self, len: usize, what: &str) -> LicenseResult<&'a [u8]> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|end| *end <= self.buf.len())
            .ok_or_else(|| {
                LicenseError::Format(format!(
                    "truncated {what}: need {len} bytes, {} left",
                    self.remaining()
                ))
            })?;
        let slice = &self.buf[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    pub(crate) fn u8(&mut self, what: &str) -> LicenseResult<u8> {
        Ok(self.take(1, what)?[0])
    }

    pub(crate) fn u16_le(&mut self, what: &str) -> LicenseResult<u16> {
        let raw = self.take(2, what)?;
        Ok(u16::from_le_bytes([raw[0], raw[1]]))
    }

    pub(crate) fn rest(&mut self) -> &'a [u8] {
        let slice = &self.buf[self.pos..];
        self.pos = self.buf.len();
        slice
    }

    pub(crate) fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.remaining() == 0
    }
}
