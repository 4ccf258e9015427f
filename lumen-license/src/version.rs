//! Partial version specifiers and the license version-matching rule.
//!
//! A license carries the version the issuer intended to cover, written with
//! one to three numeric components. The number of components written decides
//! how strictly it is compared against the running application:
//!
//! | written   | covers                          |
//! |-----------|---------------------------------|
//! | `1`       | every `1.x.y`                   |
//! | `1.2`     | every `1.2.y`                   |
//! | `1.2.3`   | only `1.2.3`                    |
//!
//! Pre-release suffixes (`1.2.3-beta.1`) are kept but never compared.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{LicenseError, LicenseResult};

/// A parsed version string that remembers how many components were written.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VersionSpec {
    /// Major component.
    pub major: u32,
    /// Minor component, 0 when not written.
    pub minor: u32,
    /// Patch component, 0 when not written.
    pub patch: u32,
    /// Text after the first `-`, if any.
    pub pre_release: Option<String>,
    /// Number of numeric components written (1 to 3).
    pub specified_parts: u8,
}

impl VersionSpec {
    /// Parses `major[.minor[.patch]][-pre_release]`.
    ///
    /// # Errors
    ///
    /// Returns [`LicenseError::InvalidVersion`] when there are no numeric
    /// components, more than three, or a component is not a number.
    pub fn parse(input: &str) -> LicenseResult<Self> {
        let invalid = || LicenseError::InvalidVersion(input.to_string());

        let input_trimmed = input.trim();
        let (numeric, pre_release) = match input_trimmed.split_once('-') {
            Some((numeric, suffix)) => (numeric, Some(suffix.to_string())),
            None => (input_trimmed, None),
        };

        let mut parts = [0u32; 3];
        let mut specified_parts = 0u8;
        for component in numeric.split('.') {
            let slot = parts.get_mut(specified_parts as usize).ok_or_else(invalid)?;
            if component.is_empty() || !component.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            *slot = component.parse().map_err(|_| invalid())?;
            specified_parts += 1;
        }

        Ok(Self {
            major: parts[0],
            minor: parts[1],
            patch: parts[2],
            pre_release,
            specified_parts,
        })
    }

    /// Returns true if a license for `self` covers the `running` version.
    ///
    /// Granularity follows `self.specified_parts`; the running version's own
    /// specificity and both pre-release suffixes are ignored.
    #[must_use]
    pub fn covers(&self, running: &VersionSpec) -> bool {
        match self.specified_parts {
            1 => self.major == running.major,
            2 => self.major == running.major && self.minor == running.minor,
            3 => {
                self.major == running.major
                    && self.minor == running.minor
                    && self.patch == running.patch
            }
            _ => false,
        }
    }
}

impl FromStr for VersionSpec {
    type Err = LicenseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for VersionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.major)?;
        if self.specified_parts >= 2 {
            write!(f, ".{}", self.minor)?;
        }
        if self.specified_parts >= 3 {
            write!(f, ".{}", self.patch)?;
        }
        if let Some(pre) = &self.pre_release {
            write!(f, "-{pre}")?;
        }
        Ok(())
    }
}
