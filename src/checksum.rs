//! Fingerprints for generated units
//!
//! Every generated file carries a SHA256 of its body in the header, so a hand
//! edit can be told apart from stale output.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Header line prefix carrying the fingerprint
pub const FINGERPRINT_PREFIX: &str = "// fingerprint: sha256:";

/// SHA256 fingerprint of generated content
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Compute fingerprint from raw bytes
    pub fn from_bytes(data: &[u8]) -> Self {
        let hash = Sha256::digest(data);
        Self(format!("{:x}", hash))
    }

    pub fn of(content: &str) -> Self {
        Self::from_bytes(content.as_bytes())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Verify that content matches this fingerprint
    pub fn verify(&self, content: &str) -> bool {
        *self == Self::of(content)
    }

    /// The header line for this fingerprint
    pub fn header_line(&self) -> String {
        format!("{}{}", FINGERPRINT_PREFIX, self.0)
    }

    /// Split a generated file into its recorded fingerprint and body.
    ///
    /// The body starts after the first blank line following the header.
    pub fn read_header(file: &str) -> Option<(Self, &str)> {
        let line = file.lines().find(|l| l.starts_with(FINGERPRINT_PREFIX))?;
        let recorded = Self(line[FINGERPRINT_PREFIX.len()..].trim().to_string());
        let body_start = file.find("\n\n")? + 2;
        Some((recorded, &file[body_start..]))
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Fingerprint {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}
