//! Cipher suite identifiers.

use std::{fmt, str::FromStr};

use crate::error::VaultError;

/// A supported wallet cipher suite, identified by a stable name.
///
/// Names are case-sensitive and are never trimmed or otherwise normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum CryptoType {
    #[serde(rename = "sha256-xor")]
    Sha256Xor,
    #[serde(rename = "scrypt-chacha20poly1305")]
    ScryptChacha20poly1305,
}

impl CryptoType {
    /// Every known cipher suite. A registry is expected to cover all of them.
    pub const ALL: [Self; 2] = [Self::Sha256Xor, Self::ScryptChacha20poly1305];

    /// The stable name of this suite.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sha256Xor => "sha256-xor",
            Self::ScryptChacha20poly1305 => "scrypt-chacha20poly1305",
        }
    }
}

impl fmt::Display for CryptoType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CryptoType {
    type Err = VaultError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| VaultError::InvalidCryptoType(s.to_string()))
    }
}
