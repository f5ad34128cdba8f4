//! Vault error types.

use std::error::Error as StdError;

use crate::crypto_type::CryptoType;

/// Boxed cause carried by [`VaultError::AuthenticationFailed`].
pub type BoxedCause = Box<dyn StdError + Send + Sync + 'static>;

/// Errors produced by vault operations.
#[derive(Debug, thiserror::Error)]
pub enum VaultError {
    /// The string does not name a known cipher suite.
    #[error("invalid crypto type: {0:?}")]
    InvalidCryptoType(String),

    /// The cipher suite is known but no cipher is registered for it.
    #[error("can not find crypto {0} in crypto table")]
    UnknownCipher(CryptoType),

    /// Decryption ran but the password or ciphertext did not authenticate.
    #[error("authentication failed: {source}")]
    AuthenticationFailed {
        #[source]
        source: BoxedCause,
    },

    #[error("missing password")]
    MissingPassword,

    #[error("missing data")]
    MissingData,

    /// Ciphertext is structurally malformed (bad encoding, truncated, bad header).
    #[error("invalid ciphertext: {0}")]
    InvalidCiphertext(String),

    #[error("invalid kdf params: {0}")]
    InvalidKdfParams(String),

    /// Encryption or key derivation failed for a reason other than authentication.
    #[error("cipher error: {0}")]
    CipherError(String),

    /// Secrets could not be encoded.
    #[error("secrets serialization failed: {0}")]
    Serialization(#[source] serde_json::Error),

    /// Secrets could not be decoded.
    #[error("secrets deserialization failed: {0}")]
    Deserialization(#[source] serde_json::Error),
}

impl VaultError {
    /// Wrap `source` as an authentication failure.
    #[must_use]
    pub fn authentication_failed(source: impl StdError + Send + Sync + 'static) -> Self {
        Self::AuthenticationFailed {
            source: Box::new(source),
        }
    }

    /// True if this is [`VaultError::AuthenticationFailed`].
    pub fn is_authentication_failure(&self) -> bool {
        matches!(self, Self::AuthenticationFailed { .. })
    }
}

/// Walk `err` and its `source()` chain looking for an authentication failure.
///
/// Works through arbitrary caller wrapping, as long as each layer exposes its
/// cause via `source()`.
pub fn is_authentication_failure(err: &(dyn StdError + 'static)) -> bool {
    let mut current = Some(err);
    while let Some(e) = current {
        if e
            .downcast_ref::<VaultError>()
            .is_some_and(VaultError::is_authentication_failure)
        {
            return true;
        }
        current = e.source();
    }
    false
}

/// Cause recorded when a checksum or MAC does not match.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct IntegrityError(pub &'static str);
