//! Cipher trait for swappable password-based encryption backends.

use crate::error::VaultError;

/// A password-based cipher suite.
///
/// Implementations are stateless and shared: both methods take `&self`, must
/// not mutate shared state, and may be called concurrently.
pub trait Cipher: Send + Sync {
    /// Encrypt `data` under `password`.
    fn encrypt(&self, data: &[u8], password: &[u8]) -> Result<Vec<u8>, VaultError>;

    /// Decrypt a blob previously produced by [`encrypt`](Self::encrypt).
    ///
    /// A wrong password or tampered blob must be reported as
    /// [`VaultError::AuthenticationFailed`], not as a generic error.
    fn decrypt(&self, data: &[u8], password: &[u8]) -> Result<Vec<u8>, VaultError>;
}

/// Shared argument checks for every built-in cipher.
pub(crate) fn require_input(data: &[u8], password: &[u8]) -> Result<(), VaultError> {
    if data.is_empty() {
        return Err(VaultError::MissingData);
    }
    if password.is_empty() {
        return Err(VaultError::MissingPassword);
    }
    Ok(())
}
