//! scrypt key derivation for password → cipher key.

use {
    base64::{Engine, engine::general_purpose::STANDARD},
    zeroize::Zeroizing,
};

use crate::error::VaultError;

/// Length of the random salt generated for each encryption.
pub const SALT_LEN: usize = 32;

/// Upper bound on `log_n` accepted from a ciphertext header (2^24 rounds).
pub const MAX_LOG_N: u8 = 24;

/// Upper bound on the parallelism parameter.
pub const MAX_P: u32 = 16;

/// Upper bound on scrypt working memory, `128 * r * (N + p)` bytes (2 GiB).
pub const MAX_MEMORY: u64 = 2 << 30;

/// scrypt parameters stored alongside each ciphertext.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ScryptParams {
    /// CPU/memory cost as a power of two (default: 20, i.e. N = 1048576).
    pub log_n: u8,
    /// Block size (default: 8).
    pub r: u32,
    /// Degree of parallelism (default: 1).
    pub p: u32,
}

impl Default for ScryptParams {
    fn default() -> Self {
        Self {
            log_n: 20,
            r: 8,
            p: 1,
        }
    }
}

impl ScryptParams {
    /// Check the parameters without deriving anything.
    ///
    /// Rejects any combination whose memory use would exceed [`MAX_MEMORY`],
    /// so params read from an untrusted blob can never trigger a huge allocation.
    pub fn validate(&self) -> Result<(), VaultError> {
        if self.log_n > MAX_LOG_N {
            return Err(VaultError::InvalidKdfParams(format!(
                "log_n {} exceeds maximum {MAX_LOG_N}",
                self.log_n
            )));
        }
        if self.p > MAX_P {
            return Err(VaultError::InvalidKdfParams(format!(
                "p {} exceeds maximum {MAX_P}",
                self.p
            )));
        }
        // RFC 7914: r * p < 2^30.
        if u64::from(self.r) * u64::from(self.p) >= 1 << 30 {
            return Err(VaultError::InvalidKdfParams(format!(
                "r * p too large (r = {}, p = {})",
                self.r, self.p
            )));
        }
        let memory = self.memory_cost();
        if memory > u128::from(MAX_MEMORY) {
            return Err(VaultError::InvalidKdfParams(format!(
                "memory cost {memory} bytes exceeds maximum {MAX_MEMORY}"
            )));
        }
        self.to_scrypt().map(|_| ())
    }

    /// Bytes of working memory scrypt needs for these params.
    pub fn memory_cost(&self) -> u128 {
        let n = 1u128 << self.log_n;
        128 * u128::from(self.r) * (n + u128::from(self.p))
    }

    fn to_scrypt(self) -> Result<scrypt::Params, VaultError> {
        scrypt::Params::new(self.log_n, self.r, self.p, 32)
            .map_err(|e| VaultError::InvalidKdfParams(e.to_string()))
    }
}

/// Derive a 256-bit key from a password and salt using scrypt.
pub fn derive_key(
    password: &[u8],
    salt: &[u8],
    params: &ScryptParams,
) -> Result<Zeroizing<[u8; 32]>, VaultError> {
    params.validate()?;
    let scrypt_params = params.to_scrypt()?;

    let mut output = Zeroizing::new([0u8; 32]);
    scrypt::scrypt(password, salt, &scrypt_params, output.as_mut())
        .map_err(|e| VaultError::CipherError(format!("KDF failed: {e}")))?;

    Ok(output)
}

/// Generate a random salt and return it as base64.
pub fn generate_salt() -> String {
    use rand::RngCore;

    let mut salt = [0u8; SALT_LEN];
    rand::rng().fill_bytes(&mut salt);
    STANDARD.encode(salt)
}

/// Decode a base64-encoded salt.
pub fn decode_salt(b64: &str) -> Result<Vec<u8>, VaultError> {
    STANDARD
        .decode(b64)
        .map_err(|e| VaultError::InvalidCiphertext(format!("bad salt encoding: {e}")))
}
