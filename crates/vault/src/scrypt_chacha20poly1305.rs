//! `scrypt-chacha20poly1305` cipher suite.
//!
//! The key is derived from the password with scrypt under a fresh random salt;
//! the data is sealed with ChaCha20-Poly1305. The scrypt parameters and salt
//! travel in a JSON header that is also bound as associated data, so tampering
//! with either the header or the body fails authentication.
//!
//! Blob layout before base64:
//! `[header_len: u32 LE][header JSON][nonce: 12 bytes][ciphertext + Poly1305 tag]`.

#[allow(deprecated)] // upstream generic-array 0.x deprecation
use chacha20poly1305::{
    ChaCha20Poly1305, Nonce,
    aead::{Aead, KeyInit, Payload},
};
use {
    base64::{Engine, engine::general_purpose::STANDARD},
    rand::RngCore,
};

use crate::{
    error::VaultError,
    kdf::{self, ScryptParams},
    traits::{Cipher, require_input},
};

/// Nonce size for ChaCha20-Poly1305 (12 bytes).
const NONCE_LEN: usize = 12;

/// Poly1305 tag size.
const TAG_LEN: usize = 16;

const HEADER_LEN_PREFIX: usize = 4;

/// Parameters needed to re-derive the key at decryption time.
#[derive(Debug, serde::Serialize, serde::Deserialize)]
struct Header {
    log_n: u8,
    r: u32,
    p: u32,
    salt: String,
}

impl Header {
    fn params(&self) -> ScryptParams {
        ScryptParams {
            log_n: self.log_n,
            r: self.r,
            p: self.p,
        }
    }
}

/// scrypt + ChaCha20-Poly1305 AEAD cipher.
///
/// The configured [`ScryptParams`] only affect encryption; decryption always
/// uses the parameters recorded in the blob.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScryptChacha20Poly1305Cipher {
    params: ScryptParams,
}

impl ScryptChacha20Poly1305Cipher {
    /// Create a cipher that encrypts with the given scrypt parameters.
    pub fn with_params(params: ScryptParams) -> Result<Self, VaultError> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> ScryptParams {
        self.params
    }
}

impl Cipher for ScryptChacha20Poly1305Cipher {
    #[allow(deprecated)]
    fn encrypt(&self, data: &[u8], password: &[u8]) -> Result<Vec<u8>, VaultError> {
        require_input(data, password)?;

        let salt_b64 = kdf::generate_salt();
        let salt = kdf::decode_salt(&salt_b64)?;
        let key = kdf::derive_key(password, &salt, &self.params)?;

        let header = serde_json::to_vec(&Header {
            log_n: self.params.log_n,
            r: self.params.r,
            p: self.params.p,
            salt: salt_b64,
        })
        .map_err(|e| VaultError::CipherError(format!("header encoding failed: {e}")))?;
        let header_len = u32::try_from(header.len())
            .map_err(|_| VaultError::CipherError("header too large".to_string()))?;

        let mut nonce_bytes = [0u8; NONCE_LEN];
        rand::rng().fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let cipher = ChaCha20Poly1305::new((&*key).into());
        let ciphertext = cipher
            .encrypt(nonce, Payload {
                msg: data,
                aad: &header,
            })
            .map_err(|e| VaultError::CipherError(e.to_string()))?;

        let mut blob = Vec::with_capacity(
            HEADER_LEN_PREFIX + header.len() + NONCE_LEN + ciphertext.len(),
        );
        blob.extend_from_slice(&header_len.to_le_bytes());
        blob.extend_from_slice(&header);
        blob.extend_from_slice(&nonce_bytes);
        blob.extend_from_slice(&ciphertext);

        Ok(STANDARD.encode(blob).into_bytes())
    }

    #[allow(deprecated)]
    fn decrypt(&self, data: &[u8], password: &[u8]) -> Result<Vec<u8>, VaultError> {
        require_input(data, password)?;
        let blob = STANDARD
            .decode(data)
            .map_err(|e| VaultError::InvalidCiphertext(e.to_string()))?;

        if blob.len() < HEADER_LEN_PREFIX {
            return Err(VaultError::InvalidCiphertext(
                "ciphertext too short".to_string(),
            ));
        }
        let (len_bytes, rest) = blob.split_at(HEADER_LEN_PREFIX);
        let mut prefix = [0u8; HEADER_LEN_PREFIX];
        prefix.copy_from_slice(len_bytes);
        let header_len = u32::from_le_bytes(prefix) as usize;

        if rest.len() < header_len + NONCE_LEN + TAG_LEN {
            return Err(VaultError::InvalidCiphertext(
                "ciphertext too short".to_string(),
            ));
        }
        let (header_bytes, rest) = rest.split_at(header_len);
        let (nonce_bytes, ct) = rest.split_at(NONCE_LEN);

        let header: Header = serde_json::from_slice(header_bytes)
            .map_err(|e| VaultError::InvalidCiphertext(format!("bad header: {e}")))?;
        let params = header.params();
        params
            .validate()
            .map_err(|e| VaultError::InvalidCiphertext(format!("bad header: {e}")))?;
        let salt = kdf::decode_salt(&header.salt)?;
        let key = kdf::derive_key(password, &salt, &params)?;

        let cipher = ChaCha20Poly1305::new((&*key).into());
        cipher
            .decrypt(Nonce::from_slice(nonce_bytes), Payload {
                msg: ct,
                aad: header_bytes,
            })
            .map_err(VaultError::authentication_failed)
    }
}
