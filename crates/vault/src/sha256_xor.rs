//! `sha256-xor` cipher suite.
//!
//! A lightweight legacy suite: the plaintext is length-prefixed, zero-padded to
//! 32-byte blocks and XORed with a per-block SHA-256 keystream derived from the
//! password and a random nonce. A SHA-256 checksum over the nonce and padded
//! plaintext detects a wrong password or tampering.
//!
//! Blob layout before base64: `[checksum: 32][nonce: 32][blocks: 32 * k]`.

use {
    base64::{Engine, engine::general_purpose::STANDARD},
    rand::RngCore,
    sha2::{Digest, Sha256},
    subtle::ConstantTimeEq,
    zeroize::Zeroizing,
};

use crate::{
    error::{IntegrityError, VaultError},
    traits::{Cipher, require_input},
};

const BLOCK_LEN: usize = 32;
const NONCE_LEN: usize = 32;
const CHECKSUM_LEN: usize = 32;
const LEN_PREFIX: usize = 4;

/// SHA-256 keystream XOR cipher with a plaintext checksum.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256XorCipher;

impl Cipher for Sha256XorCipher {
    fn encrypt(&self, data: &[u8], password: &[u8]) -> Result<Vec<u8>, VaultError> {
        require_input(data, password)?;
        let len = u32::try_from(data.len())
            .map_err(|_| VaultError::CipherError("data too large".to_string()))?;

        let padded_len = (LEN_PREFIX + data.len()).div_ceil(BLOCK_LEN) * BLOCK_LEN;
        let mut body = Zeroizing::new(Vec::with_capacity(padded_len));
        body.extend_from_slice(&len.to_le_bytes());
        body.extend_from_slice(data);
        body.resize(padded_len, 0);

        let mut nonce = [0u8; NONCE_LEN];
        rand::rng().fill_bytes(&mut nonce);

        let checksum = checksum(&nonce, &body);
        apply_keystream(&mut body, &nonce, password);

        let mut blob = Vec::with_capacity(CHECKSUM_LEN + NONCE_LEN + body.len());
        blob.extend_from_slice(&checksum);
        blob.extend_from_slice(&nonce);
        blob.extend_from_slice(&body);

        Ok(STANDARD.encode(blob).into_bytes())
    }

    fn decrypt(&self, data: &[u8], password: &[u8]) -> Result<Vec<u8>, VaultError> {
        require_input(data, password)?;
        let blob = STANDARD
            .decode(data)
            .map_err(|e| VaultError::InvalidCiphertext(e.to_string()))?;

        let header = CHECKSUM_LEN + NONCE_LEN;
        if blob.len() < header + BLOCK_LEN || !(blob.len() - header).is_multiple_of(BLOCK_LEN) {
            return Err(VaultError::InvalidCiphertext(
                "invalid ciphertext length".to_string(),
            ));
        }

        let (expected, rest) = blob.split_at(CHECKSUM_LEN);
        let (nonce, encrypted) = rest.split_at(NONCE_LEN);

        let mut body = Zeroizing::new(encrypted.to_vec());
        apply_keystream(&mut body, nonce, password);

        if !bool::from(checksum(nonce, &body).as_slice().ct_eq(expected)) {
            return Err(VaultError::authentication_failed(IntegrityError(
                "invalid checksum",
            )));
        }

        let mut prefix = [0u8; LEN_PREFIX];
        prefix.copy_from_slice(&body[..LEN_PREFIX]);
        let len = u32::from_le_bytes(prefix) as usize;
        let end = LEN_PREFIX + len;
        if end > body.len() || body.len() - end >= BLOCK_LEN {
            return Err(VaultError::InvalidCiphertext(
                "invalid data length".to_string(),
            ));
        }

        Ok(body[LEN_PREFIX..end].to_vec())
    }
}

fn checksum(nonce: &[u8], body: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(nonce);
    hasher.update(body);
    hasher.finalize().into()
}

/// XOR `body` in place, block by block, with `SHA256(SHA256(nonce || i) || SHA256(password))`.
fn apply_keystream(body: &mut [u8], nonce: &[u8], password: &[u8]) {
    let password_hash = Zeroizing::new(<[u8; 32]>::from(Sha256::digest(password)));

    for (i, block) in body.chunks_mut(BLOCK_LEN).enumerate() {
        let mut counter = Sha256::new();
        counter.update(nonce);
        counter.update((i as u64).to_le_bytes());

        let mut hasher = Sha256::new();
        hasher.update(counter.finalize());
        hasher.update(password_hash.as_slice());
        let key = Zeroizing::new(<[u8; 32]>::from(hasher.finalize()));

        for (b, k) in block.iter_mut().zip(key.iter()) {
            *b ^= k;
        }
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use std::error::Error;

    use super::*;

    #[test]
    fn round_trip() {
        let cipher = Sha256XorCipher;
        let encrypted = cipher.encrypt(b"hello wallet", b"pwd").unwrap();
        let decrypted = cipher.decrypt(&encrypted, b"pwd").unwrap();
        assert_eq!(decrypted, b"hello wallet");
    }

    #[test]
    fn block_boundary_lengths_round_trip() {
        let cipher = Sha256XorCipher;
        for len in [1, 27, 28, 29, 31, 32, 60, 61, 64, 1000] {
            let plaintext = vec![0x5A; len];
            let encrypted = cipher.encrypt(&plaintext, b"pwd").unwrap();
            let blob = STANDARD.decode(&encrypted).unwrap();
            assert!((blob.len() - CHECKSUM_LEN - NONCE_LEN).is_multiple_of(BLOCK_LEN));
            assert_eq!(cipher.decrypt(&encrypted, b"pwd").unwrap(), plaintext);
        }
    }

    #[test]
    fn output_is_base64_text() {
        let encrypted = Sha256XorCipher.encrypt(b"seed", b"pwd").unwrap();
        assert!(std::str::from_utf8(&encrypted).is_ok());
        assert!(STANDARD.decode(&encrypted).is_ok());
    }

    #[test]
    fn wrong_password_is_auth_failure() {
        let cipher = Sha256XorCipher;
        let encrypted = cipher.encrypt(b"secret", b"pwd1").unwrap();
        let err = cipher.decrypt(&encrypted, b"pwd2").unwrap_err();
        assert!(err.is_authentication_failure(), "{err:?}");
    }

    #[test]
    fn tampered_body_is_auth_failure() {
        let cipher = Sha256XorCipher;
        let encrypted = cipher.encrypt(b"secret", b"pwd").unwrap();
        let mut blob = STANDARD.decode(&encrypted).unwrap();
        let last = blob.len() - 1;
        blob[last] ^= 0x01;
        let tampered = STANDARD.encode(blob).into_bytes();

        let err = cipher.decrypt(&tampered, b"pwd").unwrap_err();
        assert!(err.is_authentication_failure(), "{err:?}");
    }

    #[test]
    fn tampered_checksum_is_auth_failure() {
        let cipher = Sha256XorCipher;
        let encrypted = cipher.encrypt(b"secret", b"pwd").unwrap();
        let mut blob = STANDARD.decode(&encrypted).unwrap();
        blob[CHECKSUM_LEN - 1] ^= 0x80;
        let tampered = STANDARD.encode(blob).into_bytes();

        let err = cipher.decrypt(&tampered, b"pwd").unwrap_err();
        assert!(err.is_authentication_failure(), "{err:?}");
        assert_eq!(err.source().unwrap().to_string(), "invalid checksum");
    }

    #[test]
    fn truncated_blob_is_structural_error() {
        let cipher = Sha256XorCipher;
        let short = STANDARD.encode([0u8; 80]).into_bytes();
        assert!(matches!(
            cipher.decrypt(&short, b"pwd"),
            Err(VaultError::InvalidCiphertext(_))
        ));
    }

    #[test]
    fn non_base64_is_structural_error() {
        assert!(matches!(
            Sha256XorCipher.decrypt(b"not base64!!", b"pwd"),
            Err(VaultError::InvalidCiphertext(_))
        ));
    }

    #[test]
    fn empty_inputs_rejected() {
        let cipher = Sha256XorCipher;
        assert!(matches!(
            cipher.encrypt(b"", b"pwd"),
            Err(VaultError::MissingData)
        ));
        assert!(matches!(
            cipher.encrypt(b"data", b""),
            Err(VaultError::MissingPassword)
        ));
        assert!(matches!(
            cipher.decrypt(b"", b"pwd"),
            Err(VaultError::MissingData)
        ));
    }

    #[test]
    fn different_nonces_produce_different_ciphertexts() {
        let cipher = Sha256XorCipher;
        let enc1 = cipher.encrypt(b"same input", b"pwd").unwrap();
        let enc2 = cipher.encrypt(b"same input", b"pwd").unwrap();
        assert_ne!(enc1, enc2);
    }
}
