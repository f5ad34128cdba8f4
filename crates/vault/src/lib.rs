//! Wallet secret encryption.
//!
//! A [`CipherRegistry`] maps a [`CryptoType`] name such as `"sha256-xor"` or
//! `"scrypt-chacha20poly1305"` to a shared password-based [`Cipher`]. Wallet
//! secrets live in a [`Secrets`] store, which serializes to bytes for
//! encryption and wipes its contents on erase and on drop.
//! Trait-based [`Cipher`] design allows adding suites without touching callers.
//!
//! A wrong password during decryption is always reported as
//! [`VaultError::AuthenticationFailed`]; use [`is_authentication_failure`] to
//! detect it through any error wrapping.

pub mod config;
pub mod crypto_type;
pub mod error;
pub mod kdf;
pub mod registry;
pub mod scrypt_chacha20poly1305;
pub mod secrets;
pub mod sha256_xor;
pub mod traits;

pub use {
    config::VaultConfig,
    crypto_type::CryptoType,
    error::{VaultError, is_authentication_failure},
    kdf::ScryptParams,
    registry::{CipherRegistry, CipherRegistryBuilder},
    scrypt_chacha20poly1305::ScryptChacha20Poly1305Cipher,
    secrets::{SECRET_LAST_SEED, SECRET_SEED, Secrets},
    sha256_xor::Sha256XorCipher,
    traits::Cipher,
};
