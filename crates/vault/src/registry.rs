//! Cipher registry: resolves a [`CryptoType`] to its shared [`Cipher`].

use std::{collections::HashMap, fmt, sync::Arc};

use crate::{
    config::VaultConfig,
    crypto_type::CryptoType,
    error::VaultError,
    scrypt_chacha20poly1305::ScryptChacha20Poly1305Cipher,
    sha256_xor::Sha256XorCipher,
    traits::Cipher,
};

/// Immutable table of cipher suites, built once and injected where needed.
#[derive(Clone)]
pub struct CipherRegistry {
    ciphers: HashMap<CryptoType, Arc<dyn Cipher>>,
}

impl CipherRegistry {
    /// Registry with every built-in suite at its default parameters.
    pub fn new() -> Self {
        Self::builder()
            .register(CryptoType::Sha256Xor, Sha256XorCipher)
            .register(
                CryptoType::ScryptChacha20poly1305,
                ScryptChacha20Poly1305Cipher::default(),
            )
            .build()
    }

    /// Registry with every built-in suite, tuned by `config`.
    pub fn from_config(config: &VaultConfig) -> Result<Self, VaultError> {
        Ok(Self::builder()
            .register(CryptoType::Sha256Xor, Sha256XorCipher)
            .register(
                CryptoType::ScryptChacha20poly1305,
                ScryptChacha20Poly1305Cipher::with_params(config.scrypt)?,
            )
            .build())
    }

    pub fn builder() -> CipherRegistryBuilder {
        CipherRegistryBuilder::default()
    }

    /// Parse a cipher suite name. Only exact names are accepted.
    pub fn validate(&self, raw: &str) -> Result<CryptoType, VaultError> {
        raw.parse()
    }

    /// The cipher registered for `crypto_type`.
    ///
    /// A known suite with no registered cipher is reported, never defaulted.
    pub fn resolve(&self, crypto_type: CryptoType) -> Result<Arc<dyn Cipher>, VaultError> {
        self.ciphers
            .get(&crypto_type)
            .cloned()
            .ok_or(VaultError::UnknownCipher(crypto_type))
    }

    pub fn is_registered(&self, crypto_type: CryptoType) -> bool {
        self.ciphers.contains_key(&crypto_type)
    }

    /// Registered suites, in [`CryptoType::ALL`] order.
    pub fn registered(&self) -> Vec<CryptoType> {
        CryptoType::ALL
            .into_iter()
            .filter(|t| self.is_registered(*t))
            .collect()
    }

    /// Encrypt `data` with the suite named by `crypto_type`.
    pub fn encrypt(
        &self,
        crypto_type: CryptoType,
        data: &[u8],
        password: &[u8],
    ) -> Result<Vec<u8>, VaultError> {
        self.resolve(crypto_type)?.encrypt(data, password)
    }

    /// Decrypt `data` with the suite named by `crypto_type`.
    ///
    /// The cipher's error is returned as is, so a wrong password surfaces as
    /// [`VaultError::AuthenticationFailed`].
    pub fn decrypt(
        &self,
        crypto_type: CryptoType,
        data: &[u8],
        password: &[u8],
    ) -> Result<Vec<u8>, VaultError> {
        self.resolve(crypto_type)?.decrypt(data, password)
    }
}

impl Default for CipherRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CipherRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CipherRegistry")
            .field("registered", &self.registered())
            .finish()
    }
}

/// Builder for a [`CipherRegistry`]. Registering a suite twice keeps the last cipher.
#[derive(Default)]
pub struct CipherRegistryBuilder {
    ciphers: HashMap<CryptoType, Arc<dyn Cipher>>,
}

impl CipherRegistryBuilder {
    pub fn register(self, crypto_type: CryptoType, cipher: impl Cipher + 'static) -> Self {
        self.register_shared(crypto_type, Arc::new(cipher))
    }

    /// Register an already shared cipher instance.
    pub fn register_shared(mut self, crypto_type: CryptoType, cipher: Arc<dyn Cipher>) -> Self {
        self.ciphers.insert(crypto_type, cipher);
        self
    }

    pub fn build(self) -> CipherRegistry {
        #[cfg(feature = "tracing")]
        for crypto_type in CryptoType::ALL {
            if !self.ciphers.contains_key(&crypto_type) {
                tracing::warn!(%crypto_type, "no cipher registered for crypto type");
            }
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(count = self.ciphers.len(), "cipher registry built");

        CipherRegistry {
            ciphers: self.ciphers,
        }
    }
}
