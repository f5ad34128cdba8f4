//! Vault configuration, meant to be embedded in the host application's config.

use serde::{Deserialize, Serialize};

use crate::{crypto_type::CryptoType, kdf::ScryptParams};

/// Cipher selection and tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VaultConfig {
    /// Suite the host uses when encrypting a wallet that does not name one.
    /// Defaults to `scrypt-chacha20poly1305`.
    ///
    /// Read by the host only; the registry registers every suite regardless
    /// and callers pass this value to [`CipherRegistry::encrypt`](crate::CipherRegistry::encrypt).
    pub crypto_type: CryptoType,
    /// scrypt cost used by `scrypt-chacha20poly1305` when encrypting.
    pub scrypt: ScryptParams,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            crypto_type: CryptoType::ScryptChacha20poly1305,
            scrypt: ScryptParams::default(),
        }
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::CipherRegistry;

    #[test]
    fn empty_toml_gives_defaults() {
        let config: VaultConfig = toml::from_str("").unwrap();
        assert_eq!(config, VaultConfig::default());
    }

    #[test]
    fn toml_overrides() {
        let config: VaultConfig = toml::from_str(
            r#"
crypto_type = "sha256-xor"

[scrypt]
log_n = 15
"#,
        )
        .unwrap();
        assert_eq!(config.crypto_type, CryptoType::Sha256Xor);
        assert_eq!(config.scrypt.log_n, 15);
        assert_eq!(config.scrypt.r, ScryptParams::default().r);
    }

    #[test]
    fn configured_crypto_type_drives_encryption() {
        let config: VaultConfig = toml::from_str(
            r#"
crypto_type = "sha256-xor"
"#,
        )
        .unwrap();
        let registry = CipherRegistry::from_config(&config).unwrap();

        let encrypted = registry
            .encrypt(config.crypto_type, b"seed", b"pwd")
            .unwrap();
        assert_eq!(
            registry
                .decrypt(config.crypto_type, &encrypted, b"pwd")
                .unwrap(),
            b"seed"
        );
        // Not decryptable with the other suite: the configured one was used.
        assert!(
            registry
                .decrypt(CryptoType::ScryptChacha20poly1305, &encrypted, b"pwd")
                .is_err()
        );
    }

    #[test]
    fn unknown_crypto_type_rejected() {
        let result: Result<VaultConfig, _> = toml::from_str(r#"crypto_type = "aes-gcm""#);
        assert!(result.is_err());
    }
}
