//! In-memory named secret store.
//!
//! Holds secret strings (seed, last seed, ...) while a wallet is unlocked.
//! Values are wiped before they are released: on overwrite, on [`Secrets::erase`]
//! and when the store is dropped.

use std::{collections::HashMap, fmt};

use {
    serde::{
        Deserialize, Deserializer,
        de::{MapAccess, Visitor},
    },
    zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing},
};

use crate::error::VaultError;

/// Name under which wallets keep their seed.
pub const SECRET_SEED: &str = "seed";

/// Name under which wallets keep the seed of the most recently generated address.
pub const SECRET_LAST_SEED: &str = "lastSeed";

/// Named secret strings, serialized as a JSON object.
#[derive(Default)]
pub struct Secrets {
    entries: HashMap<String, String>,
}

impl Secrets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from the output of [`serialize`](Self::serialize).
    pub fn from_bytes(data: &[u8]) -> Result<Self, VaultError> {
        let mut secrets = Self::new();
        secrets.deserialize(data)?;
        Ok(secrets)
    }

    /// Look up a secret. Absence is not an error.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    /// Insert or overwrite a secret. A replaced value is wiped.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        if let Some(mut old) = self.entries.insert(name.into(), value.into()) {
            old.zeroize();
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Secret names, in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Encode every secret as a JSON object. The buffer is wiped on drop.
    ///
    /// The buffer is sized for the worst-case encoding up front, so no partial
    /// copy is left behind by a reallocation.
    pub fn serialize(&self) -> Result<Zeroizing<Vec<u8>>, VaultError> {
        let mut buf = Zeroizing::new(Vec::with_capacity(self.encoded_len_bound()));
        serde_json::to_writer(&mut *buf, &self.entries).map_err(VaultError::Serialization)?;
        Ok(buf)
    }

    /// Largest possible JSON encoding of the store: every byte escaped as
    /// `\u00XX`, plus quotes, `:` and `,` per entry and the enclosing braces.
    fn encoded_len_bound(&self) -> usize {
        2 + self
            .entries
            .iter()
            .map(|(name, value)| 6 * (name.len() + value.len()) + 6)
            .sum::<usize>()
    }

    /// Merge secrets from the output of [`serialize`](Self::serialize).
    ///
    /// Input is parsed in full before anything is applied, so on error the
    /// store is left unchanged. Names already present are overwritten.
    /// Entries parsed before an error are wiped.
    pub fn deserialize(&mut self, data: &[u8]) -> Result<(), VaultError> {
        let mut staged: Staged =
            serde_json::from_slice(data).map_err(VaultError::Deserialization)?;
        for (name, value) in staged.0.drain() {
            self.set(name, value);
        }
        Ok(())
    }

    /// Wipe every value, then remove every name.
    ///
    /// Safe to call repeatedly; the store can be repopulated afterwards.
    pub fn erase(&mut self) {
        if self.entries.is_empty() {
            return;
        }

        for value in self.entries.values_mut() {
            value.zeroize();
        }

        #[cfg(feature = "tracing")]
        let count = self.entries.len();

        for (mut name, _) in self.entries.drain() {
            name.zeroize();
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(count, "secrets erased");
    }
}

impl Zeroize for Secrets {
    fn zeroize(&mut self) {
        self.erase();
    }
}

impl Drop for Secrets {
    fn drop(&mut self) {
        self.erase();
    }
}

impl ZeroizeOnDrop for Secrets {}

/// Parse target for [`Secrets::deserialize`]; wipes whatever it holds when dropped.
#[derive(Default)]
struct Staged(HashMap<String, String>);

impl Staged {
    /// Duplicate names keep the last value; the earlier value and the
    /// duplicate name are wiped.
    fn insert(&mut self, mut name: String, value: String) {
        match self.0.get_mut(&name) {
            Some(existing) => {
                existing.zeroize();
                *existing = value;
                name.zeroize();
            },
            None => {
                self.0.insert(name, value);
            },
        }
    }
}

impl Drop for Staged {
    fn drop(&mut self) {
        for (mut name, mut value) in self.0.drain() {
            value.zeroize();
            name.zeroize();
        }
    }
}

impl<'de> Deserialize<'de> for Staged {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct StagedVisitor;

        impl<'de> Visitor<'de> for StagedVisitor {
            type Value = Staged;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of secret names to string values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Staged, A::Error> {
                let mut staged = Staged::default();
                while let Some(mut name) = access.next_key::<String>()? {
                    match access.next_value::<String>() {
                        Ok(value) => staged.insert(name, value),
                        Err(e) => {
                            name.zeroize();
                            return Err(e);
                        },
                    }
                }
                Ok(staged)
            }
        }

        deserializer.deserialize_map(StagedVisitor)
    }
}

impl fmt::Debug for Secrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.names().collect();
        names.sort_unstable();
        f.debug_struct("Secrets")
            .field("names", &names)
            .finish_non_exhaustive()
    }
}
