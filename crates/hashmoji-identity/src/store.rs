//! Local credential storage.
//!
//! The protocol never touches storage directly; it goes through a
//! [`CredentialStore`] so the OS keyring can be swapped for an in-memory
//! store in tests.

use parking_lot::RwLock;
use std::collections::HashMap;

use crate::error::IdentityResult;

/// Entry name holding the public key.
pub const PUBLIC_KEY_ENTRY: &str = "public_key";

/// Entry name holding the private key.
pub const PRIVATE_KEY_ENTRY: &str = "private_key";

/// Default keyring service name.
pub const DEFAULT_SERVICE: &str = "hashmoji";

/// A named string store for key material.
pub trait CredentialStore: Send + Sync {
    /// Stores `value` under `key`, replacing any existing value.
    fn save(&self, key: &str, value: &str) -> IdentityResult<()>;

    /// Reads the value under `key`, if any.
    fn read(&self, key: &str) -> IdentityResult<Option<String>>;

    /// Deletes the value under `key`. Deleting a missing entry succeeds.
    fn delete(&self, key: &str) -> IdentityResult<()>;
}

/// Credential store backed by the operating system keyring.
#[derive(Debug, Clone)]
pub struct KeyringCredentialStore {
    service: String,
}

impl Default for KeyringCredentialStore {
    fn default() -> Self {
        Self::new(DEFAULT_SERVICE)
    }
}

impl KeyringCredentialStore {
    /// Creates a store using the given keyring service name.
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    fn entry(&self, key: &str) -> IdentityResult<keyring::Entry> {
        Ok(keyring::Entry::new(&self.service, key)?)
    }
}

impl CredentialStore for KeyringCredentialStore {
    fn save(&self, key: &str, value: &str) -> IdentityResult<()> {
        self.entry(key)?.set_password(value)?;
        tracing::debug!(service = %self.service, key, "Saved credential");
        Ok(())
    }

    fn read(&self, key: &str) -> IdentityResult<Option<String>> {
        match self.entry(key)?.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn delete(&self, key: &str) -> IdentityResult<()> {
        match self.entry(key)?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => {
                tracing::debug!(service = %self.service, key, "Deleted credential");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory credential store for testing.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryCredentialStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns whether the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn save(&self, key: &str, value: &str) -> IdentityResult<()> {
        self.entries.write().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn read(&self, key: &str) -> IdentityResult<Option<String>> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn delete(&self, key: &str) -> IdentityResult<()> {
        self.entries.write().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_roundtrip() {
        let store = MemoryCredentialStore::new();
        assert!(store.is_empty());

        store.save(PUBLIC_KEY_ENTRY, "pub").unwrap();
        store.save(PRIVATE_KEY_ENTRY, "priv").unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.read(PUBLIC_KEY_ENTRY).unwrap().as_deref(), Some("pub"));

        store.save(PUBLIC_KEY_ENTRY, "pub2").unwrap();
        assert_eq!(store.read(PUBLIC_KEY_ENTRY).unwrap().as_deref(), Some("pub2"));

        store.delete(PUBLIC_KEY_ENTRY).unwrap();
        assert_eq!(store.read(PUBLIC_KEY_ENTRY).unwrap(), None);
    }

    #[test]
    fn memory_store_delete_missing_is_ok() {
        let store = MemoryCredentialStore::new();
        assert!(store.delete("nothing").is_ok());
    }

    #[test]
    fn keyring_store_uses_service_name() {
        let store = KeyringCredentialStore::default();
        assert_eq!(store.service, DEFAULT_SERVICE);
    }
}
