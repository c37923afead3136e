//! Account password storage in the system keychain.
//!
//! - macOS: Keychain Services
//! - Windows: Credential Manager
//! - Linux: Secret Service (GNOME Keyring, KDE Wallet)
//!
//! Entries live under the [`SERVICE`] service with the account username as
//! the keychain account, so each Xfinity login has its own entry.

use keyring::Entry;
use tracing::debug;
use xfinity_usage_core::Secret;

use crate::error::StoreError;

/// Keychain service name for stored passwords.
pub const SERVICE: &str = "xfinity-usage";

/// Storage for account passwords, keyed by username.
pub trait PasswordStore: Send + Sync {
    /// Returns the stored password for `username`, if any.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Keychain` if the backend cannot be queried.
    fn get(&self, username: &str) -> Result<Option<Secret>, StoreError>;

    /// Stores `password` for `username`, replacing any existing entry.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Keychain` if the backend rejects the write.
    fn set(&self, username: &str, password: &Secret) -> Result<(), StoreError>;

    /// Removes the entry for `username`. A missing entry is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Keychain` if the backend rejects the delete.
    fn delete(&self, username: &str) -> Result<(), StoreError>;

    /// Returns true if a non-empty password is stored for `username`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Keychain` if the backend cannot be queried.
    fn exists(&self, username: &str) -> Result<bool, StoreError> {
        Ok(self.get(username)?.is_some())
    }
}

// ============================================================================
// System Keychain
// ============================================================================

/// [`PasswordStore`] backed by the platform keychain.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemKeychain;

impl SystemKeychain {
    fn entry(username: &str) -> Result<Entry, StoreError> {
        Ok(Entry::new(SERVICE, username)?)
    }
}

impl PasswordStore for SystemKeychain {
    fn get(&self, username: &str) -> Result<Option<Secret>, StoreError> {
        match Self::entry(username)?.get_password() {
            Ok(password) if password.is_empty() => Ok(None),
            Ok(password) => {
                debug!(user = username, "Password read from keychain");
                Ok(Some(Secret::new(password)))
            }
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, username: &str, password: &Secret) -> Result<(), StoreError> {
        Self::entry(username)?.set_password(password.expose())?;
        debug!(user = username, "Password stored in keychain");
        Ok(())
    }

    fn delete(&self, username: &str) -> Result<(), StoreError> {
        match Self::entry(username)?.delete_credential() {
            Ok(()) => {
                debug!(user = username, "Password deleted from keychain");
                Ok(())
            }
            Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
