//! OS credential store backend.
//!
//! Stores the token in the platform keychain instead of a database file.

use keyring::Entry;

use super::StoreError;
use crate::callback::TokenStore;

const SERVICE: &str = "basicboard2-naver-login";

pub struct KeyringStore;

impl KeyringStore {
    pub fn new() -> Self {
        Self
    }
}

impl Default for KeyringStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenStore for KeyringStore {
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let entry = Entry::new(SERVICE, key)?;
        entry.set_password(value)?;
        Ok(())
    }
}
