use std::collections::HashMap;

use parking_lot::RwLock;
use snafu::prelude::*;

use crate::crypto::error::{KeyError, MissingKeyIdSnafu, UnknownKeyIdSnafu};
use crate::header::{HeaderKind, HeaderParams as _, JweHeader, JwsHeader};
use crate::platform::MaybeSendSync;

use super::LocatorAdapter;

/// Looks keys up by the header's `kid`, with separate tables for signing
/// and encryption keys.
///
/// Tables can be changed while the locator is shared, which is how key
/// rotation works: insert the new key, start issuing tokens with its key
/// ID, and remove the old key once tokens signed with it have expired.
/// Lookups take a read lock and never block each other.
#[derive(Debug)]
pub struct KeyIdLocator<K> {
    jws_keys: RwLock<HashMap<String, K>>,
    jwe_keys: RwLock<HashMap<String, K>>,
}

impl<K> Default for KeyIdLocator<K> {
    fn default() -> Self {
        Self {
            jws_keys: RwLock::default(),
            jwe_keys: RwLock::default(),
        }
    }
}

impl<K> KeyIdLocator<K> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_jws_key(self, kid: impl Into<String>, key: K) -> Self {
        self.insert_jws_key(kid, key);
        self
    }

    #[must_use]
    pub fn with_jwe_key(self, kid: impl Into<String>, key: K) -> Self {
        self.insert_jwe_key(kid, key);
        self
    }

    /// Adds or replaces a signing key, returning the one it replaced.
    pub fn insert_jws_key(&self, kid: impl Into<String>, key: K) -> Option<K> {
        self.jws_keys.write().insert(kid.into(), key)
    }

    /// Adds or replaces an encryption key, returning the one it replaced.
    pub fn insert_jwe_key(&self, kid: impl Into<String>, key: K) -> Option<K> {
        self.jwe_keys.write().insert(kid.into(), key)
    }

    pub fn remove_jws_key(&self, kid: &str) -> Option<K> {
        self.jws_keys.write().remove(kid)
    }

    pub fn remove_jwe_key(&self, kid: &str) -> Option<K> {
        self.jwe_keys.write().remove(kid)
    }
}

impl<K: Clone> KeyIdLocator<K> {
    fn lookup(
        table: &RwLock<HashMap<String, K>>,
        kind: HeaderKind,
        kid: Option<&str>,
    ) -> Result<K, KeyError> {
        let kid = kid.context(MissingKeyIdSnafu { kind })?;

        let key = table.read().get(kid).cloned();
        if key.is_none() {
            tracing::debug!(%kind, kid, "No key registered for key ID");
        }

        key.context(UnknownKeyIdSnafu { kind, kid })
    }
}

impl<K: Clone + MaybeSendSync> LocatorAdapter for KeyIdLocator<K> {
    type Key = K;

    fn locate_jws(&self, header: &JwsHeader) -> Result<Self::Key, KeyError> {
        Self::lookup(&self.jws_keys, HeaderKind::Jws, header.key_id())
    }

    fn locate_jwe(&self, header: &JweHeader) -> Result<Self::Key, KeyError> {
        Self::lookup(&self.jwe_keys, HeaderKind::Jwe, header.key_id())
    }
}
