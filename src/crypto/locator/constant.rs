use crate::crypto::error::KeyError;
#[allow(deprecated)]
use crate::crypto::resolver::{Claims, SigningKeyResolver};
use crate::header::{JweHeader, JwsHeader};
use crate::platform::MaybeSendSync;

use super::LocatorAdapter;

/// Returns one fixed key per header kind.
///
/// Header contents (algorithm, key ID, anything else) are ignored. Use this
/// when a single key applies, such as single-tenant deployments or tests.
/// Unprotected headers get no key.
#[derive(Debug, Clone)]
pub struct ConstantKeyLocator<K> {
    jws_key: K,
    jwe_key: K,
}

impl<K> ConstantKeyLocator<K> {
    pub fn new(jws_key: K, jwe_key: K) -> Self {
        Self { jws_key, jwe_key }
    }
}

impl<K: Clone + MaybeSendSync> LocatorAdapter for ConstantKeyLocator<K> {
    type Key = K;

    fn locate_jws(&self, _header: &JwsHeader) -> Result<Self::Key, KeyError> {
        Ok(self.jws_key.clone())
    }

    fn locate_jwe(&self, _header: &JweHeader) -> Result<Self::Key, KeyError> {
        Ok(self.jwe_key.clone())
    }
}

#[allow(deprecated)]
impl<K: Clone + MaybeSendSync> SigningKeyResolver for ConstantKeyLocator<K> {
    type Key = K;

    fn resolve_signing_key_for_claims(
        &self,
        header: &JwsHeader,
        _claims: &Claims,
    ) -> Result<Self::Key, KeyError> {
        self.locate_jws(header)
    }

    fn resolve_signing_key_for_payload(
        &self,
        header: &JwsHeader,
        _payload: &[u8],
    ) -> Result<Self::Key, KeyError> {
        self.locate_jws(header)
    }
}
