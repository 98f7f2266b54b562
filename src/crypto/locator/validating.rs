use crate::crypto::error::KeyError;
use crate::crypto::key::Key;
use crate::header::{Header, HeaderParams as _};

use super::Locator;

/// Checks every located key against the header's `alg` before handing it
/// out.
///
/// A key of the wrong family or strength is reported as a [`KeyError`]
/// here, instead of surfacing later as an opaque signature or decryption
/// failure.
#[derive(Debug, Clone)]
pub struct ValidatingLocator<L> {
    inner: L,
}

impl<L: Locator<Key = Key>> ValidatingLocator<L> {
    pub fn new(inner: L) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> L {
        self.inner
    }
}

impl<L: Locator<Key = Key>> Locator for ValidatingLocator<L> {
    type Key = Key;

    fn locate(&self, header: &Header) -> Result<Self::Key, KeyError> {
        let key = self.inner.locate(header)?;

        if let Err(err) = key.ensure_supports(header.algorithm()) {
            tracing::debug!(
                kind = %header.kind(),
                alg = header.algorithm(),
                key_type = key.type_name(),
                "Located key rejected"
            );
            return Err(err);
        }

        Ok(key)
    }
}
