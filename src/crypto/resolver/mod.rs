//! Legacy signature-verification key resolution.
//!
//! Older integrations resolve verification keys with a claims set or raw
//! payload at hand. New code should use
//! [`Locator`](crate::crypto::locator::Locator), which also covers
//! encrypted tokens.

use serde_json::{Map, Value};

use crate::crypto::error::KeyError;
use crate::header::JwsHeader;
use crate::platform::MaybeSendSync;

/// A decoded JWT claims set.
pub type Claims = Map<String, Value>;

/// Resolves the key that verifies a signed token.
///
/// Implementations provided by this crate ignore the claims and payload
/// arguments and forward to their signing-key policy, so both methods
/// return what [`Locator::locate`](crate::crypto::locator::Locator::locate)
/// returns for the same header. Custom implementations may use them, for
/// example to select a key by an issuer claim.
#[deprecated(
    since = "0.1.0",
    note = "implement `LocatorAdapter` and use `Locator::locate`"
)]
pub trait SigningKeyResolver: MaybeSendSync {
    type Key;

    /// Resolves the key for a token whose payload is a claims set.
    ///
    /// # Errors
    ///
    /// Returns a [`KeyError`] if no key can be determined.
    fn resolve_signing_key_for_claims(
        &self,
        header: &JwsHeader,
        claims: &Claims,
    ) -> Result<Self::Key, KeyError>;

    /// Resolves the key for a token with an arbitrary byte payload.
    ///
    /// # Errors
    ///
    /// Returns a [`KeyError`] if no key can be determined.
    fn resolve_signing_key_for_payload(
        &self,
        header: &JwsHeader,
        payload: &[u8],
    ) -> Result<Self::Key, KeyError>;
}
