//! Header-typed key location.
//!
//! [`Locator`] is the single entry point the token pipeline calls. Most
//! implementations should not implement it directly: implement
//! [`LocatorAdapter`] instead, which receives the header already narrowed to
//! its concrete kind. The blanket [`Locator`] impl for adapters routes every
//! header to exactly one hook, so a signing policy can never be applied to
//! an encryption header by accident.
//!
//! Hooks without a policy fail with [`KeyError::NoPolicy`]. Errors from a
//! hook are returned unchanged; nothing here retries or falls back.

mod constant;
mod key_id;
#[cfg(feature = "crypto-native")]
mod validating;

use std::sync::Arc;

use crate::crypto::error::KeyError;
use crate::header::{Header, HeaderKind, HeaderParams as _, JweHeader, JwsHeader, UnprotectedHeader};
use crate::platform::MaybeSendSync;

pub use constant::ConstantKeyLocator;
pub use key_id::KeyIdLocator;
#[cfg(feature = "crypto-native")]
pub use validating::ValidatingLocator;

/// Resolves the key for a token header.
///
/// Implementations must be callable concurrently from many threads with no
/// ordering between calls. Implementations that perform I/O own any
/// blocking, caching and timeouts, and should document whether `locate`
/// may block.
#[diagnostic::on_unimplemented(
    message = "`{Self}` does not implement `Locator`",
    label = "This type cannot locate keys for token headers",
    note = "Implement `LocatorAdapter` to get `Locator` with per-kind dispatch"
)]
pub trait Locator: MaybeSendSync {
    /// The key material returned.
    type Key;

    /// Returns the key to use for `header`.
    ///
    /// # Errors
    ///
    /// Returns a [`KeyError`] if no key can be determined for the header.
    fn locate(&self, header: &Header) -> Result<Self::Key, KeyError>;
}

/// Per-kind key resolution hooks.
///
/// Every hook defaults to failing with [`KeyError::NoPolicy`], so an
/// adapter only overrides the kinds it has a policy for.
pub trait LocatorAdapter: MaybeSendSync {
    /// The key material returned by every hook.
    type Key;

    /// Key for a signed token: the verification key when consuming, the
    /// signing key when producing.
    ///
    /// # Errors
    ///
    /// Returns a [`KeyError`] if no key applies.
    fn locate_jws(&self, header: &JwsHeader) -> Result<Self::Key, KeyError> {
        let _ = header;
        Err(no_policy(HeaderKind::Jws))
    }

    /// Key for an encrypted token: the decryption key when consuming, the
    /// encryption key when producing.
    ///
    /// # Errors
    ///
    /// Returns a [`KeyError`] if no key applies.
    fn locate_jwe(&self, header: &JweHeader) -> Result<Self::Key, KeyError> {
        let _ = header;
        Err(no_policy(HeaderKind::Jwe))
    }

    /// Key for an unsecured token. There is normally none.
    ///
    /// # Errors
    ///
    /// Returns a [`KeyError`] if no key applies.
    fn locate_unprotected(&self, header: &UnprotectedHeader) -> Result<Self::Key, KeyError> {
        let _ = header;
        Err(no_policy(HeaderKind::Unprotected))
    }
}

fn no_policy(kind: HeaderKind) -> KeyError {
    tracing::debug!(%kind, "No key resolution policy for header kind");
    KeyError::NoPolicy { kind }
}

impl<A: LocatorAdapter> Locator for A {
    type Key = A::Key;

    fn locate(&self, header: &Header) -> Result<Self::Key, KeyError> {
        tracing::trace!(
            kind = %header.kind(),
            alg = header.algorithm(),
            kid = ?header.key_id(),
            "Locating key"
        );

        match header {
            Header::Jws(header) => self.locate_jws(header),
            Header::Jwe(header) => self.locate_jwe(header),
            Header::Unprotected(header) => self.locate_unprotected(header),
        }
    }
}

impl<L: Locator + ?Sized> Locator for Arc<L> {
    type Key = L::Key;

    fn locate(&self, header: &Header) -> Result<Self::Key, KeyError> {
        (**self).locate(header)
    }
}

/// A [`Locator`] backed by a closure.
///
/// Returned by [`from_fn`].
#[derive(Clone)]
pub struct FnLocator<F> {
    f: F,
}

impl<F> std::fmt::Debug for FnLocator<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnLocator").finish_non_exhaustive()
    }
}

/// Wraps a closure as a [`Locator`].
///
/// The closure sees the full [`Header`] and does its own dispatch, which
/// suits policies that only look at shared parameters such as `kid`.
pub fn from_fn<F, K>(f: F) -> FnLocator<F>
where
    F: Fn(&Header) -> Result<K, KeyError> + MaybeSendSync,
{
    FnLocator { f }
}

impl<F, K> Locator for FnLocator<F>
where
    F: Fn(&Header) -> Result<K, KeyError> + MaybeSendSync,
{
    type Key = K;

    fn locate(&self, header: &Header) -> Result<Self::Key, KeyError> {
        (self.f)(header)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::header::HeaderParams;

    #[derive(Debug, Default)]
    struct CountingAdapter {
        jws_calls: AtomicUsize,
        jwe_calls: AtomicUsize,
    }

    impl LocatorAdapter for CountingAdapter {
        type Key = &'static str;

        fn locate_jws(&self, _header: &JwsHeader) -> Result<Self::Key, KeyError> {
            self.jws_calls.fetch_add(1, Ordering::SeqCst);
            Ok("jws")
        }

        fn locate_jwe(&self, _header: &JweHeader) -> Result<Self::Key, KeyError> {
            self.jwe_calls.fetch_add(1, Ordering::SeqCst);
            Ok("jwe")
        }
    }

    impl CountingAdapter {
        fn calls(&self) -> (usize, usize) {
            (
                self.jws_calls.load(Ordering::SeqCst),
                self.jwe_calls.load(Ordering::SeqCst),
            )
        }
    }

    #[derive(Debug)]
    struct SigningOnly;

    impl LocatorAdapter for SigningOnly {
        type Key = u8;

        fn locate_jws(&self, _header: &JwsHeader) -> Result<Self::Key, KeyError> {
            Ok(1)
        }
    }

    #[derive(Debug)]
    struct Failing;

    impl LocatorAdapter for Failing {
        type Key = u8;

        fn locate_jws(&self, header: &JwsHeader) -> Result<Self::Key, KeyError> {
            Err(KeyError::new(format!("revoked: {}", header.algorithm())))
        }
    }

    fn jws_headers() -> Vec<Header> {
        vec![
            JwsHeader::builder().algorithm("HS256").build().into(),
            JwsHeader::builder()
                .algorithm("ES256")
                .key_id("sig-2")
                .critical(vec!["b64".to_owned()])
                .base64_payload(false)
                .build()
                .into(),
        ]
    }

    fn jwe_headers() -> Vec<Header> {
        vec![
            JweHeader::builder()
                .algorithm("dir")
                .encryption_algorithm("A128GCM")
                .build()
                .into(),
            JweHeader::builder()
                .algorithm("RSA-OAEP-256")
                .encryption_algorithm("A256GCM")
                .key_id("enc-7")
                .build()
                .into(),
        ]
    }

    #[test]
    fn test_jws_headers_route_to_jws_hook_only() {
        let adapter = CountingAdapter::default();

        for header in jws_headers() {
            assert_eq!(adapter.locate(&header).unwrap(), "jws");
        }

        assert_eq!(adapter.calls(), (2, 0));
    }

    #[test]
    fn test_jwe_headers_route_to_jwe_hook_only() {
        let adapter = CountingAdapter::default();

        for header in jwe_headers() {
            assert_eq!(adapter.locate(&header).unwrap(), "jwe");
        }

        assert_eq!(adapter.calls(), (0, 2));
    }

    #[test]
    fn test_unprotected_header_fails_without_calling_hooks() {
        let adapter = CountingAdapter::default();
        let header = UnprotectedHeader::builder().build().into();

        let result = adapter.locate(&header);

        assert!(matches!(
            result,
            Err(KeyError::NoPolicy {
                kind: HeaderKind::Unprotected
            })
        ));
        assert_eq!(adapter.calls(), (0, 0));
    }

    #[test]
    fn test_missing_policy_is_an_error() {
        let result = SigningOnly.locate(&jwe_headers()[0]);

        assert!(matches!(
            result,
            Err(KeyError::NoPolicy {
                kind: HeaderKind::Jwe
            })
        ));
    }

    #[test]
    fn test_hook_errors_propagate_unchanged() {
        let result = Failing.locate(&jws_headers()[1]);

        assert!(matches!(
            result,
            Err(KeyError::Custom { message, source: None }) if message == "revoked: ES256"
        ));
    }

    #[test]
    fn test_arc_forwards() {
        let shared: Arc<dyn Locator<Key = u8>> = Arc::new(SigningOnly);

        assert_eq!(shared.locate(&jws_headers()[0]).unwrap(), 1);
    }

    #[test]
    fn test_from_fn() {
        let locator = from_fn(|header: &Header| match header.key_id() {
            Some(kid) => Ok(kid.len()),
            None => Err(KeyError::MissingKeyId {
                kind: header.kind(),
            }),
        });

        assert_eq!(locator.locate(&jws_headers()[1]).unwrap(), 5);
        assert!(matches!(
            locator.locate(&jwe_headers()[0]),
            Err(KeyError::MissingKeyId {
                kind: HeaderKind::Jwe
            })
        ));
    }
}
