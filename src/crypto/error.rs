//! Failure vocabulary of the signing and encryption pipeline.
//!
//! [`KeyError`] means the key material itself is the problem: missing,
//! wrong type, too weak, or malformed. [`SignatureError`] means a signature
//! or MAC could not be computed or did not verify, usually after a key was
//! found. Callers report the two differently: the first is a configuration
//! problem, the second points at a tampered or corrupted token.

use snafu::prelude::*;

use crate::error::BoxedError;
use crate::header::HeaderKind;

type Cause = Box<dyn std::error::Error + Send + Sync>;

/// A problem with key material.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum KeyError {
    /// No key is registered under the header's key ID.
    #[snafu(display("No {kind} key available for key ID `{kid}`"))]
    UnknownKeyId { kind: HeaderKind, kid: String },
    /// Key selection needs a key ID and the header has none.
    #[snafu(display("{kind} header has no key ID"))]
    MissingKeyId { kind: HeaderKind },
    /// The locator has no resolution policy for this kind of header.
    #[snafu(display("No key resolution policy for {kind} headers"))]
    NoPolicy { kind: HeaderKind },
    /// The key cannot be used with the requested algorithm.
    #[snafu(display("A {actual} key cannot be used with {algorithm}"))]
    WrongKeyType {
        algorithm: String,
        actual: &'static str,
    },
    /// The key is too short for the requested algorithm.
    #[snafu(display(
        "{algorithm} requires a key of at least {required_bits} bits, got {actual_bits}"
    ))]
    WeakKey {
        algorithm: String,
        required_bits: usize,
        actual_bits: usize,
    },
    /// The algorithm needs a key of one exact length.
    #[snafu(display("{algorithm} requires a {expected_bits} bit key, got {actual_bits}"))]
    KeyLength {
        algorithm: String,
        expected_bits: usize,
        actual_bits: usize,
    },
    /// Nothing is known about the key requirements of this algorithm.
    #[snafu(display("Unsupported algorithm `{algorithm}`"))]
    UnsupportedAlgorithm { algorithm: String },
    /// The key representation could not be decoded.
    #[snafu(display("Malformed key: {reason}"))]
    Malformed { reason: String },
    /// A key store failed while looking up the key.
    #[snafu(display("Key lookup failed"))]
    Lookup { source: BoxedError },
    #[snafu(whatever, display("{message}"))]
    Custom {
        message: String,
        #[snafu(source(from(Cause, Some)))]
        source: Option<Cause>,
    },
}

impl KeyError {
    /// A key error carrying only a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self::Custom {
            message: message.into(),
            source: None,
        }
    }

    /// A key error carrying a message and the underlying cause.
    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Custom {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Wraps a key store failure, keeping its retryability.
    pub fn lookup<E: crate::Error + 'static>(err: E) -> Self {
        Self::Lookup {
            source: BoxedError::from_err(err),
        }
    }
}

impl crate::Error for KeyError {
    fn is_retryable(&self) -> bool {
        match self {
            KeyError::Lookup { source } => source.is_retryable(),
            KeyError::UnknownKeyId { .. }
            | KeyError::MissingKeyId { .. }
            | KeyError::NoPolicy { .. }
            | KeyError::WrongKeyType { .. }
            | KeyError::WeakKey { .. }
            | KeyError::KeyLength { .. }
            | KeyError::UnsupportedAlgorithm { .. }
            | KeyError::Malformed { .. }
            | KeyError::Custom { .. } => false,
        }
    }
}

/// A problem computing or verifying a signature or MAC.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum SignatureError {
    /// The signature or MAC does not match the signed input.
    #[snafu(display("{algorithm} signature verification failed"))]
    VerificationFailed { algorithm: String },
    /// No implementation exists for the requested signature algorithm.
    #[snafu(
        display("Unsupported signature algorithm `{algorithm}`"),
        context(name(UnsupportedSignatureAlgorithmSnafu))
    )]
    UnsupportedAlgorithm { algorithm: String },
    /// The cryptographic provider failed.
    #[snafu(display("Signature provider failed"))]
    Provider { source: BoxedError },
    #[snafu(whatever, display("{message}"))]
    Custom {
        message: String,
        #[snafu(source(from(Cause, Some)))]
        source: Option<Cause>,
    },
}

impl SignatureError {
    /// A signature error carrying only a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self::Custom {
            message: message.into(),
            source: None,
        }
    }

    /// A signature error carrying a message and the underlying cause.
    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Custom {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Wraps a cryptographic provider failure, keeping its retryability.
    pub fn provider<E: crate::Error + 'static>(err: E) -> Self {
        Self::Provider {
            source: BoxedError::from_err(err),
        }
    }
}

impl crate::Error for SignatureError {
    fn is_retryable(&self) -> bool {
        match self {
            SignatureError::Provider { source } => source.is_retryable(),
            SignatureError::VerificationFailed { .. }
            | SignatureError::UnsupportedAlgorithm { .. }
            | SignatureError::Custom { .. } => false,
        }
    }
}

/// The error a token consumer reports upwards.
#[derive(Debug, Snafu)]
pub enum SecurityError {
    #[snafu(display("Cannot process token: key unavailable"), context(false))]
    Key { source: KeyError },
    #[snafu(
        display("Token invalid: signature verification failed"),
        context(false)
    )]
    Signature { source: SignatureError },
}

impl crate::Error for SecurityError {
    fn is_retryable(&self) -> bool {
        match self {
            SecurityError::Key { source } => source.is_retryable(),
            SecurityError::Signature { source } => source.is_retryable(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use snafu::{Snafu, ensure, whatever};

    use super::*;
    use crate::Error as _;

    #[derive(Debug, Snafu)]
    #[snafu(display("connection reset"))]
    struct Transient;

    impl crate::Error for Transient {
        fn is_retryable(&self) -> bool {
            true
        }
    }

    fn require_secret(kid: &str) -> Result<(), KeyError> {
        let decoded: Result<Vec<u8>, std::num::ParseIntError> =
            kid.split(':').map(str::parse).collect();
        whatever!(decoded, "Key `{kid}` is not a byte list");
        Ok(())
    }

    fn check_algorithm(algorithm: &str) -> Result<(), SignatureError> {
        ensure!(
            algorithm.starts_with("HS"),
            UnsupportedSignatureAlgorithmSnafu { algorithm }
        );
        Ok(())
    }

    #[test]
    fn test_unsupported_signature_algorithm_selector() {
        check_algorithm("HS256").unwrap();
        let err = check_algorithm("EdDSA").unwrap_err();

        assert!(matches!(
            &err,
            SignatureError::UnsupportedAlgorithm { algorithm } if algorithm == "EdDSA"
        ));
        assert_eq!(err.to_string(), "Unsupported signature algorithm `EdDSA`");
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_message_only() {
        let err = KeyError::new("no key for tenant");

        assert_eq!(err.to_string(), "no key for tenant");
        assert!(err.source().is_none());
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_message_with_cause() {
        let cause = "x".parse::<u8>().unwrap_err();
        let err = SignatureError::with_source("bad MAC encoding", cause);

        assert_eq!(err.to_string(), "bad MAC encoding");
        assert!(err.source().is_some());
    }

    #[test]
    fn test_whatever_macro_keeps_cause() {
        let err = require_secret("1:two").unwrap_err();

        assert!(matches!(
            &err,
            KeyError::Custom { message, source: Some(_) } if message == "Key `1:two` is not a byte list"
        ));
    }

    #[test]
    fn test_lookup_retryability_follows_cause() {
        assert!(KeyError::lookup(Transient).is_retryable());
        assert!(SignatureError::provider(Transient).is_retryable());
        assert!(
            !KeyError::NoPolicy {
                kind: HeaderKind::Jwe
            }
            .is_retryable()
        );
    }

    #[test]
    fn test_security_error_separates_key_from_signature() {
        let key: SecurityError = KeyError::MissingKeyId {
            kind: HeaderKind::Jws,
        }
        .into();
        let signature: SecurityError = SignatureError::VerificationFailed {
            algorithm: "HS256".into(),
        }
        .into();

        assert_eq!(key.to_string(), "Cannot process token: key unavailable");
        assert_eq!(
            signature.to_string(),
            "Token invalid: signature verification failed"
        );
        assert_eq!(
            key.source().map(ToString::to_string).as_deref(),
            Some("JWS header has no key ID")
        );
    }
}
