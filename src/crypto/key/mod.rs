//! Key material handed out by locators.
//!
//! [`Key`] covers the key families JOSE algorithms use. Locators are generic
//! over their key type, so this is only one option; it is the one
//! [`ValidatingLocator`](crate::crypto::locator::ValidatingLocator) knows how
//! to check against a header's algorithm.

mod ec;

use std::fmt;
use std::sync::Arc;

use rsa::traits::PublicKeyParts as _;
use secrecy::{ExposeSecret as _, SecretBox};
use snafu::prelude::*;

pub use ec::{EcCurve, EcPrivateKey, EcPublicKey};

use crate::crypto::error::{
    KeyError, KeyLengthSnafu, UnsupportedAlgorithmSnafu, WeakKeySnafu, WrongKeyTypeSnafu,
};

const MIN_RSA_BITS: usize = 2048;

/// Symmetric key bytes.
#[derive(Debug, Clone)]
pub struct SecretKey {
    bytes: Arc<SecretBox<[u8]>>,
}

impl SecretKey {
    pub fn new(bytes: impl Into<Box<[u8]>>) -> Self {
        Self {
            bytes: Arc::new(SecretBox::new(bytes.into())),
        }
    }

    #[must_use]
    pub fn bits(&self) -> usize {
        self.bytes.expose_secret().len() * 8
    }

    #[must_use]
    pub fn expose_secret(&self) -> &[u8] {
        self.bytes.expose_secret()
    }
}

/// Key material of any supported family.
#[derive(Clone)]
pub enum Key {
    Secret(SecretKey),
    RsaPublic(Arc<rsa::RsaPublicKey>),
    RsaPrivate(Arc<rsa::RsaPrivateKey>),
    EcPublic(EcPublicKey),
    EcPrivate(EcPrivateKey),
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Key")
            .field(&self.type_name())
            .finish_non_exhaustive()
    }
}

impl From<SecretKey> for Key {
    fn from(value: SecretKey) -> Self {
        Self::Secret(value)
    }
}

impl From<rsa::RsaPublicKey> for Key {
    fn from(value: rsa::RsaPublicKey) -> Self {
        Self::RsaPublic(Arc::new(value))
    }
}

impl From<rsa::RsaPrivateKey> for Key {
    fn from(value: rsa::RsaPrivateKey) -> Self {
        Self::RsaPrivate(Arc::new(value))
    }
}

impl From<EcPublicKey> for Key {
    fn from(value: EcPublicKey) -> Self {
        Self::EcPublic(value)
    }
}

impl From<EcPrivateKey> for Key {
    fn from(value: EcPrivateKey) -> Self {
        Self::EcPrivate(value)
    }
}

/// What an algorithm demands of its key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Requirement {
    Secret { min_bits: usize },
    SecretExact { bits: usize },
    Rsa,
    Curve(EcCurve),
    AnyCurve,
}

impl Requirement {
    fn for_algorithm(algorithm: &str) -> Option<Self> {
        let requirement = match algorithm {
            "HS256" => Requirement::Secret { min_bits: 256 },
            "HS384" => Requirement::Secret { min_bits: 384 },
            "HS512" => Requirement::Secret { min_bits: 512 },
            // The content encryption algorithm decides the exact length.
            "dir" => Requirement::Secret { min_bits: 128 },
            "A128KW" | "A128GCMKW" => Requirement::SecretExact { bits: 128 },
            "A192KW" | "A192GCMKW" => Requirement::SecretExact { bits: 192 },
            "A256KW" | "A256GCMKW" => Requirement::SecretExact { bits: 256 },
            "RS256" | "RS384" | "RS512" | "PS256" | "PS384" | "PS512" | "RSA1_5" | "RSA-OAEP"
            | "RSA-OAEP-256" | "RSA-OAEP-384" | "RSA-OAEP-512" => Requirement::Rsa,
            "ES256" => Requirement::Curve(EcCurve::P256),
            "ES384" => Requirement::Curve(EcCurve::P384),
            "ES512" => Requirement::Curve(EcCurve::P521),
            "ECDH-ES" | "ECDH-ES+A128KW" | "ECDH-ES+A192KW" | "ECDH-ES+A256KW" => {
                Requirement::AnyCurve
            }
            _ => return None,
        };

        Some(requirement)
    }
}

impl Key {
    /// Short description of the key family, safe to log.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Key::Secret(_) => "secret",
            Key::RsaPublic(_) => "RSA public",
            Key::RsaPrivate(_) => "RSA private",
            Key::EcPublic(key) => match key.curve() {
                EcCurve::P256 => "EC P-256 public",
                EcCurve::P384 => "EC P-384 public",
                EcCurve::P521 => "EC P-521 public",
            },
            Key::EcPrivate(key) => match key.curve() {
                EcCurve::P256 => "EC P-256 private",
                EcCurve::P384 => "EC P-384 private",
                EcCurve::P521 => "EC P-521 private",
            },
        }
    }

    #[must_use]
    pub fn curve(&self) -> Option<EcCurve> {
        match self {
            Key::EcPublic(key) => Some(key.curve()),
            Key::EcPrivate(key) => Some(key.curve()),
            Key::Secret(_) | Key::RsaPublic(_) | Key::RsaPrivate(_) => None,
        }
    }

    fn rsa_bits(&self) -> Option<usize> {
        match self {
            Key::RsaPublic(key) => Some(key.n().bits()),
            Key::RsaPrivate(key) => Some(key.n().bits()),
            Key::Secret(_) | Key::EcPublic(_) | Key::EcPrivate(_) => None,
        }
    }

    /// Checks that this key has the type and strength `algorithm` needs.
    ///
    /// Both halves of an asymmetric pair are accepted, since a locator may
    /// serve either side of the operation.
    ///
    /// # Errors
    ///
    /// - [`KeyError::UnsupportedAlgorithm`] if `algorithm` is not a known JWA
    ///   signature or key management algorithm.
    /// - [`KeyError::WrongKeyType`] if the key family or curve does not fit.
    /// - [`KeyError::WeakKey`] or [`KeyError::KeyLength`] if the key is the
    ///   right family but the wrong size.
    pub fn ensure_supports(&self, algorithm: &str) -> Result<(), KeyError> {
        let requirement =
            Requirement::for_algorithm(algorithm).context(UnsupportedAlgorithmSnafu { algorithm })?;

        let wrong_type = WrongKeyTypeSnafu {
            algorithm,
            actual: self.type_name(),
        };

        match (requirement, self) {
            (Requirement::Secret { min_bits }, Key::Secret(secret)) => {
                let actual_bits = secret.bits();
                ensure!(
                    actual_bits >= min_bits,
                    WeakKeySnafu {
                        algorithm,
                        required_bits: min_bits,
                        actual_bits,
                    }
                );
            }
            (Requirement::SecretExact { bits }, Key::Secret(secret)) => {
                let actual_bits = secret.bits();
                ensure!(
                    actual_bits == bits,
                    KeyLengthSnafu {
                        algorithm,
                        expected_bits: bits,
                        actual_bits,
                    }
                );
            }
            (Requirement::Rsa, _) => {
                let actual_bits = self.rsa_bits().context(wrong_type)?;
                ensure!(
                    actual_bits >= MIN_RSA_BITS,
                    WeakKeySnafu {
                        algorithm,
                        required_bits: MIN_RSA_BITS,
                        actual_bits,
                    }
                );
            }
            (Requirement::Curve(expected), _) => {
                ensure!(self.curve() == Some(expected), wrong_type);
            }
            (Requirement::AnyCurve, _) => {
                ensure!(self.curve().is_some(), wrong_type);
            }
            (Requirement::Secret { .. } | Requirement::SecretExact { .. }, _) => {
                return wrong_type.fail();
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rsa::BigUint;

    use super::*;

    fn rsa_public(bytes: usize) -> Key {
        rsa::RsaPublicKey::new(
            BigUint::from_bytes_be(&vec![0xff; bytes]),
            BigUint::from(65_537u32),
        )
        .unwrap()
        .into()
    }

    fn ec_public_p256() -> Key {
        let signing_key = p256::ecdsa::SigningKey::from_slice(&[7u8; 32]).unwrap();
        EcPublicKey::from(p256::ecdsa::VerifyingKey::from(&signing_key)).into()
    }

    #[test]
    fn test_hmac_key_strength() {
        let key: Key = SecretKey::new(vec![1u8; 32]).into();

        key.ensure_supports("HS256").unwrap();
        assert!(matches!(
            key.ensure_supports("HS512"),
            Err(KeyError::WeakKey {
                required_bits: 512,
                actual_bits: 256,
                ..
            })
        ));
    }

    #[test]
    fn test_key_wrap_needs_exact_length() {
        let key: Key = SecretKey::new(vec![1u8; 32]).into();

        key.ensure_supports("A256KW").unwrap();
        assert!(matches!(
            key.ensure_supports("A128KW"),
            Err(KeyError::KeyLength {
                expected_bits: 128,
                actual_bits: 256,
                ..
            })
        ));
    }

    #[test]
    fn test_rsa_strength() {
        rsa_public(256).ensure_supports("RS256").unwrap();
        rsa_public(256).ensure_supports("RSA-OAEP-256").unwrap();

        assert!(matches!(
            rsa_public(128).ensure_supports("PS256"),
            Err(KeyError::WeakKey {
                required_bits: 2048,
                actual_bits: 1024,
                ..
            })
        ));
    }

    #[test]
    fn test_curve_must_match() {
        let key = ec_public_p256();

        key.ensure_supports("ES256").unwrap();
        key.ensure_supports("ECDH-ES+A128KW").unwrap();
        assert!(matches!(
            key.ensure_supports("ES384"),
            Err(KeyError::WrongKeyType { actual: "EC P-256 public", .. })
        ));
    }

    #[test]
    fn test_direct_needs_secret() {
        Key::from(SecretKey::new(vec![1u8; 16]))
            .ensure_supports("dir")
            .unwrap();

        assert!(matches!(
            rsa_public(256).ensure_supports("dir"),
            Err(KeyError::WrongKeyType { actual: "RSA public", .. })
        ));
        assert!(matches!(
            ec_public_p256().ensure_supports("dir"),
            Err(KeyError::WrongKeyType { actual: "EC P-256 public", .. })
        ));
        assert!(matches!(
            Key::from(SecretKey::new(vec![1u8; 8])).ensure_supports("dir"),
            Err(KeyError::WeakKey {
                required_bits: 128,
                actual_bits: 64,
                ..
            })
        ));
    }

    #[test]
    fn test_gcm_key_wrap_needs_secret() {
        Key::from(SecretKey::new(vec![1u8; 16]))
            .ensure_supports("A128GCMKW")
            .unwrap();

        assert!(matches!(
            ec_public_p256().ensure_supports("A128GCMKW"),
            Err(KeyError::WrongKeyType { .. })
        ));
        assert!(matches!(
            rsa_public(256).ensure_supports("A128GCMKW"),
            Err(KeyError::WrongKeyType { .. })
        ));
    }

    #[test]
    fn test_family_mismatch() {
        let secret: Key = SecretKey::new(vec![1u8; 64]).into();

        assert!(matches!(
            secret.ensure_supports("RS256"),
            Err(KeyError::WrongKeyType { actual: "secret", .. })
        ));
        assert!(matches!(
            rsa_public(256).ensure_supports("HS256"),
            Err(KeyError::WrongKeyType { actual: "RSA public", .. })
        ));
    }

    #[test]
    fn test_unknown_algorithm() {
        let key: Key = SecretKey::new(vec![1u8; 32]).into();

        assert!(matches!(
            key.ensure_supports("XS256"),
            Err(KeyError::UnsupportedAlgorithm { algorithm }) if algorithm == "XS256"
        ));
    }

    #[test]
    fn test_debug_hides_material() {
        let key: Key = SecretKey::new(b"super-secret-value".to_vec()).into();

        let rendered = format!("{key:?}");

        assert_eq!(rendered, r#"Key("secret", ..)"#);
    }
}
