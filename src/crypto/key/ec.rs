use std::fmt;
use std::sync::Arc;

use snafu::prelude::*;

use crate::crypto::error::{KeyError, MalformedSnafu};

/// NIST curves usable in JOSE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EcCurve {
    P256,
    P384,
    P521,
}

impl EcCurve {
    /// The JWK `crv` name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            EcCurve::P256 => "P-256",
            EcCurve::P384 => "P-384",
            EcCurve::P521 => "P-521",
        }
    }

    /// Length of one affine coordinate in bytes.
    #[must_use]
    pub fn coordinate_len(&self) -> usize {
        match self {
            EcCurve::P256 => 32,
            EcCurve::P384 => 48,
            EcCurve::P521 => 66,
        }
    }

    /// Parses a JWK `crv` name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "P-256" => Some(EcCurve::P256),
            "P-384" => Some(EcCurve::P384),
            "P-521" => Some(EcCurve::P521),
            _ => None,
        }
    }
}

impl fmt::Display for EcCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone)]
pub enum EcPublicKey {
    P256(Arc<p256::ecdsa::VerifyingKey>),
    P384(Arc<p384::ecdsa::VerifyingKey>),
    P521(Arc<p521::ecdsa::VerifyingKey>),
}

impl fmt::Debug for EcPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::P256(_) => f.debug_tuple("P256").finish_non_exhaustive(),
            Self::P384(_) => f.debug_tuple("P384").finish_non_exhaustive(),
            Self::P521(_) => f.debug_tuple("P521").finish_non_exhaustive(),
        }
    }
}

impl From<p256::ecdsa::VerifyingKey> for EcPublicKey {
    fn from(value: p256::ecdsa::VerifyingKey) -> Self {
        Self::P256(Arc::new(value))
    }
}

impl From<p384::ecdsa::VerifyingKey> for EcPublicKey {
    fn from(value: p384::ecdsa::VerifyingKey) -> Self {
        Self::P384(Arc::new(value))
    }
}

impl From<p521::ecdsa::VerifyingKey> for EcPublicKey {
    fn from(value: p521::ecdsa::VerifyingKey) -> Self {
        Self::P521(Arc::new(value))
    }
}

impl EcPublicKey {
    #[must_use]
    pub fn curve(&self) -> EcCurve {
        match self {
            Self::P256(_) => EcCurve::P256,
            Self::P384(_) => EcCurve::P384,
            Self::P521(_) => EcCurve::P521,
        }
    }

    /// Builds a public key from uncompressed affine coordinates, as found in
    /// the `crv`, `x` and `y` members of an EC JWK.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::Malformed`] if the curve is unknown, a coordinate
    /// has the wrong length, or the point is not on the curve.
    pub fn from_affine_coordinates(crv: &str, x: &[u8], y: &[u8]) -> Result<Self, KeyError> {
        let curve = EcCurve::from_name(crv).context(MalformedSnafu {
            reason: format!("unsupported curve `{crv}`"),
        })?;

        let expected = curve.coordinate_len();
        ensure!(
            x.len() == expected && y.len() == expected,
            MalformedSnafu {
                reason: format!(
                    "{curve} coordinates must be {expected} bytes, got {} and {}",
                    x.len(),
                    y.len()
                ),
            }
        );

        let off_curve = || MalformedSnafu {
            reason: format!("point is not on {curve}"),
        };

        // Coordinate conversion panics on a length mismatch, checked above.
        match curve {
            EcCurve::P256 => {
                let point = p256::EncodedPoint::from_affine_coordinates(
                    x.into(),
                    y.into(),
                    false,
                );
                let key = p256::ecdsa::VerifyingKey::from_encoded_point(&point)
                    .ok()
                    .with_context(off_curve)?;
                Ok(key.into())
            }
            EcCurve::P384 => {
                let point = p384::EncodedPoint::from_affine_coordinates(
                    x.into(),
                    y.into(),
                    false,
                );
                let key = p384::ecdsa::VerifyingKey::from_encoded_point(&point)
                    .ok()
                    .with_context(off_curve)?;
                Ok(key.into())
            }
            EcCurve::P521 => {
                let point = p521::EncodedPoint::from_affine_coordinates(
                    x.into(),
                    y.into(),
                    false,
                );
                let key = p521::ecdsa::VerifyingKey::from_encoded_point(&point)
                    .ok()
                    .with_context(off_curve)?;
                Ok(key.into())
            }
        }
    }
}

#[derive(Clone)]
pub enum EcPrivateKey {
    P256(Arc<p256::SecretKey>),
    P384(Arc<p384::SecretKey>),
    P521(Arc<p521::SecretKey>),
}

impl fmt::Debug for EcPrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::P256(_) => f.debug_tuple("P256").finish_non_exhaustive(),
            Self::P384(_) => f.debug_tuple("P384").finish_non_exhaustive(),
            Self::P521(_) => f.debug_tuple("P521").finish_non_exhaustive(),
        }
    }
}

impl From<p256::SecretKey> for EcPrivateKey {
    fn from(value: p256::SecretKey) -> Self {
        Self::P256(Arc::new(value))
    }
}

impl From<p384::SecretKey> for EcPrivateKey {
    fn from(value: p384::SecretKey) -> Self {
        Self::P384(Arc::new(value))
    }
}

impl From<p521::SecretKey> for EcPrivateKey {
    fn from(value: p521::SecretKey) -> Self {
        Self::P521(Arc::new(value))
    }
}

impl EcPrivateKey {
    #[must_use]
    pub fn curve(&self) -> EcCurve {
        match self {
            Self::P256(_) => EcCurve::P256,
            Self::P384(_) => EcCurve::P384,
            Self::P521(_) => EcCurve::P521,
        }
    }
}
