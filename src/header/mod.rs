//! Token headers.
//!
//! A [`Header`] is one of three structurally distinct kinds. Signed and
//! encrypted headers are resolved to keys by different policies, so they
//! are kept as separate types rather than one struct with optional fields.

mod jwe;
mod jws;

use std::fmt;

use base64::Engine as _;
use bon::Builder;
use serde::{Deserialize, Deserializer, Serialize, de};
use serde_json::{Map, Value};
use snafu::prelude::*;

pub use jwe::{JweHeader, JweHeaderBuilder};
pub use jws::{JwsHeader, JwsHeaderBuilder};

/// The `alg` value of an unsecured token.
pub const ALG_NONE: &str = "none";

/// Deserializes the `alg` of a signed or encrypted header, which must not
/// be `none`.
pub(crate) fn protected_algorithm<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<String, D::Error> {
    let algorithm = String::deserialize(deserializer)?;
    if algorithm == ALG_NONE {
        return Err(de::Error::custom(
            "`none` is only valid for unprotected headers",
        ));
    }
    Ok(algorithm)
}

fn unprotected_algorithm<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let algorithm = String::deserialize(deserializer)?;
    if algorithm != ALG_NONE {
        return Err(de::Error::custom(format!(
            "unprotected header must use `none`, not `{algorithm}`"
        )));
    }
    Ok(algorithm)
}

/// Parameters shared by every header kind.
pub trait HeaderParams {
    /// The `alg` parameter.
    fn algorithm(&self) -> &str;

    /// The `kid` parameter, if present.
    fn key_id(&self) -> Option<&str>;

    /// The `typ` parameter, if present.
    fn header_type(&self) -> Option<&str>;

    /// The `cty` parameter, if present.
    fn content_type(&self) -> Option<&str>;
}

/// The kind of security operation a header describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeaderKind {
    Jws,
    Jwe,
    Unprotected,
}

impl fmt::Display for HeaderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            HeaderKind::Jws => "JWS",
            HeaderKind::Jwe => "JWE",
            HeaderKind::Unprotected => "unprotected",
        })
    }
}

/// Header of an unsecured token (`alg` is `none`).
///
/// No key applies to these, but locators still see them so that they can
/// reject them explicitly.
#[derive(Debug, Clone, PartialEq, Builder, Serialize, Deserialize)]
pub struct UnprotectedHeader {
    #[builder(skip = ALG_NONE.to_owned())]
    #[serde(rename = "alg", deserialize_with = "unprotected_algorithm")]
    pub(crate) algorithm: String,
    #[builder(into)]
    #[serde(rename = "typ", default, skip_serializing_if = "Option::is_none")]
    pub(crate) header_type: Option<String>,
    #[builder(into)]
    #[serde(rename = "cty", default, skip_serializing_if = "Option::is_none")]
    pub(crate) content_type: Option<String>,
    #[builder(default)]
    #[serde(flatten)]
    pub(crate) extra: Map<String, Value>,
}

impl HeaderParams for UnprotectedHeader {
    fn algorithm(&self) -> &str {
        &self.algorithm
    }

    fn key_id(&self) -> Option<&str> {
        None
    }

    fn header_type(&self) -> Option<&str> {
        self.header_type.as_deref()
    }

    fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }
}

/// A token header of any kind.
///
/// Deserializing a concrete header type checks `alg` against that kind:
/// signed and encrypted headers reject `none`, unprotected headers require
/// it. Headers built in code are not checked.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Header {
    Jws(JwsHeader),
    Jwe(JweHeader),
    Unprotected(UnprotectedHeader),
}

#[derive(Debug, Snafu)]
pub enum HeaderError {
    #[snafu(display("Header segment is not valid base64url"))]
    Base64 { source: base64::DecodeError },
    #[snafu(display("Header is not a valid JSON object"))]
    Json { source: serde_json::Error },
    #[snafu(display("Header has no `alg` parameter"))]
    MissingAlgorithm,
}

impl crate::Error for HeaderError {
    fn is_retryable(&self) -> bool {
        false
    }
}

impl Header {
    #[must_use]
    pub fn kind(&self) -> HeaderKind {
        match self {
            Header::Jws(_) => HeaderKind::Jws,
            Header::Jwe(_) => HeaderKind::Jwe,
            Header::Unprotected(_) => HeaderKind::Unprotected,
        }
    }

    /// Parses a decoded JSON header.
    ///
    /// A header carrying `enc` is an encryption header. Otherwise an `alg`
    /// of `none` marks an unsecured token and anything else is a signature
    /// header.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not a JSON object, lacks `alg`, or
    /// does not match the shape of its detected kind.
    pub fn from_json(json: &[u8]) -> Result<Self, HeaderError> {
        let params: Map<String, Value> = serde_json::from_slice(json).context(JsonSnafu)?;

        let algorithm = params
            .get("alg")
            .and_then(Value::as_str)
            .context(MissingAlgorithmSnafu)?;

        let kind = if params.contains_key("enc") {
            HeaderKind::Jwe
        } else if algorithm == ALG_NONE {
            HeaderKind::Unprotected
        } else {
            HeaderKind::Jws
        };

        let value = Value::Object(params);
        let header = match kind {
            HeaderKind::Jws => Header::Jws(serde_json::from_value(value).context(JsonSnafu)?),
            HeaderKind::Jwe => Header::Jwe(serde_json::from_value(value).context(JsonSnafu)?),
            HeaderKind::Unprotected => {
                Header::Unprotected(serde_json::from_value(value).context(JsonSnafu)?)
            }
        };

        Ok(header)
    }

    /// Parses the first segment of a compact serialized token.
    ///
    /// # Errors
    ///
    /// Returns an error if the segment is not unpadded base64url, or if
    /// [`Header::from_json`] fails on the decoded bytes.
    pub fn from_segment(segment: &str) -> Result<Self, HeaderError> {
        let json = base64::engine::general_purpose::URL_SAFE_NO_PAD
            .decode(segment)
            .context(Base64Snafu)?;
        Self::from_json(&json)
    }
}

impl HeaderParams for Header {
    fn algorithm(&self) -> &str {
        match self {
            Header::Jws(header) => header.algorithm(),
            Header::Jwe(header) => header.algorithm(),
            Header::Unprotected(header) => header.algorithm(),
        }
    }

    fn key_id(&self) -> Option<&str> {
        match self {
            Header::Jws(header) => header.key_id(),
            Header::Jwe(header) => header.key_id(),
            Header::Unprotected(header) => header.key_id(),
        }
    }

    fn header_type(&self) -> Option<&str> {
        match self {
            Header::Jws(header) => header.header_type(),
            Header::Jwe(header) => header.header_type(),
            Header::Unprotected(header) => header.header_type(),
        }
    }

    fn content_type(&self) -> Option<&str> {
        match self {
            Header::Jws(header) => header.content_type(),
            Header::Jwe(header) => header.content_type(),
            Header::Unprotected(header) => header.content_type(),
        }
    }
}

impl From<JwsHeader> for Header {
    fn from(value: JwsHeader) -> Self {
        Self::Jws(value)
    }
}

impl From<JweHeader> for Header {
    fn from(value: JweHeader) -> Self {
        Self::Jwe(value)
    }
}

impl From<UnprotectedHeader> for Header {
    fn from(value: UnprotectedHeader) -> Self {
        Self::Unprotected(value)
    }
}
