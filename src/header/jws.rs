use bon::Builder;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::HeaderParams;

/// Protected header of a signed token (RFC 7515 §4).
#[derive(Debug, Clone, PartialEq, Builder, Serialize, Deserialize)]
pub struct JwsHeader {
    /// Signature or MAC algorithm (`alg`).
    #[builder(into)]
    #[serde(rename = "alg", deserialize_with = "super::protected_algorithm")]
    pub(crate) algorithm: String,
    /// Hint for which key was used to sign (`kid`).
    #[builder(into)]
    #[serde(rename = "kid", default, skip_serializing_if = "Option::is_none")]
    pub(crate) key_id: Option<String>,
    #[builder(into)]
    #[serde(rename = "typ", default, skip_serializing_if = "Option::is_none")]
    pub(crate) header_type: Option<String>,
    #[builder(into)]
    #[serde(rename = "cty", default, skip_serializing_if = "Option::is_none")]
    pub(crate) content_type: Option<String>,
    /// Extension parameters the recipient must understand (`crit`).
    #[serde(rename = "crit", default, skip_serializing_if = "Option::is_none")]
    pub(crate) critical: Option<Vec<String>>,
    /// Whether the payload is base64url encoded (RFC 7797).
    #[serde(rename = "b64", default, skip_serializing_if = "Option::is_none")]
    pub(crate) base64_payload: Option<bool>,
    #[builder(default)]
    #[serde(flatten)]
    pub(crate) extra: Map<String, Value>,
}

impl JwsHeader {
    #[must_use]
    pub fn critical(&self) -> Option<&[String]> {
        self.critical.as_deref()
    }

    /// Returns false only when `b64` is explicitly set to false.
    #[must_use]
    pub fn is_payload_encoded(&self) -> bool {
        self.base64_payload.unwrap_or(true)
    }

    #[must_use]
    pub fn get_extra(&self, name: &str) -> Option<&Value> {
        self.extra.get(name)
    }
}

impl HeaderParams for JwsHeader {
    fn algorithm(&self) -> &str {
        &self.algorithm
    }

    fn key_id(&self) -> Option<&str> {
        self.key_id.as_deref()
    }

    fn header_type(&self) -> Option<&str> {
        self.header_type.as_deref()
    }

    fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }
}
