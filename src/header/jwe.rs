use bon::Builder;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::HeaderParams;

/// Protected header of an encrypted token (RFC 7516 §4).
///
/// `alg` names the key management algorithm, which is what key resolution
/// cares about. `enc` names the content encryption algorithm.
#[derive(Debug, Clone, PartialEq, Builder, Serialize, Deserialize)]
pub struct JweHeader {
    /// Key management algorithm (`alg`).
    #[builder(into)]
    #[serde(rename = "alg", deserialize_with = "super::protected_algorithm")]
    pub(crate) algorithm: String,
    /// Content encryption algorithm (`enc`).
    #[builder(into)]
    #[serde(rename = "enc")]
    pub(crate) encryption_algorithm: String,
    #[builder(into)]
    #[serde(rename = "kid", default, skip_serializing_if = "Option::is_none")]
    pub(crate) key_id: Option<String>,
    #[builder(into)]
    #[serde(rename = "typ", default, skip_serializing_if = "Option::is_none")]
    pub(crate) header_type: Option<String>,
    #[builder(into)]
    #[serde(rename = "cty", default, skip_serializing_if = "Option::is_none")]
    pub(crate) content_type: Option<String>,
    #[serde(rename = "crit", default, skip_serializing_if = "Option::is_none")]
    pub(crate) critical: Option<Vec<String>>,
    /// Compression applied before encryption (`zip`).
    #[builder(into)]
    #[serde(rename = "zip", default, skip_serializing_if = "Option::is_none")]
    pub(crate) compression: Option<String>,
    #[builder(default)]
    #[serde(flatten)]
    pub(crate) extra: Map<String, Value>,
}

impl JweHeader {
    #[must_use]
    pub fn encryption_algorithm(&self) -> &str {
        &self.encryption_algorithm
    }

    #[must_use]
    pub fn critical(&self) -> Option<&[String]> {
        self.critical.as_deref()
    }

    #[must_use]
    pub fn compression(&self) -> Option<&str> {
        self.compression.as_deref()
    }

    #[must_use]
    pub fn get_extra(&self, name: &str) -> Option<&Value> {
        self.extra.get(name)
    }
}

impl HeaderParams for JweHeader {
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
