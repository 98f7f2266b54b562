//! Key resolution and the errors of the signing and encryption pipeline.

pub mod error;
#[cfg(feature = "crypto-native")]
pub mod key;
pub mod locator;
pub mod resolver;

pub use error::{KeyError, SecurityError, SignatureError};
