//! Commonly used traits.

pub use crate::crypto::locator::{Locator, LocatorAdapter};
#[allow(deprecated)]
pub use crate::crypto::resolver::SigningKeyResolver;
pub use crate::header::HeaderParams;
