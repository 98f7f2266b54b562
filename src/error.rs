use snafu::{AsErrorSource, Snafu};

use crate::platform::MaybeSendSync;

/// Errors that may occur in the library.
///
/// Locators backed by a remote key store wrap their own failures in
/// [`KeyError::Lookup`](crate::crypto::KeyError::Lookup), so those store
/// errors implement this trait too.
pub trait Error: std::error::Error + AsErrorSource + MaybeSendSync {
    /// If true, the failed lookup or operation may succeed if retried.
    ///
    /// Problems with the key material itself are never retryable.
    fn is_retryable(&self) -> bool;
}

/// A boxed error that can be used without type parameters.
#[derive(Debug, Snafu)]
#[snafu(transparent)]
pub struct BoxedError {
    source: Box<dyn Error>,
}

impl BoxedError {
    /// Create a new boxed error from a generic `Error`.
    pub fn from_err<E: Error + 'static>(err: E) -> Self {
        Self {
            source: Box::new(err),
        }
    }

    /// Returns the wrapped error if it is of type `E`.
    #[must_use]
    pub fn downcast_ref<E: Error + 'static>(&self) -> Option<&E> {
        self.source.as_error_source().downcast_ref::<E>()
    }
}

impl Error for BoxedError {
    fn is_retryable(&self) -> bool {
        self.source.is_retryable()
    }
}

#[cfg(test)]
mod tests {
    use snafu::Snafu;

    use super::{BoxedError, Error};

    #[derive(Debug, Snafu)]
    #[snafu(display("key store unavailable"))]
    struct StoreUnavailable;

    impl Error for StoreUnavailable {
        fn is_retryable(&self) -> bool {
            true
        }
    }

    #[derive(Debug, Snafu)]
    #[snafu(display("key store rejected credentials"))]
    struct StoreForbidden;

    impl Error for StoreForbidden {
        fn is_retryable(&self) -> bool {
            false
        }
    }

    #[test]
    fn test_boxed_error_keeps_retryability_and_message() {
        let boxed = BoxedError::from_err(StoreUnavailable);

        assert!(boxed.is_retryable());
        assert_eq!(boxed.to_string(), "key store unavailable");
        assert!(!BoxedError::from_err(StoreForbidden).is_retryable());
    }

    #[test]
    fn test_downcast() {
        let boxed = BoxedError::from_err(StoreForbidden);

        assert!(boxed.downcast_ref::<StoreForbidden>().is_some());
        assert!(boxed.downcast_ref::<StoreUnavailable>().is_none());
    }
}
