//! Platform marker traits.
//!
//! On native targets locators are shared between threads, so everything
//! handed to them must be `Send + Sync`. On `wasm32` there is a single
//! thread and the bounds are dropped.

#[cfg(not(target_arch = "wasm32"))]
mod bounds {
    /// `Send` on native targets.
    pub trait MaybeSend: Send {}
    impl<T: Send + ?Sized> MaybeSend for T {}

    /// `Send + Sync` on native targets.
    pub trait MaybeSendSync: Send + Sync {}
    impl<T: Send + Sync + ?Sized> MaybeSendSync for T {}
}

#[cfg(target_arch = "wasm32")]
mod bounds {
    /// No bound on `wasm32`.
    pub trait MaybeSend {}
    impl<T: ?Sized> MaybeSend for T {}

    /// No bound on `wasm32`.
    pub trait MaybeSendSync {}
    impl<T: ?Sized> MaybeSendSync for T {}
}

pub use bounds::{MaybeSend, MaybeSendSync};
