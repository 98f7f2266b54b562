/*!
jose-locator resolves the key material for a JOSE token from its header.

A token header says which operation is in play: a signature or MAC (JWS),
or content encryption (JWE). The two are resolved by different policies,
since verification and decryption keys usually differ in type and trust
store. A [`Locator`](crypto::locator::Locator) takes any
[`Header`](header::Header) and returns the key for it; implementations
plug in as a [`LocatorAdapter`](crypto::locator::LocatorAdapter) with one
hook per header kind, and the dispatch between them is a `match` on the
header enum.

```
use jose_locator::crypto::locator::{ConstantKeyLocator, Locator as _};
use jose_locator::header::{Header, JweHeader, JwsHeader};

let locator = ConstantKeyLocator::new("signing-key", "encryption-key");

let jws: Header = JwsHeader::builder().algorithm("HS256").build().into();
let jwe: Header = JweHeader::builder()
    .algorithm("dir")
    .encryption_algorithm("A256GCM")
    .build()
    .into();

assert_eq!(locator.locate(&jws)?, "signing-key");
assert_eq!(locator.locate(&jwe)?, "encryption-key");
# Ok::<(), jose_locator::crypto::KeyError>(())
```

Algorithm implementations, compact serialization and claims handling are
left to the surrounding token library.
*/
#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod crypto;
mod error;
pub mod header;
pub mod platform;
pub mod prelude;

pub use error::{BoxedError, Error};
