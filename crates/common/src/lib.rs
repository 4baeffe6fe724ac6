/**
 * Cryptographic types and operations.
 *  - Deterministic P-521 key derivation from a seed
 *  - Structural PKCS#8 container construction with a
 *    mandatory round-trip integrity gate
 *  - Share-token encoding for out-of-band key exchange
 */
pub mod crypto;

pub mod prelude {
    pub use crate::crypto::{
        KeyContext, KeyProvider, P521Provider, Pkcs8Document, PrivateScalar, PublicPoint, Seed,
        SharedSecret, ShareToken,
    };
}
