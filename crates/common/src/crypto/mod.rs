//! Cryptographic primitives for seedkey
//!
//! This module provides the deterministic key container subsystem:
//!
//! - **Deterministic Derivation**: P-521 keypairs expanded from a seed, so the
//!   same seed always reconstructs the same key material on every host
//! - **Container Construction**: structural PKCS#8 DER encoding that embeds
//!   both the private scalar and the public point
//! - **Integrity Gate**: every constructed container is re-imported and
//!   exported back through the host provider before first use
//! - **Key Sharing**: hex share tokens carried in a URL so a second party can
//!   perform an ECDH exchange
//!
//! # Security Model
//!
//! ## Deterministic Keys
//! A `Seed` is expanded into a 66-byte private scalar with a fixed, versioned
//! KDF. The scalar and its public point are packaged into a [`Pkcs8Document`]
//! built field-by-field from semantic lengths, never by patching a platform
//! template. Any host whose PKCS#8 decoder disagrees with the builder is
//! caught by the round-trip gate instead of silently producing a divergent
//! key.
//!
//! ## No Fallback Keys
//! Derivation either yields a verified key or fails loudly. There is no
//! substitute key path: a failed import or a round-trip mismatch is terminal
//! for that attempt.
//!
//! ## Key Exchange
//! The local public point travels as a 266-character hex token in a `pub`
//! URL parameter. A remote token is strictly validated (length and charset)
//! before it is allowed anywhere near the ECDH step.

mod der;
mod derive;
mod keys;
mod pkcs8;
mod provider;
mod token;
mod verify;

pub use der::EncodingError;
pub use derive::{DerivationError, KeyContext, KeySession, Seed, ShareError};
pub use keys::{
    KeyError, PrivateScalar, PublicPoint, SharedSecret, PRIVATE_SCALAR_SIZE, PUBLIC_POINT_SIZE,
    SHARED_SECRET_SIZE,
};
pub use pkcs8::{Pkcs8Document, Pkcs8Error, PKCS8_DOCUMENT_SIZE};
pub use provider::{KeyProvider, P521Handle, P521Provider, ProviderError};
pub use token::{ShareToken, TokenError, SHARE_TOKEN_LEN};
pub use verify::{verify_round_trip, KeyIntegrityError};
