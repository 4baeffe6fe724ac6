//! Deterministic key derivation and the per-session key context
//!
//! A [`Seed`] is expanded into a P-521 private scalar with a fixed,
//! versioned KDF (scalar-kdf v1, see [`derive_scalar`]), packaged into a
//! PKCS#8 container, imported through the host provider, and round-trip
//! verified before the resulting session is ever handed out. The pipeline
//! is linear and has no fallback: if any stage fails, the whole derivation
//! attempt fails loudly. Re-running it with the same seed yields the same
//! scalar, point, and container, so the caller is free to retry.
//!
//! [`KeyContext`] replaces any notion of a global "current key": it owns
//! the provider and at most one verified session, and every operation that
//! needs key material goes through it.

use hkdf::Hkdf;
use sha2::Sha512;
use tracing::debug;

use super::der::EncodingError;
use super::keys::{PrivateScalar, PublicPoint, SharedSecret, PRIVATE_SCALAR_SIZE};
use super::pkcs8::{Pkcs8Document, Pkcs8Error};
use super::provider::{KeyProvider, ProviderError};
use super::token::ShareToken;
use super::verify::{check_round_trip, KeyIntegrityError};

/// Domain-separation salt for scalar-kdf v1
///
/// The version lives in the salt: any change to the expansion procedure
/// must bump this string, and containers derived under different versions
/// are deliberately incompatible.
const SCALAR_KDF_SALT: &[u8] = b"seedkey/p521/scalar/v1";

/// The P-521 group order, big-endian
const CURVE_ORDER: [u8; PRIVATE_SCALAR_SIZE] = [
    0x01, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0xFF, 0xFF, 0xFF, 0xFA, 0x51, 0x86, 0x87, 0x83, 0xBF, 0x2F, 0x96, 0x6B, 0x7F, 0xCC, 0x01,
    0x48, 0xF7, 0x09, 0xA5, 0xD0, 0x3B, 0xB5, 0xC9, 0xB8, 0x89, 0x9C, 0x47, 0xAE, 0xBB, 0x6F,
    0xB7, 0x1E, 0x91, 0x38, 0x64, 0x09,
];

/// Default size of a randomly generated seed in bytes
pub const SEED_SIZE: usize = 32;

/// Errors that can occur during key derivation
#[derive(Debug, thiserror::Error)]
pub enum DerivationError {
    #[error("seed expansion failed to produce a valid scalar")]
    SeedExpansion,
    #[error("DER encoding error: {0}")]
    Encoding(#[from] EncodingError),
    #[error("container error: {0}")]
    Container(#[from] Pkcs8Error),
    #[error("host provider error: {0}")]
    Provider(#[from] ProviderError),
    #[error("{0}")]
    Integrity(#[from] KeyIntegrityError),
}

/// Errors that can occur when sharing or combining keys
#[derive(Debug, thiserror::Error)]
pub enum ShareError {
    #[error("share key unavailable: no key has been derived in this context")]
    MissingKey,
    #[error("host provider error: {0}")]
    Provider(#[from] ProviderError),
}

/// Secret input to deterministic derivation
///
/// Opaque bytes, typically passphrase-derived. Never persisted; only the
/// container built from it may be cached.
#[derive(Clone, PartialEq, Eq)]
pub struct Seed(Vec<u8>);

impl std::fmt::Debug for Seed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Seed(..)")
    }
}

impl Seed {
    /// Create a seed from raw bytes
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Seed(bytes)
    }

    /// Create a seed from a passphrase (its UTF-8 bytes, as given)
    pub fn from_passphrase(passphrase: &str) -> Self {
        Seed(passphrase.as_bytes().to_vec())
    }

    /// Generate a random seed using a cryptographically secure RNG
    pub fn generate() -> Self {
        let mut buff = vec![0u8; SEED_SIZE];
        getrandom::getrandom(&mut buff).expect("failed to generate random bytes");
        Seed(buff)
    }

    /// Get a reference to the seed bytes
    pub fn bytes(&self) -> &[u8] {
        &self.0
    }
}

/// Expand a seed into a P-521 private scalar (scalar-kdf v1)
///
/// The procedure is fixed and versioned so containers remain portable
/// across implementations:
///
/// 1. `okm = HKDF-SHA-512(salt = "seedkey/p521/scalar/v1", ikm = seed,
///    info = [c])` for a counter byte `c` starting at 0, producing 66
///    bytes.
/// 2. Mask the candidate down to 521 bits (`okm[0] &= 0x01`).
/// 3. Accept if the candidate is non-zero and strictly below the group
///    order; otherwise increment `c` and repeat.
///
/// A pure function of the seed: the same seed always yields the same
/// scalar. The rejection branch is taken with probability around 2^-260,
/// but it is handled rather than assumed away.
///
/// # Errors
///
/// Returns [`DerivationError::SeedExpansion`] if no counter value yields a
/// valid scalar, which cannot occur in practice.
pub fn derive_scalar(seed: &Seed) -> Result<PrivateScalar, DerivationError> {
    let hk = Hkdf::<Sha512>::new(Some(SCALAR_KDF_SALT), seed.bytes());
    for counter in 0u8..=u8::MAX {
        let mut okm = [0u8; PRIVATE_SCALAR_SIZE];
        hk.expand(&[counter], &mut okm)
            .map_err(|_| DerivationError::SeedExpansion)?;
        okm[0] &= 0x01;
        if scalar_in_range(&okm) {
            return Ok(PrivateScalar::from(okm));
        }
    }
    Err(DerivationError::SeedExpansion)
}

/// Whether a masked candidate lies in `[1, order - 1]`
fn scalar_in_range(candidate: &[u8; PRIVATE_SCALAR_SIZE]) -> bool {
    let nonzero = candidate.iter().any(|b| *b != 0);
    // Fixed-length big-endian values compare lexicographically
    nonzero && candidate[..] < CURVE_ORDER[..]
}

/// A verified key session
///
/// Holds the provider handle, the public point, and the container the
/// handle was imported from. Only ever constructed after the round-trip
/// gate has passed. The raw private scalar is dropped at construction.
pub struct KeySession<H> {
    handle: H,
    public_point: PublicPoint,
    document: Pkcs8Document,
}

impl<H> KeySession<H> {
    /// The provider's opaque key handle
    pub fn handle(&self) -> &H {
        &self.handle
    }

    /// The uncompressed public point
    pub fn public_point(&self) -> &PublicPoint {
        &self.public_point
    }

    /// The PKCS#8 container; may be cached and re-imported for reuse with
    /// the same seed
    pub fn document(&self) -> &Pkcs8Document {
        &self.document
    }

    /// The hex share token for this session's public point
    pub fn share_token(&self) -> ShareToken {
        ShareToken::encode(&self.public_point)
    }
}

/// Explicit key context scoped to a single derivation session
///
/// Owns the host provider and at most one verified [`KeySession`].
/// Concurrent derivations for different seeds belong in different
/// contexts; within one context the pipeline is strictly sequential.
pub struct KeyContext<P: KeyProvider> {
    provider: P,
    session: Option<KeySession<P::Handle>>,
}

impl<P: KeyProvider> KeyContext<P> {
    pub fn new(provider: P) -> Self {
        KeyContext {
            provider,
            session: None,
        }
    }

    /// The host provider this context operates through
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// The current verified session, if one has been established
    pub fn session(&self) -> Option<&KeySession<P::Handle>> {
        self.session.as_ref()
    }

    /// Tear down the current session
    pub fn clear(&mut self) {
        self.session = None;
    }

    /// Derive a verified key session from a seed
    ///
    /// Runs the full pipeline: seed expansion, public point derivation,
    /// container construction, provider import, and the mandatory
    /// round-trip gate. The session replaces any previous one only after
    /// verification succeeds.
    ///
    /// # Errors
    ///
    /// Returns a [`DerivationError`] distinguishing expansion, encoding,
    /// provider, and integrity failures. An unverified handle is never
    /// stored or returned, and no substitute key path exists.
    pub async fn derive(&mut self, seed: &Seed) -> Result<&KeySession<P::Handle>, DerivationError> {
        let scalar = derive_scalar(seed)?;
        debug!("expanded seed into private scalar");

        let public_point = self.provider.derive_public_point(&scalar).await?;
        debug!("derived public point");

        let document = Pkcs8Document::build(&scalar, &public_point)?;
        debug!(size = document.len(), "built PKCS#8 container");

        let handle = self.provider.import_pkcs8(&document).await?;
        check_round_trip(&self.provider, &handle, &scalar, &public_point).await??;
        debug!("round-trip verification passed");

        Ok(self.session.insert(KeySession {
            handle,
            public_point,
            document,
        }))
    }

    /// Re-establish a session from a cached container
    ///
    /// Imports the container and verifies the handle against the raw
    /// values embedded in it, applying the same integrity gate as
    /// [`KeyContext::derive`].
    ///
    /// # Errors
    ///
    /// Returns a [`DerivationError`] if the container does not parse,
    /// the import fails, or round-trip verification rejects the handle.
    pub async fn import(
        &mut self,
        document: Pkcs8Document,
    ) -> Result<&KeySession<P::Handle>, DerivationError> {
        let scalar = document.private_scalar()?;
        let public_point = document.public_point()?;

        let handle = self.provider.import_pkcs8(&document).await?;
        check_round_trip(&self.provider, &handle, &scalar, &public_point).await??;

        Ok(self.session.insert(KeySession {
            handle,
            public_point,
            document,
        }))
    }

    /// The share token for the current session's public point
    ///
    /// # Errors
    ///
    /// Returns [`ShareError::MissingKey`] when no session exists.
    pub fn share_token(&self) -> Result<ShareToken, ShareError> {
        let session = self.session.as_ref().ok_or(ShareError::MissingKey)?;
        Ok(session.share_token())
    }

    /// Combine the local private key with a remote public point via ECDH
    ///
    /// The missing-key check runs before anything else, so an unusable
    /// request is rejected without a single provider call. The remote
    /// point is not retained.
    ///
    /// # Errors
    ///
    /// Returns [`ShareError::MissingKey`] when no session exists, or a
    /// provider error if the ECDH operation fails.
    pub async fn combine(&self, remote: &PublicPoint) -> Result<SharedSecret, ShareError> {
        let session = self.session.as_ref().ok_or(ShareError::MissingKey)?;
        let secret = self
            .provider
            .derive_shared_secret(&session.handle, remote)
            .await?;
        Ok(secret)
    }
}
