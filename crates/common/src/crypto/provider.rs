//! Host cryptography capability
//!
//! The curve primitives themselves (scalar multiplication, PKCS#8 import,
//! ECDH) live behind the [`KeyProvider`] trait so the derivation pipeline is
//! written against a capability, not a particular implementation. Each
//! operation is a suspension point; a failure is terminal for the attempt
//! and is never retried here.
//!
//! [`P521Provider`] is the bundled implementation backed by the RustCrypto
//! `p521` crate. Its import path goes through `from_pkcs8_der`, a decoder
//! independent of the container builder, which is what gives the round-trip
//! gate real teeth: two implementations have to agree on every byte.

use async_trait::async_trait;
use p521::elliptic_curve::pkcs8::DecodePrivateKey;
use p521::elliptic_curve::sec1::ToEncodedPoint;
use p521::{PublicKey, SecretKey};

use super::keys::{PrivateScalar, PublicPoint, SharedSecret};
use super::pkcs8::Pkcs8Document;

/// Errors reported by a host cryptography provider
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("provider error: {0}")]
    Default(#[from] anyhow::Error),
}

/// Capability-style interface over a host cryptography service
///
/// `Handle` is the provider's opaque key object. It is not serializable and
/// not comparable by value; equivalence is established only indirectly via
/// round-trip export.
#[async_trait]
pub trait KeyProvider: Send + Sync {
    type Handle: Send + Sync;

    /// Compute the public point corresponding to a private scalar
    async fn derive_public_point(
        &self,
        scalar: &PrivateScalar,
    ) -> Result<PublicPoint, ProviderError>;

    /// Import a PKCS#8 container, yielding an opaque key handle
    async fn import_pkcs8(&self, document: &Pkcs8Document) -> Result<Self::Handle, ProviderError>;

    /// Export the raw private scalar back out of a handle
    async fn export_private(&self, handle: &Self::Handle) -> Result<PrivateScalar, ProviderError>;

    /// Export the raw uncompressed public point back out of a handle
    async fn export_public_point(
        &self,
        handle: &Self::Handle,
    ) -> Result<PublicPoint, ProviderError>;

    /// Perform ECDH between a local handle and a remote public point
    async fn derive_shared_secret(
        &self,
        handle: &Self::Handle,
        remote: &PublicPoint,
    ) -> Result<SharedSecret, ProviderError>;
}

/// Opaque key handle held by [`P521Provider`]
pub struct P521Handle(SecretKey);

/// Host cryptography provider backed by the RustCrypto `p521` crate
#[derive(Debug, Clone, Default)]
pub struct P521Provider;

impl P521Provider {
    pub fn new() -> Self {
        P521Provider
    }

    fn secret_from_scalar(scalar: &PrivateScalar) -> Result<SecretKey, ProviderError> {
        SecretKey::from_slice(scalar.bytes())
            .map_err(|_| anyhow::anyhow!("scalar is not a valid P-521 private key").into())
    }

    fn encode_public(key: &PublicKey) -> Result<PublicPoint, ProviderError> {
        let encoded = key.to_encoded_point(false);
        PublicPoint::from_slice(encoded.as_bytes())
            .map_err(|e| anyhow::anyhow!("provider produced a malformed point: {}", e).into())
    }
}

#[async_trait]
impl KeyProvider for P521Provider {
    type Handle = P521Handle;

    async fn derive_public_point(
        &self,
        scalar: &PrivateScalar,
    ) -> Result<PublicPoint, ProviderError> {
        let secret = Self::secret_from_scalar(scalar)?;
        Self::encode_public(&secret.public_key())
    }

    async fn import_pkcs8(&self, document: &Pkcs8Document) -> Result<Self::Handle, ProviderError> {
        let secret = SecretKey::from_pkcs8_der(document.bytes())
            .map_err(|e| anyhow::anyhow!("PKCS#8 import failed: {}", e))?;
        Ok(P521Handle(secret))
    }

    async fn export_private(&self, handle: &Self::Handle) -> Result<PrivateScalar, ProviderError> {
        PrivateScalar::from_slice(handle.0.to_bytes().as_slice())
            .map_err(|e| anyhow::anyhow!("provider exported a malformed scalar: {}", e).into())
    }

    async fn export_public_point(
        &self,
        handle: &Self::Handle,
    ) -> Result<PublicPoint, ProviderError> {
        Self::encode_public(&handle.0.public_key())
    }

    async fn derive_shared_secret(
        &self,
        handle: &Self::Handle,
        remote: &PublicPoint,
    ) -> Result<SharedSecret, ProviderError> {
        let remote_key = PublicKey::from_sec1_bytes(remote.bytes())
            .map_err(|_| anyhow::anyhow!("remote point is not on the curve"))?;
        let shared = p521::ecdh::diffie_hellman(handle.0.to_nonzero_scalar(), remote_key.as_affine());
        SharedSecret::from_slice(shared.raw_secret_bytes().as_slice())
            .map_err(|e| anyhow::anyhow!("provider produced a malformed secret: {}", e).into())
    }
}
