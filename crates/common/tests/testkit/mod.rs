//! Shared test utilities: instrumented providers wrapping the real one
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use common::crypto::{
    KeyProvider, P521Provider, Pkcs8Document, PrivateScalar, ProviderError, PublicPoint,
    SharedSecret,
};

/// Wraps the real provider and counts every call that reaches it
#[derive(Default)]
pub struct CountingProvider {
    inner: P521Provider,
    calls: AtomicUsize,
}

impl CountingProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl KeyProvider for CountingProvider {
    type Handle = <P521Provider as KeyProvider>::Handle;

    async fn derive_public_point(
        &self,
        scalar: &PrivateScalar,
    ) -> Result<PublicPoint, ProviderError> {
        self.record();
        self.inner.derive_public_point(scalar).await
    }

    async fn import_pkcs8(&self, document: &Pkcs8Document) -> Result<Self::Handle, ProviderError> {
        self.record();
        self.inner.import_pkcs8(document).await
    }

    async fn export_private(&self, handle: &Self::Handle) -> Result<PrivateScalar, ProviderError> {
        self.record();
        self.inner.export_private(handle).await
    }

    async fn export_public_point(
        &self,
        handle: &Self::Handle,
    ) -> Result<PublicPoint, ProviderError> {
        self.record();
        self.inner.export_public_point(handle).await
    }

    async fn derive_shared_secret(
        &self,
        handle: &Self::Handle,
        remote: &PublicPoint,
    ) -> Result<SharedSecret, ProviderError> {
        self.record();
        self.inner.derive_shared_secret(handle, remote).await
    }
}

/// Wraps the real provider but flips one byte inside the private-key field
/// of every container it imports, simulating a host whose decoder disagrees
/// with the builder
#[derive(Default)]
pub struct CorruptingProvider {
    inner: P521Provider,
}

impl CorruptingProvider {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Offset of a byte inside the embedded private scalar (scalar starts at 35)
const CORRUPT_OFFSET: usize = 45;

#[async_trait]
impl KeyProvider for CorruptingProvider {
    type Handle = <P521Provider as KeyProvider>::Handle;

    async fn derive_public_point(
        &self,
        scalar: &PrivateScalar,
    ) -> Result<PublicPoint, ProviderError> {
        self.inner.derive_public_point(scalar).await
    }

    async fn import_pkcs8(&self, document: &Pkcs8Document) -> Result<Self::Handle, ProviderError> {
        let mut bytes = document.bytes().to_vec();
        bytes[CORRUPT_OFFSET] ^= 0x01;
        let corrupted = Pkcs8Document::from_der(bytes)
            .map_err(|e| anyhow::anyhow!("corrupted container did not parse: {}", e))?;
        self.inner.import_pkcs8(&corrupted).await
    }

    async fn export_private(&self, handle: &Self::Handle) -> Result<PrivateScalar, ProviderError> {
        self.inner.export_private(handle).await
    }

    async fn export_public_point(
        &self,
        handle: &Self::Handle,
    ) -> Result<PublicPoint, ProviderError> {
        self.inner.export_public_point(handle).await
    }

    async fn derive_shared_secret(
        &self,
        handle: &Self::Handle,
        remote: &PublicPoint,
    ) -> Result<SharedSecret, ProviderError> {
        self.inner.derive_shared_secret(handle, remote).await
    }
}
