//! Round-trip verification of imported key handles
//!
//! A handle is only trusted after the provider has exported both components
//! back out and they byte-match the values the container was built from.
//! This is the safety gate that catches any asymmetry between the container
//! builder and the host's decoder before the key is ever used, instead of
//! letting a divergent key surface later as undecryptable data.

use tracing::warn;

use super::keys::{PrivateScalar, PublicPoint};
use super::provider::{KeyProvider, ProviderError};

/// A round-trip verification mismatch
///
/// The imported handle did not export back to the key material the
/// container was built from. The handle must be discarded; there is no
/// recovery for the attempt.
#[derive(Debug, thiserror::Error)]
pub enum KeyIntegrityError {
    #[error("imported key failed round-trip verification: private scalar mismatch")]
    PrivateMismatch,
    #[error("imported key failed round-trip verification: public point mismatch")]
    PublicMismatch,
}

/// Export both components of `handle` and compare byte-for-byte against the
/// expected raw values
///
/// Pure check with no mutation; idempotent, so callers may re-run it at any
/// time. Returns `Ok(true)` only on exact equality of both components.
///
/// # Errors
///
/// Returns a [`ProviderError`] if either export fails; a mismatch is
/// reported through the boolean, not as an error.
pub async fn verify_round_trip<P: KeyProvider>(
    provider: &P,
    handle: &P::Handle,
    expected_scalar: &PrivateScalar,
    expected_point: &PublicPoint,
) -> Result<bool, ProviderError> {
    let exported_scalar = provider.export_private(handle).await?;
    let exported_point = provider.export_public_point(handle).await?;

    if exported_scalar != *expected_scalar {
        warn!("round-trip verification failed: private scalar mismatch");
        return Ok(false);
    }
    if exported_point != *expected_point {
        warn!("round-trip verification failed: public point mismatch");
        return Ok(false);
    }
    Ok(true)
}

/// Like [`verify_round_trip`] but classifying the mismatch
///
/// Used by the deriver so a failed gate surfaces which component diverged.
pub(crate) async fn check_round_trip<P: KeyProvider>(
    provider: &P,
    handle: &P::Handle,
    expected_scalar: &PrivateScalar,
    expected_point: &PublicPoint,
) -> Result<Result<(), KeyIntegrityError>, ProviderError> {
    let exported_scalar = provider.export_private(handle).await?;
    if exported_scalar != *expected_scalar {
        return Ok(Err(KeyIntegrityError::PrivateMismatch));
    }
    let exported_point = provider.export_public_point(handle).await?;
    if exported_point != *expected_point {
        return Ok(Err(KeyIntegrityError::PublicMismatch));
    }
    Ok(Ok(()))
}
