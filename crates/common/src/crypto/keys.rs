//! Raw P-521 key material
//!
//! Fixed-size newtypes for the byte forms that move between the seed
//! expander, the container builder, and the host provider. The constructors
//! validate sizes (and the uncompressed-point marker) so that malformed
//! curve output can never reach the container builder: a [`PrivateScalar`]
//! or [`PublicPoint`] that exists is well-formed by construction.

use std::ops::Deref;

/// Size of a P-521 private scalar in bytes (the curve order's byte length)
pub const PRIVATE_SCALAR_SIZE: usize = 66;
/// Size of an uncompressed P-521 public point in bytes: `0x04` marker
/// followed by two 66-byte coordinates
pub const PUBLIC_POINT_SIZE: usize = 133;
/// Size of a P-521 ECDH shared secret in bytes (the x-coordinate)
pub const SHARED_SECRET_SIZE: usize = 66;

/// SEC1 marker byte for an uncompressed point encoding
pub const UNCOMPRESSED_POINT_TAG: u8 = 0x04;

/// Errors that can occur while constructing raw key material
#[derive(Debug, thiserror::Error)]
pub enum KeyError {
    #[error("invalid private scalar size, expected {PRIVATE_SCALAR_SIZE}, got {0}")]
    InvalidScalarSize(usize),
    #[error("invalid public point size, expected {PUBLIC_POINT_SIZE}, got {0}")]
    InvalidPointSize(usize),
    #[error("public point is not in uncompressed form (leading byte {0:#04x}, expected 0x04)")]
    InvalidPointMarker(u8),
    #[error("invalid shared secret size, expected {SHARED_SECRET_SIZE}, got {0}")]
    InvalidSecretSize(usize),
}

/// A raw P-521 private scalar
///
/// Owned by the deriver during construction, then consumed into a container
/// or a provider handle and dropped. Never persisted on its own.
#[derive(Clone, PartialEq, Eq)]
pub struct PrivateScalar([u8; PRIVATE_SCALAR_SIZE]);

// Debug deliberately omits the scalar bytes.
impl std::fmt::Debug for PrivateScalar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PrivateScalar(..)")
    }
}

impl Deref for PrivateScalar {
    type Target = [u8; PRIVATE_SCALAR_SIZE];
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<[u8; PRIVATE_SCALAR_SIZE]> for PrivateScalar {
    fn from(bytes: [u8; PRIVATE_SCALAR_SIZE]) -> Self {
        PrivateScalar(bytes)
    }
}

impl PrivateScalar {
    /// Create a private scalar from a byte slice
    ///
    /// # Errors
    ///
    /// Returns an error if the slice is not exactly `PRIVATE_SCALAR_SIZE`
    /// bytes long.
    pub fn from_slice(data: &[u8]) -> Result<Self, KeyError> {
        if data.len() != PRIVATE_SCALAR_SIZE {
            return Err(KeyError::InvalidScalarSize(data.len()));
        }
        let mut buff = [0; PRIVATE_SCALAR_SIZE];
        buff.copy_from_slice(data);
        Ok(buff.into())
    }

    /// Get a reference to the raw scalar bytes
    pub fn bytes(&self) -> &[u8] {
        self.0.as_ref()
    }
}

/// An uncompressed P-521 public point
///
/// Invariant: exactly 133 bytes, first byte `0x04`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicPoint([u8; PUBLIC_POINT_SIZE]);

impl Deref for PublicPoint {
    type Target = [u8; PUBLIC_POINT_SIZE];
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl TryFrom<&[u8]> for PublicPoint {
    type Error = KeyError;
    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        PublicPoint::from_slice(bytes)
    }
}

impl PublicPoint {
    /// Create a public point from a byte slice
    ///
    /// # Errors
    ///
    /// Returns an error if the slice is not exactly `PUBLIC_POINT_SIZE`
    /// bytes long, or if the leading byte is not the uncompressed-point
    /// marker `0x04`.
    pub fn from_slice(data: &[u8]) -> Result<Self, KeyError> {
        if data.len() != PUBLIC_POINT_SIZE {
            return Err(KeyError::InvalidPointSize(data.len()));
        }
        if data[0] != UNCOMPRESSED_POINT_TAG {
            return Err(KeyError::InvalidPointMarker(data[0]));
        }
        let mut buff = [0; PUBLIC_POINT_SIZE];
        buff.copy_from_slice(data);
        Ok(PublicPoint(buff))
    }

    /// Get a reference to the raw point bytes
    pub fn bytes(&self) -> &[u8] {
        self.0.as_ref()
    }

    /// Convert the point to a hexadecimal string
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

/// An ECDH shared secret
///
/// Ephemeral: produced by combining the local private key with a remote
/// public point, consumed immediately by the caller, and dropped.
#[derive(Clone, PartialEq, Eq)]
pub struct SharedSecret([u8; SHARED_SECRET_SIZE]);

impl std::fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SharedSecret(..)")
    }
}

impl Deref for SharedSecret {
    type Target = [u8; SHARED_SECRET_SIZE];
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<[u8; SHARED_SECRET_SIZE]> for SharedSecret {
    fn from(bytes: [u8; SHARED_SECRET_SIZE]) -> Self {
        SharedSecret(bytes)
    }
}

impl SharedSecret {
    /// Create a shared secret from a byte slice
    ///
    /// # Errors
    ///
    /// Returns an error if the slice is not exactly `SHARED_SECRET_SIZE`
    /// bytes long.
    pub fn from_slice(data: &[u8]) -> Result<Self, KeyError> {
        if data.len() != SHARED_SECRET_SIZE {
            return Err(KeyError::InvalidSecretSize(data.len()));
        }
        let mut buff = [0; SHARED_SECRET_SIZE];
        buff.copy_from_slice(data);
        Ok(buff.into())
    }

    /// Get a reference to the raw secret bytes
    pub fn bytes(&self) -> &[u8] {
        self.0.as_ref()
    }
}
