//! Share token encoding for public key exchange
//!
//! The local public point travels out-of-band as a fixed-length hex token in
//! the `pub` query parameter of a sharing URL. Validation is strict and runs
//! before any cryptographic use: exactly 266 characters, every one of them
//! ASCII hex. Mixed case is accepted; whitespace, prefixes, and anything
//! else are not. A token that fails validation never reaches the ECDH step.

use serde::{Deserialize, Serialize};
use url::Url;

use super::keys::{KeyError, PublicPoint, PUBLIC_POINT_SIZE};

/// Length of a share token in characters (two hex digits per point byte)
pub const SHARE_TOKEN_LEN: usize = 2 * PUBLIC_POINT_SIZE;

/// Query parameter carrying the token in a sharing URL
pub const SHARE_URL_PARAM: &str = "pub";

/// Errors that can occur while validating a share token
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("invalid share token length, expected {SHARE_TOKEN_LEN} characters, got {0}")]
    InvalidLength(usize),
    #[error("share token contains a non-hex character at position {0}")]
    InvalidCharacter(usize),
    #[error("share URL has no '{SHARE_URL_PARAM}' parameter")]
    MissingParam,
    #[error("not a valid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("decoded token is not a valid public point: {0}")]
    InvalidPoint(#[from] KeyError),
}

/// The hexadecimal text form of a public point
///
/// Always produced lowercase; decoding tolerates mixed case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ShareToken(String);

impl std::fmt::Display for ShareToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<ShareToken> for String {
    fn from(token: ShareToken) -> String {
        token.0
    }
}

impl TryFrom<String> for ShareToken {
    type Error = TokenError;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::validate(&value)?;
        Ok(ShareToken(value))
    }
}

impl ShareToken {
    /// Encode a public point as a 266-character hex token
    pub fn encode(point: &PublicPoint) -> Self {
        ShareToken(point.to_hex())
    }

    /// Validate and decode a token back into a public point
    ///
    /// No trimming and no partial acceptance: the input must be exactly
    /// [`SHARE_TOKEN_LEN`] ASCII hex characters.
    ///
    /// # Errors
    ///
    /// Returns a [`TokenError`] describing the first violated invariant.
    pub fn decode(token: &str) -> Result<PublicPoint, TokenError> {
        Self::validate(token)?;
        let bytes = hex::decode(token)
            .map_err(|_| TokenError::InvalidCharacter(0))?;
        Ok(PublicPoint::from_slice(&bytes)?)
    }

    /// Check the token invariants without decoding
    ///
    /// # Errors
    ///
    /// Returns a [`TokenError`] if the length or charset invariant fails.
    pub fn validate(token: &str) -> Result<(), TokenError> {
        if token.len() != SHARE_TOKEN_LEN {
            return Err(TokenError::InvalidLength(token.len()));
        }
        if let Some(pos) = token.bytes().position(|b| !b.is_ascii_hexdigit()) {
            return Err(TokenError::InvalidCharacter(pos));
        }
        Ok(())
    }

    /// Build a sharing URL carrying this token in the `pub` parameter
    pub fn to_share_url(&self, base: &Url) -> Url {
        let mut url = base.clone();
        url.query_pairs_mut()
            .clear()
            .append_pair(SHARE_URL_PARAM, &self.0);
        url
    }

    /// Extract and decode the `pub` parameter from a pasted sharing URL
    ///
    /// # Errors
    ///
    /// Returns a [`TokenError`] if the URL does not parse, carries no `pub`
    /// parameter, or carries one that fails validation.
    pub fn from_share_url(raw: &str) -> Result<PublicPoint, TokenError> {
        let url = Url::parse(raw)?;
        let token = url
            .query_pairs()
            .find(|(name, _)| name == SHARE_URL_PARAM)
            .map(|(_, value)| value.into_owned())
            .ok_or(TokenError::MissingParam)?;
        Self::decode(&token)
    }

    /// The token text
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
