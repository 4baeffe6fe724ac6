use clap::Args;
use common::crypto::{
    DerivationError, KeyContext, P521Provider, ShareError, ShareToken, TokenError,
};
use sha2::{Digest, Sha256};

use crate::state::AppState;

#[derive(Args, Debug, Clone)]
pub struct Combine {
    /// The remote party's 266-character hex share token
    #[arg(long, conflicts_with = "url")]
    pub token: Option<String>,

    /// A full share URL carrying the token in its 'pub' parameter
    #[arg(long)]
    pub url: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum CombineError {
    #[error("provide either --token or --url")]
    NoTokenSource,
    #[error("state error: {0}")]
    State(#[from] crate::state::StateError),
    #[error("invalid share token: {0}")]
    Token(#[from] TokenError),
    #[error("cached key container rejected: {0}")]
    Import(#[from] DerivationError),
    #[error("{0}")]
    Share(#[from] ShareError),
}

#[async_trait::async_trait]
impl crate::op::Op for Combine {
    type Error = CombineError;
    type Output = String;

    async fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let state = AppState::load(ctx.config_path.clone())?;

        // Validate the remote token before touching any key material
        let remote = match (&self.token, &self.url) {
            (Some(token), _) => ShareToken::decode(token)?,
            (None, Some(url)) => ShareToken::from_share_url(url)?,
            (None, None) => return Err(CombineError::NoTokenSource),
        };

        let mut key_ctx = KeyContext::new(P521Provider::new());
        if let Some(document) = state.load_document()? {
            key_ctx.import(document).await?;
        }

        // MissingKey when no local key has been derived yet
        let secret = key_ctx.combine(&remote).await?;

        // The raw secret stays in-process; print a fingerprint both
        // parties can compare
        let fingerprint = hex::encode(Sha256::digest(secret.bytes()));

        Ok(format!("Shared secret fingerprint: {}", fingerprint))
    }
}
