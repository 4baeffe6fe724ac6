use clap::Args;
use common::crypto::{DerivationError, KeyContext, P521Provider, ShareError};

use crate::state::AppState;

#[derive(Args, Debug, Clone)]
pub struct Share {}

#[derive(Debug, thiserror::Error)]
pub enum ShareOpError {
    #[error("state error: {0}")]
    State(#[from] crate::state::StateError),
    #[error("cached key container rejected: {0}")]
    Import(#[from] DerivationError),
    #[error("{0}")]
    Share(#[from] ShareError),
}

#[async_trait::async_trait]
impl crate::op::Op for Share {
    type Error = ShareOpError;
    type Output = String;

    async fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let state = AppState::load(ctx.config_path.clone())?;

        let mut key_ctx = KeyContext::new(P521Provider::new());
        if let Some(document) = state.load_document()? {
            key_ctx.import(document).await?;
        }

        // MissingKey when no container has been derived yet
        let token = key_ctx.share_token()?;
        let share_url = token.to_share_url(&state.config.share_base_url);

        Ok(format!("Share URL: {}", share_url))
    }
}
