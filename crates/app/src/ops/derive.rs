use std::path::PathBuf;

use clap::Args;
use common::crypto::{DerivationError, KeyContext, P521Provider, Seed};
use tracing::info;

use crate::state::AppState;

#[derive(Args, Debug, Clone)]
pub struct Derive {
    /// Passphrase to expand into the key pair
    #[arg(long, conflicts_with = "seed_file")]
    pub passphrase: Option<String>,

    /// Read the seed bytes from a file instead of a passphrase
    #[arg(long)]
    pub seed_file: Option<PathBuf>,
}

#[derive(Debug, thiserror::Error)]
pub enum DeriveError {
    #[error("provide either --passphrase or --seed-file")]
    NoSeedSource,
    #[error("state error: {0}")]
    State(#[from] crate::state::StateError),
    #[error("failed to read seed file: {0}")]
    SeedFile(std::io::Error),
    #[error("derivation failed: {0}")]
    Derivation(#[from] DerivationError),
}

impl Derive {
    fn seed(&self) -> Result<Seed, DeriveError> {
        if let Some(passphrase) = &self.passphrase {
            return Ok(Seed::from_passphrase(passphrase));
        }
        if let Some(path) = &self.seed_file {
            let bytes = std::fs::read(path).map_err(DeriveError::SeedFile)?;
            return Ok(Seed::from_bytes(bytes));
        }
        Err(DeriveError::NoSeedSource)
    }
}

#[async_trait::async_trait]
impl crate::op::Op for Derive {
    type Error = DeriveError;
    type Output = String;

    async fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let state = AppState::load(ctx.config_path.clone())?;
        let seed = self.seed()?;

        let mut key_ctx = KeyContext::new(P521Provider::new());
        let session = key_ctx.derive(&seed).await?;
        info!("derived and verified key pair");

        state.save_document(session.document())?;

        let token = session.share_token();
        let share_url = token.to_share_url(&state.config.share_base_url);

        let output = format!(
            "Derived key pair (container verified, {} bytes)\n\
             - Key container: {}\n\
             - Share URL: {}",
            session.document().len(),
            state.key_path.display(),
            share_url,
        );

        Ok(output)
    }
}
