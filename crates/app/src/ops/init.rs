use clap::Args;
use url::Url;

use crate::state::{AppConfig, AppState};

#[derive(Args, Debug, Clone)]
pub struct Init {
    /// Base URL used when building share links
    #[arg(long)]
    pub share_base_url: Option<Url>,
}

#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("init failed: {0}")]
    StateFailed(#[from] crate::state::StateError),
}

#[async_trait::async_trait]
impl crate::op::Op for Init {
    type Error = InitError;
    type Output = String;

    async fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let config = self.share_base_url.clone().map(|share_base_url| AppConfig {
            share_base_url,
        });

        let state = AppState::init(ctx.config_path.clone(), config)?;

        let output = format!(
            "Initialized seedkey directory at: {}\n\
             - Config: {}\n\
             - Share base URL: {}\n\
             - Key container: {} (created by 'seedkey derive')",
            state.seedkey_dir.display(),
            state.config_path.display(),
            state.config.share_base_url,
            state.key_path.display(),
        );

        Ok(output)
    }
}
