use std::path::PathBuf;

/// A single CLI operation
///
/// Each op declares its own error and output types; dispatch happens in
/// [`crate::args::Command`].
#[async_trait::async_trait]
pub trait Op {
    type Error: std::error::Error + Send + Sync + 'static;
    type Output: std::fmt::Display;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error>;
}

/// Shared context handed to every op
pub struct OpContext {
    /// Custom state directory, when the default ~/.seedkey is overridden
    pub config_path: Option<PathBuf>,
}

impl OpContext {
    pub fn new(config_path: Option<PathBuf>) -> Self {
        OpContext { config_path }
    }
}
