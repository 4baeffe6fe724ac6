use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::op::{Op, OpContext};
use crate::ops::{Combine, Derive, Init, Share, Version};

#[derive(Parser, Debug)]
#[command(
    name = "seedkey",
    about = "Deterministic P-521 key pairs with shareable public-key URLs",
    version
)]
pub struct Args {
    /// Path to the seedkey state directory (default: ~/.seedkey)
    #[arg(long, global = true)]
    pub config_path: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Initialize the seedkey state directory
    Init(Init),
    /// Derive a key pair from a seed and cache its container
    Derive(Derive),
    /// Print the share URL for the local public key
    Share(Share),
    /// Combine a remote share token with the local key
    Combine(Combine),
    /// Print version information
    Version(Version),
}

impl Command {
    pub async fn execute(&self, ctx: &OpContext) -> Result<String, anyhow::Error> {
        match self {
            Command::Init(op) => Ok(op.execute(ctx).await?.to_string()),
            Command::Derive(op) => Ok(op.execute(ctx).await?.to_string()),
            Command::Share(op) => Ok(op.execute(ctx).await?.to_string()),
            Command::Combine(op) => Ok(op.execute(ctx).await?.to_string()),
            Command::Version(op) => Ok(op.execute(ctx).await?.to_string()),
        }
    }
}
