pub use clap::Parser;

use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "coffer")]
#[command(about = "Shared password folders with reader/writer access")]
pub struct Args {
    /// Path to the coffer config directory (defaults to ~/.coffer)
    #[arg(long, global = true)]
    pub config_path: Option<PathBuf>,

    #[command(subcommand)]
    pub command: crate::Command,
}
