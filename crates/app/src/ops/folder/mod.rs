use clap::{Args, Subcommand};

pub mod create;
pub mod ls;
pub mod members;
pub mod share;

use crate::op::Op;

crate::command_enum! {
    (Create, create::Create),
    (Ls, ls::Ls),
    (Share, share::Share),
    (Members, members::Members),
}

// Rename the generated Command to FolderCommand for clarity
pub type FolderCommand = Command;

#[derive(Args, Debug, Clone)]
pub struct Folder {
    #[command(subcommand)]
    pub command: FolderCommand,
}

#[async_trait::async_trait]
impl Op for Folder {
    type Error = OpError;
    type Output = OpOutput;

    async fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        self.command.execute(ctx).await
    }
}

/// Errors shared by the folder operations.
#[derive(Debug, thiserror::Error)]
pub enum FolderOpError {
    #[error("{0}")]
    State(#[from] crate::state::StateError),
    #[error("{0}")]
    Vault(#[from] common::vault::VaultError),
}
