use clap::{Args, Subcommand};

pub mod accept;

use crate::op::Op;

crate::command_enum! {
    (Accept, accept::Accept),
}

// Rename the generated Command to InviteCommand for clarity
pub type InviteCommand = Command;

#[derive(Args, Debug, Clone)]
pub struct Invite {
    #[command(subcommand)]
    pub command: InviteCommand,
}

#[async_trait::async_trait]
impl Op for Invite {
    type Error = OpError;
    type Output = OpOutput;

    async fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        self.command.execute(ctx).await
    }
}

/// Errors shared by the invite operations.
#[derive(Debug, thiserror::Error)]
pub enum InviteOpError {
    #[error("{0}")]
    State(#[from] crate::state::StateError),
    #[error("{0}")]
    Vault(#[from] common::vault::VaultError),
    #[error("{0}")]
    Link(#[from] common::vault::InviteError),
}
