use clap::{Args, Subcommand};
use common::prelude::{MemoryVaultStore, Vault};
use common::vault::{FolderId, ItemId, PasswordItem, VaultError};

pub mod add;
pub mod edit;
pub mod ls;
pub mod rm;
pub mod share;

use crate::op::Op;

crate::command_enum! {
    (Add, add::Add),
    (Ls, ls::Ls),
    (Edit, edit::Edit),
    (Rm, rm::Rm),
    (Share, share::Share),
}

// Rename the generated Command to ItemCommand for clarity
pub type ItemCommand = Command;

#[derive(Args, Debug, Clone)]
pub struct Item {
    #[command(subcommand)]
    pub command: ItemCommand,
}

#[async_trait::async_trait]
impl Op for Item {
    type Error = OpError;
    type Output = OpOutput;

    async fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        self.command.execute(ctx).await
    }
}

/// Errors shared by the item operations.
#[derive(Debug, thiserror::Error)]
pub enum ItemOpError {
    #[error("{0}")]
    State(#[from] crate::state::StateError),
    #[error("{0}")]
    Vault(#[from] VaultError),
}

/// Look up an item by id, deleted ones included.
async fn find_item(
    vault: &Vault<MemoryVaultStore>,
    id: &ItemId,
) -> Result<PasswordItem, VaultError> {
    vault
        .item(id)
        .await?
        .ok_or_else(|| VaultError::ItemNotFound(id.to_string()))
}

/// Resolve a folder name to its id.
async fn folder_id(vault: &Vault<MemoryVaultStore>, name: &str) -> Result<FolderId, VaultError> {
    vault
        .folder_by_name(name)
        .await?
        .map(|folder| *folder.id())
        .ok_or_else(|| VaultError::FolderNotFound(name.to_string()))
}
