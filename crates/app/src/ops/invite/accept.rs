use clap::Args;
use common::vault::{Invite, InviteTarget, VaultError};

use super::InviteOpError;

/// Accept an invite link as this account's principal.
///
/// The shared folder shows up next to the account's own folders afterwards.
#[derive(Args, Debug, Clone)]
pub struct Accept {
    /// Invite link, as printed by `folder share` or `item share`
    pub link: String,
}

#[async_trait::async_trait]
impl crate::op::Op for Accept {
    type Error = InviteOpError;
    type Output = String;

    async fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let invite = Invite::parse(&self.link)?;
        let (state, vault) = ctx.vault().await?;

        let held = vault.redeem(&invite).await?;
        state.persist(&vault)?;

        let folder = match invite.target() {
            InviteTarget::Folder(id) => *id,
            InviteTarget::Item(id) => {
                vault
                    .item(id)
                    .await?
                    .ok_or_else(|| VaultError::ItemNotFound(id.to_string()))?
                    .folder
            }
        };
        let folder = vault
            .folder(&folder)
            .await?
            .ok_or_else(|| VaultError::FolderNotFound(folder.to_string()))?;

        Ok(format!("Joined folder {} as {}", folder.name(), held))
    }
}
