use clap::Args;
use common::vault::{Principal, VaultError};

use super::FolderOpError;

#[derive(Args, Debug, Clone)]
pub struct Share {
    /// Folder name
    pub name: String,

    /// Permission to offer: reader or writer
    #[arg(long, default_value = "reader")]
    pub permission: String,

    /// Grant the permission to this principal right away
    #[arg(long)]
    pub principal: Option<String>,
}

#[async_trait::async_trait]
impl crate::op::Op for Share {
    type Error = FolderOpError;
    type Output = String;

    async fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let (state, vault) = ctx.vault().await?;
        let folder = vault
            .folder_by_name(&self.name)
            .await?
            .ok_or_else(|| VaultError::FolderNotFound(self.name.clone()))?;

        let invite = vault.create_invite(*folder.id(), &self.permission).await?;
        let mut output = format!("Invite link for {}: {}", folder.name(), invite);

        if let Some(principal) = &self.principal {
            let held = vault
                .grant(*folder.id(), Principal::new(principal.as_str()), &self.permission)
                .await?;
            state.persist(&vault)?;
            output.push_str(&format!("\nGranted {} {} access", principal, held));
        }

        Ok(output)
    }
}
