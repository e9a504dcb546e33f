use clap::Args;
use common::vault::VaultError;

use super::FolderOpError;

#[derive(Args, Debug, Clone)]
pub struct Members {
    /// Folder name
    pub name: String,
}

#[async_trait::async_trait]
impl crate::op::Op for Members {
    type Error = FolderOpError;
    type Output = String;

    async fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let (_, vault) = ctx.vault().await?;
        let folder = vault
            .folder_by_name(&self.name)
            .await?
            .ok_or_else(|| VaultError::FolderNotFound(self.name.clone()))?;

        let members = vault.shared_principals(*folder.id()).await?;
        let lines: Vec<_> = members
            .iter()
            .map(|member| format!("{}  {}", member.principal, member.permission))
            .collect();
        Ok(lines.join("\n"))
    }
}
