use clap::Args;

use super::FolderOpError;

#[derive(Args, Debug, Clone)]
pub struct Create {
    /// Folder name, unique within the vault (case-sensitive)
    pub name: String,
}

#[async_trait::async_trait]
impl crate::op::Op for Create {
    type Error = FolderOpError;
    type Output = String;

    async fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let (state, vault) = ctx.vault().await?;
        let folder = vault.create_folder(&self.name).await?;
        state.persist(&vault)?;

        Ok(format!("Created folder {} ({})", folder.name(), folder.id()))
    }
}
