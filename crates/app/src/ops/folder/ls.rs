use clap::Args;

use super::FolderOpError;

#[derive(Args, Debug, Clone)]
pub struct Ls;

#[async_trait::async_trait]
impl crate::op::Op for Ls {
    type Error = FolderOpError;
    type Output = String;

    async fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let (_, vault) = ctx.vault().await?;
        let folders = vault.folders().await?;

        if folders.is_empty() {
            return Ok("No folders".to_string());
        }

        let mut lines = Vec::with_capacity(folders.len());
        for folder in folders {
            let count = vault.items(folder.id()).await?.len();
            lines.push(format!("{}  {}  ({} items)", folder.id(), folder.name(), count));
        }
        Ok(lines.join("\n"))
    }
}
