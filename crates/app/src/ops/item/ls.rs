use std::collections::HashMap;

use clap::Args;

use super::ItemOpError;

#[derive(Args, Debug, Clone)]
pub struct Ls {
    /// Only list items in this folder
    #[arg(long)]
    pub folder: Option<String>,

    /// Show passwords
    #[arg(long)]
    pub reveal: bool,
}

#[async_trait::async_trait]
impl crate::op::Op for Ls {
    type Error = ItemOpError;
    type Output = String;

    async fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let (_, vault) = ctx.vault().await?;

        let folder_names: HashMap<_, _> = vault
            .folders()
            .await?
            .into_iter()
            .map(|folder| (*folder.id(), folder.name().to_string()))
            .collect();
        let items = vault.items_in(self.folder.as_deref()).await?;

        if items.is_empty() {
            return Ok("No items".to_string());
        }

        let lines: Vec<_> = items
            .iter()
            .map(|item| {
                let mut line = format!(
                    "{}  {}  {}  {}  {}",
                    item.id,
                    folder_names
                        .get(&item.folder)
                        .map(String::as_str)
                        .unwrap_or("?"),
                    item.name,
                    item.username.as_deref().unwrap_or("-"),
                    item.uri.as_deref().unwrap_or("-"),
                );
                if self.reveal {
                    line.push_str("  ");
                    line.push_str(&item.password);
                }
                line
            })
            .collect();
        Ok(lines.join("\n"))
    }
}
