use clap::Args;
use common::vault::ItemDraft;

use super::{folder_id, ItemOpError};

#[derive(Args, Debug, Clone)]
pub struct Add {
    /// Folder to save the item in
    #[arg(long)]
    pub folder: Option<String>,

    /// Item name
    #[arg(long, default_value = "")]
    pub name: String,

    /// Password, at least 8 characters
    #[arg(long, default_value = "")]
    pub password: String,

    #[arg(long)]
    pub username: Option<String>,

    /// Site address, starting with http:// or https://
    #[arg(long)]
    pub uri: Option<String>,

    /// CSS selector of the username input on the site
    #[arg(long)]
    pub username_selector: Option<String>,

    /// CSS selector of the password input on the site
    #[arg(long)]
    pub password_selector: Option<String>,
}

#[async_trait::async_trait]
impl crate::op::Op for Add {
    type Error = ItemOpError;
    type Output = String;

    async fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let (state, vault) = ctx.vault().await?;

        let folder = match &self.folder {
            Some(name) => Some(folder_id(&vault, name).await?),
            None => None,
        };

        let draft = ItemDraft {
            name: self.name.clone(),
            username: self.username.clone(),
            username_input_selector: self.username_selector.clone(),
            password: self.password.clone(),
            password_input_selector: self.password_selector.clone(),
            uri: self.uri.clone(),
            folder,
        };

        let item = vault.save_item(draft).await?;
        state.persist(&vault)?;

        Ok(format!("Saved item {} ({})", item.name, item.id))
    }
}
