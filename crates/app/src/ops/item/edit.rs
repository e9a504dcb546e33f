use clap::Args;
use common::vault::{ItemChanges, ItemId};

use super::{find_item, folder_id, ItemOpError};

/// Change some fields of an item. Pass an empty value to clear an optional
/// field.
#[derive(Args, Debug, Clone)]
pub struct Edit {
    /// Item id
    pub id: ItemId,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub password: Option<String>,

    #[arg(long)]
    pub username: Option<String>,

    #[arg(long)]
    pub uri: Option<String>,

    #[arg(long)]
    pub username_selector: Option<String>,

    #[arg(long)]
    pub password_selector: Option<String>,

    /// Move the item to this folder
    #[arg(long)]
    pub folder: Option<String>,
}

impl Edit {
    fn changes(&self) -> ItemChanges {
        let mut changes = ItemChanges::new();
        if let Some(name) = &self.name {
            changes = changes.name(name.as_str());
        }
        if let Some(password) = &self.password {
            changes = changes.password(password.as_str());
        }
        if let Some(username) = &self.username {
            changes = changes.username(Some(username.clone()));
        }
        if let Some(uri) = &self.uri {
            changes = changes.uri(Some(uri.clone()));
        }
        if let Some(selector) = &self.username_selector {
            changes = changes.username_input_selector(Some(selector.clone()));
        }
        if let Some(selector) = &self.password_selector {
            changes = changes.password_input_selector(Some(selector.clone()));
        }
        changes
    }
}

#[async_trait::async_trait]
impl crate::op::Op for Edit {
    type Error = ItemOpError;
    type Output = String;

    async fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let (state, vault) = ctx.vault().await?;
        let item = find_item(&vault, &self.id).await?;

        let mut changes = self.changes();
        if let Some(name) = &self.folder {
            changes = changes.folder(folder_id(&vault, name).await?);
        }
        if changes.is_empty() {
            return Ok("Nothing to change".to_string());
        }

        let fields = changes.fields().join(", ");
        let updated = vault.update_item(&item, changes).await?;
        state.persist(&vault)?;

        Ok(format!("Updated {} of item {}", fields, updated.id))
    }
}
