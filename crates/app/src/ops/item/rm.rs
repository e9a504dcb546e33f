use clap::Args;
use common::vault::ItemId;

use super::{find_item, ItemOpError};

#[derive(Args, Debug, Clone)]
pub struct Rm {
    /// Item id
    pub id: ItemId,
}

#[async_trait::async_trait]
impl crate::op::Op for Rm {
    type Error = ItemOpError;
    type Output = String;

    async fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let (state, vault) = ctx.vault().await?;
        let item = find_item(&vault, &self.id).await?;

        vault.delete_item(&item).await?;
        state.persist(&vault)?;

        Ok(format!("Deleted item {} ({})", item.name, item.id))
    }
}
