use clap::Args;
use common::vault::{ItemId, Principal};

use super::{find_item, ItemOpError};

/// Share an item. Access is granted on the item's folder, so a grant covers
/// every item in it.
#[derive(Args, Debug, Clone)]
pub struct Share {
    /// Item id
    pub id: ItemId,

    /// Permission to offer: reader or writer
    #[arg(long, default_value = "reader")]
    pub permission: String,

    /// Grant the permission to this principal right away
    #[arg(long)]
    pub principal: Option<String>,
}

#[async_trait::async_trait]
impl crate::op::Op for Share {
    type Error = ItemOpError;
    type Output = String;

    async fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let (state, vault) = ctx.vault().await?;
        let item = find_item(&vault, &self.id).await?;

        let invite = vault.create_invite(item.id, &self.permission).await?;
        let mut output = format!("Invite link for {}: {}", item.name, invite);

        if let Some(principal) = &self.principal {
            let held = vault
                .grant(item.id, Principal::new(principal.as_str()), &self.permission)
                .await?;
            state.persist(&vault)?;
            output.push_str(&format!("\nGranted {} {} access", principal, held));
        }

        Ok(output)
    }
}
