use std::path::PathBuf;

use clap::Args;
use common::session::DEFAULT_EMAIL;
use common::vault::DEFAULT_INVITE_BASE;

use crate::state::{AppConfig, AppState};

#[derive(Args, Debug, Clone)]
pub struct Init {
    /// Identity the vault acts as (default: user@example.com)
    #[arg(long, default_value = DEFAULT_EMAIL)]
    pub principal: String,

    /// Display name for the account
    #[arg(long, default_value = "")]
    pub name: String,

    /// Base url for invite links (default: https://example.com)
    #[arg(long, default_value = DEFAULT_INVITE_BASE)]
    pub invite_base_url: String,

    /// Default log level (RUST_LOG takes precedence)
    #[arg(long, default_value = "warn")]
    pub log_level: String,

    /// Directory for daily rolling log files
    #[arg(long)]
    pub log_dir: Option<PathBuf>,

    /// Vault snapshot to use, possibly shared with other accounts
    #[arg(long)]
    pub vault_path: Option<PathBuf>,
}

#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("init failed: {0}")]
    StateFailed(#[from] crate::state::StateError),
}

#[async_trait::async_trait]
impl crate::op::Op for Init {
    type Error = InitError;
    type Output = String;

    async fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let config = AppConfig {
            principal: self.principal.clone(),
            display_name: self.name.clone(),
            invite_base_url: self.invite_base_url.clone(),
            log_level: self.log_level.clone(),
            log_dir: self.log_dir.clone(),
            vault_path: self.vault_path.clone(),
        };

        let state = AppState::init(ctx.config_path.clone(), Some(config))?;

        // Create the account's root up front
        let vault = state.open_vault().await?;
        state.persist(&vault)?;

        let log_dir = match &state.config.log_dir {
            Some(dir) => dir.display().to_string(),
            None => "none (stderr only)".to_string(),
        };

        let output = format!(
            "Initialized coffer directory at: {}\n\
             - Principal: {}\n\
             - Account: {}\n\
             - Vault: {}\n\
             - Config: {}\n\
             - Invite base url: {}\n\
             - Log directory: {}",
            state.coffer_dir.display(),
            state.account.principal(),
            state.account.id(),
            state.store_path.display(),
            state.config_path.display(),
            state.config.invite_base_url,
            log_dir
        );

        Ok(output)
    }
}
