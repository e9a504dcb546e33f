use std::{fs, path::PathBuf};

use common::prelude::{MemoryVaultStore, Snapshot, Vault, VaultError};
use common::session::DEFAULT_EMAIL;
use common::vault::{Account, InviteError, InviteIssuer, Principal, DEFAULT_INVITE_BASE};
use serde::{Deserialize, Serialize};

pub const APP_NAME: &str = "coffer";
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const ACCOUNT_FILE_NAME: &str = "account.json";
pub const STORE_FILE_NAME: &str = "vault.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Identity the vault acts as
    #[serde(default = "default_principal")]
    pub principal: String,
    /// Display name for the account profile
    #[serde(default)]
    pub display_name: String,
    /// Base url invite links are minted under
    #[serde(default = "default_invite_base_url")]
    pub invite_base_url: String,
    /// Default log level, overridden by RUST_LOG
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Directory for daily rolling log files (optional, stderr only if unset)
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
    /// Vault snapshot to work on. Accounts pointing at the same file share
    /// one vault store (default: vault.json in the coffer directory)
    #[serde(default)]
    pub vault_path: Option<PathBuf>,
}

fn default_principal() -> String {
    DEFAULT_EMAIL.to_string()
}

fn default_invite_base_url() -> String {
    DEFAULT_INVITE_BASE.to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            principal: default_principal(),
            display_name: String::new(),
            invite_base_url: default_invite_base_url(),
            log_level: default_log_level(),
            log_dir: None,
            vault_path: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    /// Path to the coffer directory (~/.coffer)
    pub coffer_dir: PathBuf,
    /// Path to the config file
    pub config_path: PathBuf,
    /// Path to the account record
    pub account_path: PathBuf,
    /// Path to the vault snapshot
    pub store_path: PathBuf,
    /// Loaded configuration
    pub config: AppConfig,
    /// The account this directory belongs to
    pub account: Account,
}

impl AppState {
    fn store_path(coffer_dir: &std::path::Path, config: &AppConfig) -> PathBuf {
        config
            .vault_path
            .clone()
            .unwrap_or_else(|| coffer_dir.join(STORE_FILE_NAME))
    }

    /// Get the coffer directory path (custom or default ~/.coffer)
    pub fn coffer_dir(custom_path: Option<PathBuf>) -> Result<PathBuf, StateError> {
        if let Some(path) = custom_path {
            return Ok(path);
        }

        let home = dirs::home_dir().ok_or(StateError::NoHomeDirectory)?;
        Ok(home.join(format!(".{}", APP_NAME)))
    }

    /// Initialize a new coffer state directory with an empty vault snapshot
    pub fn init(
        custom_path: Option<PathBuf>,
        config: Option<AppConfig>,
    ) -> Result<Self, StateError> {
        let coffer_dir = Self::coffer_dir(custom_path)?;

        if coffer_dir.exists() {
            return Err(StateError::AlreadyInitialized);
        }

        let config = config.unwrap_or_default();
        // Reject a bad base before anything is written
        InviteIssuer::new(&config.invite_base_url)?;

        fs::create_dir_all(&coffer_dir)?;

        let config_path = coffer_dir.join(CONFIG_FILE_NAME);
        fs::write(&config_path, toml::to_string_pretty(&config)?)?;

        let account = Account::new(
            Principal::new(config.principal.clone()),
            config.display_name.clone(),
        );
        let account_path = coffer_dir.join(ACCOUNT_FILE_NAME);
        fs::write(&account_path, serde_json::to_string_pretty(&account)?)?;

        // an existing snapshot belongs to other accounts sharing it
        let store_path = Self::store_path(&coffer_dir, &config);
        if !store_path.exists() {
            fs::write(
                &store_path,
                serde_json::to_string_pretty(&Snapshot::default())?,
            )?;
        }

        Ok(Self {
            coffer_dir,
            config_path,
            account_path,
            store_path,
            config,
            account,
        })
    }

    /// Load existing state from the coffer directory
    pub fn load(custom_path: Option<PathBuf>) -> Result<Self, StateError> {
        let coffer_dir = Self::coffer_dir(custom_path)?;

        if !coffer_dir.exists() {
            return Err(StateError::NotInitialized);
        }

        let config_path = coffer_dir.join(CONFIG_FILE_NAME);
        let account_path = coffer_dir.join(ACCOUNT_FILE_NAME);

        for (path, name) in [
            (&config_path, CONFIG_FILE_NAME),
            (&account_path, ACCOUNT_FILE_NAME),
        ] {
            if !path.exists() {
                return Err(StateError::MissingFile(name.to_string()));
            }
        }

        let config: AppConfig = toml::from_str(&fs::read_to_string(&config_path)?)?;
        let account: Account = serde_json::from_str(&fs::read_to_string(&account_path)?)?;

        let store_path = Self::store_path(&coffer_dir, &config);
        if !store_path.exists() {
            return Err(StateError::MissingFile(store_path.display().to_string()));
        }

        Ok(Self {
            coffer_dir,
            config_path,
            account_path,
            store_path,
            config,
            account,
        })
    }

    pub fn issuer(&self) -> Result<InviteIssuer, StateError> {
        Ok(InviteIssuer::new(&self.config.invite_base_url)?)
    }

    /// Read the vault snapshot into a fresh in-memory store
    pub fn load_store(&self) -> Result<MemoryVaultStore, StateError> {
        let snapshot: Snapshot = serde_json::from_str(&fs::read_to_string(&self.store_path)?)?;
        Ok(MemoryVaultStore::from_snapshot(snapshot))
    }

    /// Write the store back to the snapshot file (via a temporary file
    /// renamed over the old one).
    pub fn save_store(&self, store: &MemoryVaultStore) -> Result<(), StateError> {
        let snapshot = store
            .snapshot()
            .map_err(|e| StateError::Store(e.to_string()))?;
        let tmp_path = self.store_path.with_extension("json.tmp");
        fs::write(&tmp_path, serde_json::to_string_pretty(&snapshot)?)?;
        fs::rename(&tmp_path, &self.store_path)?;
        tracing::debug!("saved vault snapshot to {}", self.store_path.display());
        Ok(())
    }

    /// Open this account's vault over the snapshot store
    pub async fn open_vault(&self) -> Result<Vault<MemoryVaultStore>, StateError> {
        let vault = Vault::open(self.load_store()?, self.account.clone())
            .await?
            .with_issuer(self.issuer()?);
        Ok(vault)
    }

    /// Persist whatever the vault changed
    pub fn persist(&self, vault: &Vault<MemoryVaultStore>) -> Result<(), StateError> {
        self.save_store(vault.store())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("coffer directory not initialized. Run 'coffer init' first")]
    NotInitialized,

    #[error("coffer directory already initialized")]
    AlreadyInitialized,

    #[error("no home directory found")]
    NoHomeDirectory,

    #[error("missing required file: {0}")]
    MissingFile(String),

    #[error("{0}")]
    InvalidInviteBase(#[from] InviteError),

    #[error("vault store error: {0}")]
    Store(String),

    #[error("vault error: {0}")]
    Vault(#[from] VaultError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn state_dir() -> (TempDir, PathBuf) {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("coffer");
        (temp, path)
    }

    #[test]
    fn test_init_then_load() {
        let (_temp, path) = state_dir();
        let config = AppConfig {
            principal: "alice@example.com".to_string(),
            display_name: "Alice".to_string(),
            ..Default::default()
        };

        let created = AppState::init(Some(path.clone()), Some(config.clone())).unwrap();
        let loaded = AppState::load(Some(path)).unwrap();

        assert_eq!(loaded.config, config);
        assert_eq!(loaded.account, created.account);
        assert_eq!(loaded.account.principal().as_str(), "alice@example.com");
    }

    #[test]
    fn test_init_twice() {
        let (_temp, path) = state_dir();
        AppState::init(Some(path.clone()), None).unwrap();
        assert!(matches!(
            AppState::init(Some(path), None),
            Err(StateError::AlreadyInitialized)
        ));
    }

    #[test]
    fn test_load_uninitialized() {
        let (_temp, path) = state_dir();
        assert!(matches!(
            AppState::load(Some(path)),
            Err(StateError::NotInitialized)
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let (_temp, path) = state_dir();
        let state = AppState::init(Some(path.clone()), None).unwrap();
        fs::remove_file(&state.store_path).unwrap();
        assert!(matches!(
            AppState::load(Some(path)),
            Err(StateError::MissingFile(name)) if name.ends_with(STORE_FILE_NAME)
        ));
    }

    #[test]
    fn test_init_rejects_bad_invite_base() {
        let (_temp, path) = state_dir();
        let config = AppConfig {
            invite_base_url: "not a url".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            AppState::init(Some(path.clone()), Some(config)),
            Err(StateError::InvalidInviteBase(_))
        ));
        assert!(!path.exists());
    }

    #[test]
    fn test_config_defaults_fill_missing_keys() {
        let config: AppConfig = toml::from_str("principal = \"bob@example.com\"").unwrap();
        assert_eq!(config.principal, "bob@example.com");
        assert_eq!(config.invite_base_url, DEFAULT_INVITE_BASE);
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_dir, None);
        assert_eq!(config.vault_path, None);
    }

    #[tokio::test]
    async fn test_accounts_share_a_vault_file() {
        let temp = TempDir::new().unwrap();
        let shared = temp.path().join("shared.json");
        let config = |principal: &str| AppConfig {
            principal: principal.to_string(),
            vault_path: Some(shared.clone()),
            ..Default::default()
        };

        let alice = AppState::init(Some(temp.path().join("alice")), Some(config("alice@example.com")))
            .unwrap();
        let vault = alice.open_vault().await.unwrap();
        vault.create_folder("Personal").await.unwrap();
        alice.persist(&vault).unwrap();

        // a second account must not reset the shared snapshot
        let bob = AppState::init(Some(temp.path().join("bob")), Some(config("bob@example.com")))
            .unwrap();
        assert_eq!(bob.store_path, shared);
        let snapshot = bob.load_store().unwrap().snapshot().unwrap();
        assert_eq!(snapshot.roots.len(), 1);
        assert_eq!(snapshot.folder_lists[0].len(), 1);
    }

    #[tokio::test]
    async fn test_vault_changes_persist() {
        let (_temp, path) = state_dir();
        let state = AppState::init(Some(path.clone()), None).unwrap();

        let vault = state.open_vault().await.unwrap();
        vault.create_folder("Personal").await.unwrap();
        state.persist(&vault).unwrap();

        let reloaded = AppState::load(Some(path)).unwrap();
        let vault = reloaded.open_vault().await.unwrap();
        let folders = vault.folders().await.unwrap();
        assert_eq!(folders.len(), 1);
        assert_eq!(folders[0].name(), "Personal");
    }
}
