//! Shared test utilities for vault integration tests
#![allow(dead_code)]

use common::store::MemoryVaultStore;
use common::vault::{Account, Folder, ItemDraft, PasswordItem, Principal, Vault};

pub const OWNER: &str = "user@example.com";

/// Route vault logs to the test output. Set RUST_LOG to see them.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn account(principal: &str) -> Account {
    Account::new(Principal::new(principal), principal)
}

/// Set up a fresh vault for `OWNER` over an empty in-memory store.
pub async fn setup_vault() -> (Vault<MemoryVaultStore>, MemoryVaultStore) {
    init_tracing();
    let store = MemoryVaultStore::new();
    let vault = Vault::open(store.clone(), account(OWNER)).await.unwrap();
    (vault, store)
}

/// Open `principal`'s own vault over a store another account already uses.
pub async fn open_vault(store: &MemoryVaultStore, principal: &str) -> Vault<MemoryVaultStore> {
    Vault::open(store.clone(), account(principal)).await.unwrap()
}

/// Create a folder and save one item into it.
pub async fn folder_with_item(
    vault: &Vault<MemoryVaultStore>,
    folder: &str,
    item: &str,
) -> (Folder, PasswordItem) {
    let folder = vault.create_folder(folder).await.unwrap();
    let item = vault
        .save_item(
            ItemDraft::new(item, "password123", *folder.id())
                .username("user@example.com")
                .uri("https://example.com/login"),
        )
        .await
        .unwrap();
    (folder, item)
}
