mod memory;
mod provider;

pub use memory::{MemoryVaultStore, MemoryVaultStoreError, Snapshot};
pub use provider::{StoreError, VaultStore};
