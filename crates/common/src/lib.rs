/**
 * Authentication boundary and login state,
 *  with explicit subscriptions in place of
 *  broadcast notifications.
 */
pub mod session;
/**
 * Persistence/sync boundary of the vault.
 *  An async provider trait plus an in-memory
 *  implementation that can be snapshotted.
 */
pub mod store;
/**
 * The vault itself: record shapes, groups and
 *  permissions, soft-delete lists, the CRUD
 *  engine and invite links.
 */
pub mod vault;

pub mod prelude {
    pub use crate::session::{
        Authenticator, MemoryAuthenticator, Session, SessionError, SessionEvent, Subscription,
    };
    pub use crate::store::{MemoryVaultStore, Snapshot, StoreError, VaultStore};
    pub use crate::vault::{
        Account, Folder, FolderId, Invite, InviteIssuer, InviteTarget, ItemChanges, ItemDraft,
        ItemId, Member, PasswordItem, Permission, Principal, Vault, VaultError,
    };
}
