use std::fmt::{Debug, Display};

use async_trait::async_trait;

use crate::vault::{
    AccountId, Folder, FolderId, Group, GroupId, ItemChanges, ItemId, ListId, OwnedList,
    PasswordItem, Principal, Root,
};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError<T> {
    /// Failure inside the backing store
    #[error("unhandled vault store error: {0}")]
    Provider(#[from] T),
    /// A record the operation depends on does not exist
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },
    /// A record with this identity already exists
    #[error("{kind} already exists: {id}")]
    AlreadyExists { kind: &'static str, id: String },
}

impl<T> StoreError<T> {
    pub fn not_found(kind: &'static str, id: impl ToString) -> Self {
        StoreError::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    pub fn already_exists(kind: &'static str, id: impl ToString) -> Self {
        StoreError::AlreadyExists {
            kind,
            id: id.to_string(),
        }
    }
}

/// The persistence/sync boundary of the vault.
///
/// Implementations provide create/read/mutate primitives for the vault's
/// records. Every call is a suspension point: it may cross a process or
/// network boundary and resolves to success or a typed failure.
///
/// Mutations are expressed as single logical changes (create, append,
/// set-field, mark-deleted) so that a store which merges concurrent writers
/// (field-level last-writer-wins, append-only list union) can apply each one
/// atomically. Implementations are responsible for that merge; the vault does
/// no conflict resolution of its own.
#[async_trait]
pub trait VaultStore: Send + Sync + std::fmt::Debug + Clone + 'static {
    type Error: Display + Debug + Send;

    /// Get the root record of an account, if one has been created.
    async fn root(&self, account: &AccountId) -> Result<Option<Root>, StoreError<Self::Error>>;

    /// Create the root record of an account.
    ///
    /// Should fail with `StoreError::AlreadyExists` if the account already
    /// has a root.
    async fn create_root(&self, root: Root) -> Result<(), StoreError<Self::Error>>;

    async fn group(&self, id: &GroupId) -> Result<Option<Group>, StoreError<Self::Error>>;

    /// Create or replace a group record.
    async fn put_group(&self, group: Group) -> Result<(), StoreError<Self::Error>>;

    /// Create an empty folder list.
    async fn create_folder_list(
        &self,
        list: OwnedList<Folder>,
    ) -> Result<(), StoreError<Self::Error>>;

    /// Read a snapshot of a folder list.
    async fn folders(&self, list: &ListId) -> Result<OwnedList<Folder>, StoreError<Self::Error>>;

    /// Append a folder to a folder list.
    async fn append_folder(
        &self,
        list: &ListId,
        folder: Folder,
    ) -> Result<(), StoreError<Self::Error>>;

    /// Create an empty password list.
    async fn create_item_list(
        &self,
        list: OwnedList<PasswordItem>,
    ) -> Result<(), StoreError<Self::Error>>;

    /// Read a snapshot of a password list, deleted items included.
    async fn items(
        &self,
        list: &ListId,
    ) -> Result<OwnedList<PasswordItem>, StoreError<Self::Error>>;

    async fn append_item(
        &self,
        list: &ListId,
        item: PasswordItem,
    ) -> Result<(), StoreError<Self::Error>>;

    /// Take an item out of a list. Only used when moving an item between
    /// folders.
    ///
    /// Should fail with `StoreError::NotFound` if the item is not in the list.
    async fn remove_item(
        &self,
        list: &ListId,
        item: &ItemId,
    ) -> Result<PasswordItem, StoreError<Self::Error>>;

    /// Apply the set fields of `changes` to an item in place and return the
    /// updated record.
    ///
    /// Should fail with `StoreError::NotFound` if the item is not in the list.
    async fn set_item_fields(
        &self,
        list: &ListId,
        item: &ItemId,
        changes: &ItemChanges,
    ) -> Result<PasswordItem, StoreError<Self::Error>>;

    /// Set an item's `deleted` marker. Marking an already deleted item is a
    /// no-op.
    ///
    /// Should fail with `StoreError::NotFound` if the item is not in the list.
    async fn mark_item_deleted(
        &self,
        list: &ListId,
        item: &ItemId,
    ) -> Result<(), StoreError<Self::Error>>;

    /// Find a folder by id in any folder list.
    async fn find_folder(&self, id: &FolderId) -> Result<Option<Folder>, StoreError<Self::Error>>;

    /// Find an item by id in any password list, deleted items included.
    async fn find_item(&self, id: &ItemId) -> Result<Option<PasswordItem>, StoreError<Self::Error>>;

    /// Record that `folder` has been shared with `principal`. Recording the
    /// same folder twice is a no-op.
    async fn add_shared_folder(
        &self,
        principal: &Principal,
        folder: &FolderId,
    ) -> Result<(), StoreError<Self::Error>>;

    /// Folders shared with `principal`, in the order they were shared.
    async fn shared_folders(
        &self,
        principal: &Principal,
    ) -> Result<Vec<FolderId>, StoreError<Self::Error>>;
}
