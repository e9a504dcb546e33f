use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::provider::{StoreError, VaultStore};
use crate::vault::{
    AccountId, Folder, FolderId, Group, GroupId, ItemChanges, ItemId, ListId, OwnedList,
    PasswordItem, Principal, Root,
};

/// In-memory vault store.
///
/// Cheap to clone; clones share the same state. Used as the injected store in
/// tests and, through [`Snapshot`], as the working set of file-backed stores.
#[derive(Debug, Clone)]
pub struct MemoryVaultStore {
    inner: Arc<RwLock<MemoryVaultStoreInner>>,
}

#[derive(Debug, Default)]
struct MemoryVaultStoreInner {
    /// account -> root record
    roots: BTreeMap<AccountId, Root>,
    groups: BTreeMap<GroupId, Group>,
    folder_lists: BTreeMap<ListId, OwnedList<Folder>>,
    item_lists: BTreeMap<ListId, OwnedList<PasswordItem>>,
    /// principal -> folders shared with it
    shared: BTreeMap<Principal, Vec<FolderId>>,
}

/// Serializable copy of a store's entire state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub roots: Vec<Root>,
    pub groups: Vec<Group>,
    pub folder_lists: Vec<OwnedList<Folder>>,
    pub item_lists: Vec<OwnedList<PasswordItem>>,
    #[serde(default)]
    pub shared: BTreeMap<Principal, Vec<FolderId>>,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MemoryVaultStoreError {
    #[error("memory store error: {0}")]
    Internal(String),
}

type Result<T> = std::result::Result<T, StoreError<MemoryVaultStoreError>>;

impl MemoryVaultStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(MemoryVaultStoreInner::default())),
        }
    }

    /// Build a store holding the state captured in `snapshot`.
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        let inner = MemoryVaultStoreInner {
            roots: snapshot
                .roots
                .into_iter()
                .map(|root| (*root.account(), root))
                .collect(),
            groups: snapshot
                .groups
                .into_iter()
                .map(|group| (*group.id(), group))
                .collect(),
            folder_lists: snapshot
                .folder_lists
                .into_iter()
                .map(|list| (*list.id(), list))
                .collect(),
            item_lists: snapshot
                .item_lists
                .into_iter()
                .map(|list| (*list.id(), list))
                .collect(),
            shared: snapshot.shared,
        };
        Self {
            inner: Arc::new(RwLock::new(inner)),
        }
    }

    /// Capture the current state.
    pub fn snapshot(&self) -> Result<Snapshot> {
        let inner = self.read()?;
        Ok(Snapshot {
            roots: inner.roots.values().cloned().collect(),
            groups: inner.groups.values().cloned().collect(),
            folder_lists: inner.folder_lists.values().cloned().collect(),
            item_lists: inner.item_lists.values().cloned().collect(),
            shared: inner.shared.clone(),
        })
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, MemoryVaultStoreInner>> {
        self.inner.read().map_err(|e| {
            StoreError::Provider(MemoryVaultStoreError::Internal(format!(
                "failed to acquire read lock: {}",
                e
            )))
        })
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, MemoryVaultStoreInner>> {
        self.inner.write().map_err(|e| {
            StoreError::Provider(MemoryVaultStoreError::Internal(format!(
                "failed to acquire write lock: {}",
                e
            )))
        })
    }
}

impl Default for MemoryVaultStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryVaultStoreInner {
    fn item_list_mut(&mut self, list: &ListId) -> Result<&mut OwnedList<PasswordItem>> {
        self.item_lists
            .get_mut(list)
            .ok_or_else(|| StoreError::not_found("password list", list))
    }
}

#[async_trait]
impl VaultStore for MemoryVaultStore {
    type Error = MemoryVaultStoreError;

    async fn root(&self, account: &AccountId) -> Result<Option<Root>> {
        let inner = self.read()?;
        Ok(inner.roots.get(account).cloned())
    }

    async fn create_root(&self, root: Root) -> Result<()> {
        let mut inner = self.write()?;
        if inner.roots.contains_key(root.account()) {
            return Err(StoreError::already_exists("root", root.account()));
        }
        inner.roots.insert(*root.account(), root);
        Ok(())
    }

    async fn group(&self, id: &GroupId) -> Result<Option<Group>> {
        let inner = self.read()?;
        Ok(inner.groups.get(id).cloned())
    }

    async fn put_group(&self, group: Group) -> Result<()> {
        let mut inner = self.write()?;
        inner.groups.insert(*group.id(), group);
        Ok(())
    }

    async fn create_folder_list(&self, list: OwnedList<Folder>) -> Result<()> {
        let mut inner = self.write()?;
        if inner.folder_lists.contains_key(list.id()) {
            return Err(StoreError::already_exists("folder list", list.id()));
        }
        inner.folder_lists.insert(*list.id(), list);
        Ok(())
    }

    async fn folders(&self, list: &ListId) -> Result<OwnedList<Folder>> {
        let inner = self.read()?;
        inner
            .folder_lists
            .get(list)
            .cloned()
            .ok_or_else(|| StoreError::not_found("folder list", list))
    }

    async fn append_folder(&self, list: &ListId, folder: Folder) -> Result<()> {
        let mut inner = self.write()?;
        inner
            .folder_lists
            .get_mut(list)
            .ok_or_else(|| StoreError::not_found("folder list", list))?
            .append(folder);
        Ok(())
    }

    async fn create_item_list(&self, list: OwnedList<PasswordItem>) -> Result<()> {
        let mut inner = self.write()?;
        if inner.item_lists.contains_key(list.id()) {
            return Err(StoreError::already_exists("password list", list.id()));
        }
        inner.item_lists.insert(*list.id(), list);
        Ok(())
    }

    async fn items(&self, list: &ListId) -> Result<OwnedList<PasswordItem>> {
        let inner = self.read()?;
        inner
            .item_lists
            .get(list)
            .cloned()
            .ok_or_else(|| StoreError::not_found("password list", list))
    }

    async fn append_item(&self, list: &ListId, item: PasswordItem) -> Result<()> {
        let mut inner = self.write()?;
        inner.item_list_mut(list)?.append(item);
        Ok(())
    }

    async fn remove_item(&self, list: &ListId, item: &ItemId) -> Result<PasswordItem> {
        let mut inner = self.write()?;
        inner
            .item_list_mut(list)?
            .remove_by_identity(*item)
            .ok_or_else(|| StoreError::not_found("item", item))
    }

    async fn set_item_fields(
        &self,
        list: &ListId,
        item: &ItemId,
        changes: &ItemChanges,
    ) -> Result<PasswordItem> {
        let mut inner = self.write()?;
        let record = inner
            .item_list_mut(list)?
            .find_by_identity_mut(*item)
            .ok_or_else(|| StoreError::not_found("item", item))?;
        changes.apply_to(record);
        Ok(record.clone())
    }

    async fn mark_item_deleted(&self, list: &ListId, item: &ItemId) -> Result<()> {
        let mut inner = self.write()?;
        let record = inner
            .item_list_mut(list)?
            .find_by_identity_mut(*item)
            .ok_or_else(|| StoreError::not_found("item", item))?;
        record.deleted = true;
        Ok(())
    }

    async fn find_folder(&self, id: &FolderId) -> Result<Option<Folder>> {
        let inner = self.read()?;
        Ok(inner
            .folder_lists
            .values()
            .find_map(|list| list.find_by_identity(*id))
            .cloned())
    }

    async fn find_item(&self, id: &ItemId) -> Result<Option<PasswordItem>> {
        let inner = self.read()?;
        Ok(inner
            .item_lists
            .values()
            .find_map(|list| list.find_by_identity(*id))
            .cloned())
    }

    async fn add_shared_folder(&self, principal: &Principal, folder: &FolderId) -> Result<()> {
        let mut inner = self.write()?;
        let shared = inner.shared.entry(principal.clone()).or_default();
        if !shared.contains(folder) {
            shared.push(*folder);
        }
        Ok(())
    }

    async fn shared_folders(&self, principal: &Principal) -> Result<Vec<FolderId>> {
        let inner = self.read()?;
        Ok(inner.shared.get(principal).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vault::ItemDraft;

    fn principal() -> Principal {
        Principal::new("user@example.com")
    }

    async fn item_list(store: &MemoryVaultStore) -> ListId {
        let group = Group::new(principal());
        let list = OwnedList::new(*group.id());
        let id = *list.id();
        store.put_group(group).await.unwrap();
        store.create_item_list(list).await.unwrap();
        id
    }

    fn item(name: &str) -> PasswordItem {
        let folder = FolderId::generate();
        PasswordItem::from_draft(ItemDraft::new(name, "password123", folder), folder)
    }

    #[tokio::test]
    async fn test_create_root_once() {
        let store = MemoryVaultStore::new();
        let account = AccountId::generate();
        let root = Root::new(account, GroupId::generate(), ListId::generate());

        assert!(store.root(&account).await.unwrap().is_none());
        store.create_root(root.clone()).await.unwrap();
        assert_eq!(store.root(&account).await.unwrap(), Some(root.clone()));

        let result = store.create_root(root).await;
        assert!(matches!(result, Err(StoreError::AlreadyExists { .. })));
    }

    #[tokio::test]
    async fn test_append_and_read_items() {
        let store = MemoryVaultStore::new();
        let list = item_list(&store).await;

        store.append_item(&list, item("a")).await.unwrap();
        store.append_item(&list, item("b")).await.unwrap();

        let items = store.items(&list).await.unwrap();
        let names: Vec<_> = items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_missing_list() {
        let store = MemoryVaultStore::new();
        let result = store.items(&ListId::generate()).await;
        assert!(matches!(result, Err(StoreError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_set_fields_and_mark_deleted() {
        let store = MemoryVaultStore::new();
        let list = item_list(&store).await;
        let record = item("a");
        let id = record.id;
        store.append_item(&list, record).await.unwrap();

        let updated = store
            .set_item_fields(&list, &id, &ItemChanges::new().name("renamed"))
            .await
            .unwrap();
        assert_eq!(updated.name, "renamed");
        assert_eq!(updated.password, "password123");

        store.mark_item_deleted(&list, &id).await.unwrap();
        store.mark_item_deleted(&list, &id).await.unwrap();
        let items = store.items(&list).await.unwrap();
        assert!(items.find_by_identity(id).unwrap().deleted);
        assert_eq!(items.visible().count(), 0);
    }

    #[tokio::test]
    async fn test_unknown_item() {
        let store = MemoryVaultStore::new();
        let list = item_list(&store).await;
        let result = store.mark_item_deleted(&list, &ItemId::generate()).await;
        assert!(matches!(result, Err(StoreError::NotFound { kind: "item", .. })));
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let store = MemoryVaultStore::new();
        let clone = store.clone();
        let list = item_list(&store).await;
        clone.append_item(&list, item("a")).await.unwrap();
        assert_eq!(store.items(&list).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_find_across_lists() {
        let store = MemoryVaultStore::new();
        let first = item_list(&store).await;
        let second = item_list(&store).await;
        let record = item("b");
        let id = record.id;
        store.append_item(&first, item("a")).await.unwrap();
        store.append_item(&second, record).await.unwrap();

        assert_eq!(store.find_item(&id).await.unwrap().unwrap().name, "b");
        assert!(store.find_item(&ItemId::generate()).await.unwrap().is_none());
        assert!(store.find_folder(&FolderId::generate()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_shared_folders_are_deduplicated() {
        let store = MemoryVaultStore::new();
        let bob = Principal::new("bob@example.com");
        let a = FolderId::generate();
        let b = FolderId::generate();

        assert!(store.shared_folders(&bob).await.unwrap().is_empty());
        store.add_shared_folder(&bob, &a).await.unwrap();
        store.add_shared_folder(&bob, &b).await.unwrap();
        store.add_shared_folder(&bob, &a).await.unwrap();

        assert_eq!(store.shared_folders(&bob).await.unwrap(), vec![a, b]);
        assert!(store.shared_folders(&principal()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_snapshot_restores_state() {
        let store = MemoryVaultStore::new();
        let list = item_list(&store).await;
        store.append_item(&list, item("a")).await.unwrap();
        store
            .add_shared_folder(&principal(), &FolderId::generate())
            .await
            .unwrap();

        let snapshot = store.snapshot().unwrap();
        let json = serde_json::to_string(&snapshot).unwrap();
        let restored = MemoryVaultStore::from_snapshot(serde_json::from_str(&json).unwrap());

        assert_eq!(restored.snapshot().unwrap(), snapshot);
        assert_eq!(restored.items(&list).await.unwrap().len(), 1);
    }
}
