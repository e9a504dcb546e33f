use std::fmt::{Debug, Display};

use crate::store::{StoreError, VaultStore};

use super::entity::{Account, Folder, Root};
use super::group::{Group, Member};
use super::ids::{FolderId, GroupId, ItemId};
use super::invite::{Invite, InviteIssuer, InviteTarget};
use super::item::{ItemChanges, ItemDraft, PasswordItem};
use super::list::OwnedList;
use super::principal::{InvalidPermission, Permission, Principal};
use super::validation::{validate_draft, validate_item, FieldErrors};

#[derive(Debug, thiserror::Error)]
pub enum VaultError {
    #[error("store error: {0}")]
    Store(#[from] anyhow::Error),
    #[error("validation failed: {0}")]
    ValidationFailed(FieldErrors),
    #[error("folder already exists: {0}")]
    DuplicateFolder(String),
    #[error("folder not found: {0}")]
    FolderNotFound(String),
    #[error("item not found: {0}")]
    ItemNotFound(String),
    #[error("group not found: {0}")]
    GroupNotFound(GroupId),
    #[error(transparent)]
    InvalidPermission(#[from] InvalidPermission),
    #[error("access denied: {principal} cannot {action}")]
    AccessDenied {
        principal: Principal,
        action: &'static str,
    },
}

impl<T> From<StoreError<T>> for VaultError
where
    T: Display + Debug + Send,
{
    fn from(e: StoreError<T>) -> Self {
        match e {
            StoreError::NotFound { kind: "item", id } => VaultError::ItemNotFound(id),
            StoreError::NotFound { kind: "folder", id } => VaultError::FolderNotFound(id),
            other => VaultError::Store(anyhow::anyhow!("{}", other)),
        }
    }
}

fn folder_required() -> VaultError {
    let mut errors = FieldErrors::new();
    errors.push("folder", "Must select a folder");
    VaultError::ValidationFailed(errors)
}

/// An account's view of its vault.
///
/// Owns the injected store for the lifetime of a session. Every operation
/// checks the acting principal's permission on the governing group before it
/// touches the store, and validation always runs before any mutation, so a
/// rejected call leaves the store unchanged.
#[derive(Debug, Clone)]
pub struct Vault<S: VaultStore> {
    store: S,
    account: Account,
    root: Root,
    issuer: InviteIssuer,
}

impl<S: VaultStore> Vault<S> {
    /// Open the vault of `account`, creating its root on first use.
    pub async fn open(store: S, account: Account) -> Result<Self, VaultError> {
        let root = Self::ensure_root(&store, &account).await?;
        Ok(Self {
            store,
            account,
            root,
            issuer: InviteIssuer::default(),
        })
    }

    /// Get the root of `account`, creating it if it does not exist yet.
    ///
    /// Creation makes the account's personal group (its principal as the
    /// only writer), an empty folder list owned by that group, and the root
    /// record pointing at both. An existing root is returned untouched.
    pub async fn ensure_root(store: &S, account: &Account) -> Result<Root, VaultError> {
        if let Some(root) = store.root(account.id()).await? {
            tracing::debug!("ensure_root: found root {} for {}", root.id(), account.id());
            return Ok(root);
        }

        let group = Group::new(account.principal().clone());
        let folders: OwnedList<Folder> = OwnedList::new(*group.id());
        let root = Root::new(*account.id(), *group.id(), *folders.id());

        store.put_group(group).await?;
        store.create_folder_list(folders).await?;
        store.create_root(root.clone()).await?;

        tracing::info!(
            account = %account.id(),
            root = %root.id(),
            "created root for {}",
            account.principal()
        );
        Ok(root)
    }

    /// Use `issuer` for invite links instead of the default base url.
    pub fn with_issuer(mut self, issuer: InviteIssuer) -> Self {
        self.issuer = issuer;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn account(&self) -> &Account {
        &self.account
    }

    pub fn root(&self) -> &Root {
        &self.root
    }

    pub fn issuer(&self) -> &InviteIssuer {
        &self.issuer
    }

    fn principal(&self) -> &Principal {
        self.account.principal()
    }

    async fn group(&self, id: &GroupId) -> Result<Group, VaultError> {
        self.store
            .group(id)
            .await?
            .ok_or(VaultError::GroupNotFound(*id))
    }

    async fn require_read(&self, id: &GroupId, action: &'static str) -> Result<Group, VaultError> {
        let group = self.group(id).await?;
        if !group.can_read(self.principal()) {
            tracing::warn!("{}: {} has no access to group {}", action, self.principal(), id);
            return Err(self.denied(action));
        }
        Ok(group)
    }

    async fn require_write(&self, id: &GroupId, action: &'static str) -> Result<Group, VaultError> {
        let group = self.group(id).await?;
        if !group.can_write(self.principal()) {
            tracing::warn!("{}: {} cannot write group {}", action, self.principal(), id);
            return Err(self.denied(action));
        }
        Ok(group)
    }

    fn denied(&self, action: &'static str) -> VaultError {
        VaultError::AccessDenied {
            principal: self.principal().clone(),
            action,
        }
    }

    /// Resolve a folder anywhere in the store, without an access check.
    async fn require_folder(&self, id: &FolderId) -> Result<Folder, VaultError> {
        self.store
            .find_folder(id)
            .await?
            .ok_or_else(|| VaultError::FolderNotFound(id.to_string()))
    }

    /// Resolve an item anywhere in the store, without an access check.
    async fn require_item(&self, id: &ItemId) -> Result<PasswordItem, VaultError> {
        self.store
            .find_item(id)
            .await?
            .ok_or_else(|| VaultError::ItemNotFound(id.to_string()))
    }

    /// Folders other principals shared with this one that are still readable,
    /// skipping any that live under the account's own root.
    async fn shared_folders(&self, own: &OwnedList<Folder>) -> Result<Vec<Folder>, VaultError> {
        let mut shared = Vec::new();
        for id in self.store.shared_folders(self.principal()).await? {
            if own.contains(id) {
                continue;
            }
            let Some(folder) = self.store.find_folder(&id).await? else {
                continue;
            };
            if self.group(folder.group()).await?.can_read(self.principal()) {
                shared.push(folder);
            }
        }
        Ok(shared)
    }

    /* Reads */

    /// All folders under the root in creation order, followed by the folders
    /// shared with this principal in the order they were shared.
    pub async fn folders(&self) -> Result<Vec<Folder>, VaultError> {
        self.require_read(self.root.group(), "list folders").await?;
        let own = self.store.folders(self.root.folders()).await?;
        let mut folders: Vec<Folder> = own.visible().cloned().collect();
        folders.extend(self.shared_folders(&own).await?);
        Ok(folders)
    }

    /// Look up a folder by id. Requires read access on the folder's group.
    pub async fn folder(&self, id: &FolderId) -> Result<Option<Folder>, VaultError> {
        let Some(folder) = self.store.find_folder(id).await? else {
            return Ok(None);
        };
        self.require_read(folder.group(), "read folder").await?;
        Ok(Some(folder))
    }

    /// Find a folder by its exact (case-sensitive) name. Folders under the
    /// root win over shared folders of the same name.
    pub async fn folder_by_name(&self, name: &str) -> Result<Option<Folder>, VaultError> {
        self.require_read(self.root.group(), "find folder").await?;
        let own = self.store.folders(self.root.folders()).await?;
        if let Some(folder) = own.iter().find(|folder| folder.name() == name) {
            return Ok(Some(folder.clone()));
        }
        Ok(self
            .shared_folders(&own)
            .await?
            .into_iter()
            .find(|folder| folder.name() == name))
    }

    /// Visible items of a folder, in insertion order.
    pub async fn items(&self, folder: &FolderId) -> Result<Vec<PasswordItem>, VaultError> {
        let folder = self.require_folder(folder).await?;
        self.require_read(folder.group(), "list items").await?;
        let items = self.store.items(folder.items()).await?;
        Ok(items.visible().cloned().collect())
    }

    /// Visible items across every folder, flattened in folder order.
    pub async fn all_items(&self) -> Result<Vec<PasswordItem>, VaultError> {
        let mut all = Vec::new();
        for folder in self.folders().await? {
            all.extend(self.items(folder.id()).await?);
        }
        Ok(all)
    }

    /// Visible items of the folder named `folder`, or of every folder when no
    /// name is given.
    pub async fn items_in(&self, folder: Option<&str>) -> Result<Vec<PasswordItem>, VaultError> {
        match folder {
            None => self.all_items().await,
            Some(name) => {
                let folder = self
                    .folder_by_name(name)
                    .await?
                    .ok_or_else(|| VaultError::FolderNotFound(name.to_string()))?;
                self.items(folder.id()).await
            }
        }
    }

    /// Look up an item by id, deleted or not. Requires read access on the
    /// group of the item's folder.
    pub async fn item(&self, id: &ItemId) -> Result<Option<PasswordItem>, VaultError> {
        let Some(item) = self.store.find_item(id).await? else {
            return Ok(None);
        };
        let folder = self.require_folder(&item.folder).await?;
        self.require_read(folder.group(), "read item").await?;
        Ok(Some(item))
    }

    /* Folders */

    /// Create a folder under the root.
    ///
    /// The folder gets its own group, with the caller as writer, and an empty
    /// password list owned by that group.
    pub async fn create_folder(&self, name: &str) -> Result<Folder, VaultError> {
        tracing::debug!("create_folder: {:?}", name);

        if name.is_empty() {
            let mut errors = FieldErrors::new();
            errors.push("name", "Name is required");
            tracing::warn!("create_folder: rejected: {}", errors);
            return Err(VaultError::ValidationFailed(errors));
        }

        self.require_write(self.root.group(), "create folder").await?;

        let folders = self.store.folders(self.root.folders()).await?;
        if folders.iter().any(|folder| folder.name() == name) {
            tracing::warn!("create_folder: {:?} already exists", name);
            return Err(VaultError::DuplicateFolder(name.to_string()));
        }

        let group = Group::new(self.principal().clone());
        let items: OwnedList<PasswordItem> = OwnedList::new(*group.id());
        let folder = Folder::new(name, *group.id(), *items.id());

        self.store.put_group(group).await?;
        self.store.create_item_list(items).await?;
        self.store
            .append_folder(self.root.folders(), folder.clone())
            .await?;

        tracing::info!(folder = %folder.id(), "created folder {:?}", name);
        Ok(folder)
    }

    /* Items */

    /// Validate `draft` and append the resulting item to its folder.
    ///
    /// Item names are not unique; saving the same draft twice yields two
    /// records.
    pub async fn save_item(&self, draft: ItemDraft) -> Result<PasswordItem, VaultError> {
        tracing::debug!("save_item: {:?} into {:?}", draft.name, draft.folder);

        if let Err(errors) = validate_draft(&draft) {
            tracing::warn!("save_item: rejected: {}", errors);
            return Err(VaultError::ValidationFailed(errors));
        }
        let folder_id = draft.folder.ok_or_else(folder_required)?;

        let folder = self.require_folder(&folder_id).await?;
        self.require_write(folder.group(), "save item").await?;

        let item = PasswordItem::from_draft(draft, folder_id);
        self.store.append_item(folder.items(), item.clone()).await?;

        tracing::info!(item = %item.id, folder = %folder_id, "saved item {:?}", item.name);
        Ok(item)
    }

    /// Apply `changes` to the stored copy of `original`.
    ///
    /// Only the fields set in `changes` are written. The merged record is
    /// validated before anything is stored. A different `folder` moves the
    /// item: it is appended to the target's list and then taken out of its
    /// current folder's list, which requires write access on both groups. The `deleted`
    /// marker is carried over as stored.
    pub async fn update_item(
        &self,
        original: &PasswordItem,
        changes: ItemChanges,
    ) -> Result<PasswordItem, VaultError> {
        tracing::debug!("update_item: {} fields {:?}", original.id, changes.fields());

        let source = self.require_folder(&original.folder).await?;
        self.require_write(source.group(), "update item").await?;

        let items = self.store.items(source.items()).await?;
        let current = items
            .find_by_identity(original.id)
            .cloned()
            .ok_or_else(|| VaultError::ItemNotFound(original.id.to_string()))?;

        let mut merged = current.clone();
        changes.apply_to(&mut merged);
        if let Err(errors) = validate_item(&merged) {
            tracing::warn!("update_item: {} rejected: {}", original.id, errors);
            return Err(VaultError::ValidationFailed(errors));
        }

        match changes.folder.filter(|target| *target != current.folder) {
            Some(target) => {
                let target = self.require_folder(&target).await?;
                self.require_write(target.group(), "move item").await?;

                // a failed removal leaves a duplicate, never a lost record
                self.store.append_item(target.items(), merged.clone()).await?;
                self.store.remove_item(source.items(), &current.id).await?;

                tracing::info!(
                    item = %merged.id,
                    "moved item from {:?} to {:?}",
                    source.name(),
                    target.name()
                );
                Ok(merged)
            }
            None if changes.is_empty() => Ok(current),
            None => {
                let updated = self
                    .store
                    .set_item_fields(source.items(), &current.id, &changes)
                    .await?;
                tracing::info!(item = %updated.id, "updated fields {:?}", changes.fields());
                Ok(updated)
            }
        }
    }

    /// Mark `item` deleted. Deleting an already deleted item succeeds.
    pub async fn delete_item(&self, item: &PasswordItem) -> Result<(), VaultError> {
        tracing::debug!("delete_item: {}", item.id);

        let folder = self.require_folder(&item.folder).await?;
        self.require_write(folder.group(), "delete item").await?;
        self.store.mark_item_deleted(folder.items(), &item.id).await?;

        tracing::info!(item = %item.id, folder = %folder.id(), "deleted item");
        Ok(())
    }

    /* Sharing */

    /// Resolve the folder governing `target`. An item is governed by its
    /// folder's group.
    async fn target_folder(&self, target: &InviteTarget) -> Result<Folder, VaultError> {
        match target {
            InviteTarget::Folder(id) => self.require_folder(id).await,
            InviteTarget::Item(id) => {
                let item = self.require_item(id).await?;
                self.require_folder(&item.folder).await
            }
        }
    }

    async fn target_group(&self, target: &InviteTarget) -> Result<Group, VaultError> {
        let folder = self.target_folder(target).await?;
        self.group(folder.group()).await
    }

    /// Write a grant to the folder's group and record the folder as shared
    /// with `principal`.
    async fn apply_grant(
        &self,
        folder: &Folder,
        mut group: Group,
        principal: Principal,
        permission: Permission,
    ) -> Result<Permission, VaultError> {
        let held = group.grant(principal.clone(), permission);
        self.store.put_group(group).await?;
        self.store.add_shared_folder(&principal, folder.id()).await?;
        tracing::info!(
            folder = %folder.id(),
            "granted {} {} on {:?}",
            principal,
            held,
            folder.name()
        );
        Ok(held)
    }

    /// Mint an invite for `target` at `permission` (`reader` or `writer`).
    ///
    /// Nothing is granted here. The same target and permission always yield
    /// the same link.
    pub async fn create_invite(
        &self,
        target: impl Into<InviteTarget>,
        permission: &str,
    ) -> Result<Invite, VaultError> {
        let target = target.into();
        tracing::debug!("create_invite: {:?} {:?}", target, permission);

        let permission: Permission = permission.parse().map_err(|e: InvalidPermission| {
            tracing::warn!("create_invite: {}", e);
            e
        })?;

        let group = self.target_group(&target).await?;
        if !group.can_write(self.principal()) {
            tracing::warn!("create_invite: {} cannot share {:?}", self.principal(), target);
            return Err(self.denied("share"));
        }

        let invite = self.issuer.issue(target, permission);
        tracing::info!("issued invite {}", invite);
        Ok(invite)
    }

    /// Current members of the group governing `target`.
    pub async fn shared_principals(
        &self,
        target: impl Into<InviteTarget>,
    ) -> Result<Vec<Member>, VaultError> {
        let target = target.into();
        let group = self.target_group(&target).await?;
        if !group.can_read(self.principal()) {
            return Err(self.denied("list members"));
        }
        Ok(group.members())
    }

    /// Grant `principal` access to `target`, as redeeming an invite would.
    ///
    /// Returns the permission the principal holds afterwards, which may be
    /// higher than requested since grants never downgrade.
    pub async fn grant(
        &self,
        target: impl Into<InviteTarget>,
        principal: Principal,
        permission: &str,
    ) -> Result<Permission, VaultError> {
        let target = target.into();
        let permission: Permission = permission.parse()?;

        let folder = self.target_folder(&target).await?;
        let group = self.group(folder.group()).await?;
        if !group.can_write(self.principal()) {
            tracing::warn!("grant: {} cannot share {:?}", self.principal(), target);
            return Err(self.denied("share"));
        }

        self.apply_grant(&folder, group, principal, permission).await
    }

    /// Accept `invite` as this vault's principal.
    ///
    /// The link is the capability: holding it is enough, no prior membership
    /// is needed. The target's folder then shows up in [`Vault::folders`].
    /// Returns the permission held afterwards.
    pub async fn redeem(&self, invite: &Invite) -> Result<Permission, VaultError> {
        tracing::debug!("redeem: {}", invite);
        let folder = self.target_folder(invite.target()).await?;
        let group = self.group(folder.group()).await?;
        self.apply_grant(&folder, group, self.principal().clone(), invite.permission())
            .await
    }
}
