//! Account, root and folder records.
//!
//! ```text
//! Account --owns--> Root --owns--> FolderList
//!                                     |
//!                           +---------+---------+
//!                           |                   |
//!                         Folder              Folder
//!                   (group, PasswordList) (group, PasswordList)
//! ```

use serde::{Deserialize, Serialize};

use super::ids::{AccountId, FolderId, GroupId, ListId, RootId};
use super::list::{Identified, SoftDelete};
use super::principal::Principal;

/// A user of the vault. Identity is fixed at creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    id: AccountId,
    principal: Principal,
    /// Display name for the profile.
    name: String,
}

impl Account {
    pub fn new(principal: Principal, name: impl Into<String>) -> Self {
        Self {
            id: AccountId::generate(),
            principal,
            name: name.into(),
        }
    }

    pub fn id(&self) -> &AccountId {
        &self.id
    }

    pub fn principal(&self) -> &Principal {
        &self.principal
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// The account's single root record, created by `ensure_root`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Root {
    id: RootId,
    account: AccountId,
    /// Personal group governing the folder list.
    group: GroupId,
    folders: ListId,
}

impl Root {
    pub fn new(account: AccountId, group: GroupId, folders: ListId) -> Self {
        Self {
            id: RootId::generate(),
            account,
            group,
            folders,
        }
    }

    pub fn id(&self) -> &RootId {
        &self.id
    }

    pub fn account(&self) -> &AccountId {
        &self.account
    }

    pub fn group(&self) -> &GroupId {
        &self.group
    }

    pub fn folders(&self) -> &ListId {
        &self.folders
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Folder {
    id: FolderId,
    /// Unique among sibling folders, compared case-sensitively.
    name: String,
    /// Group governing this folder and every item in it.
    group: GroupId,
    items: ListId,
}

impl Folder {
    pub fn new(name: impl Into<String>, group: GroupId, items: ListId) -> Self {
        Self {
            id: FolderId::generate(),
            name: name.into(),
            group,
            items,
        }
    }

    pub fn id(&self) -> &FolderId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn group(&self) -> &GroupId {
        &self.group
    }

    pub fn items(&self) -> &ListId {
        &self.items
    }
}

impl Identified for Folder {
    type Id = FolderId;

    fn id(&self) -> FolderId {
        self.id
    }
}

// Folders have no delete operation
impl SoftDelete for Folder {
    fn is_deleted(&self) -> bool {
        false
    }
}
