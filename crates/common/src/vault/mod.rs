//! # Vault
//!
//! The vault is a shared, hierarchical document:
//!
//! ```text
//! Account -> Root -> FolderList -> Folder -> PasswordList -> PasswordItem
//! ```
//!
//! Each container is created under an owning [`Group`]. A folder and every item
//! in its password list share the folder's group, so one grant extends access
//! to the whole subtree.
//!
//! ## Modules
//!
//! - **ids / entity / item**: record shapes
//! - **principal / group**: who may read or write what
//! - **list**: ordered containers with soft delete
//! - **validation**: per-field messages for item input
//! - **engine**: [`Vault`], the CRUD operations over an injected
//!   [`VaultStore`](crate::store::VaultStore)
//! - **invite**: capability links naming a target and a permission

mod engine;
mod entity;
mod group;
mod ids;
mod invite;
mod item;
mod list;
mod principal;
mod validation;

pub use engine::{Vault, VaultError};
pub use entity::{Account, Folder, Root};
pub use group::{Group, Member, Members};
pub use ids::{AccountId, FolderId, GroupId, ItemId, ListId, RootId};
pub use invite::{Invite, InviteError, InviteIssuer, InviteTarget, DEFAULT_INVITE_BASE};
pub use item::{ItemChanges, ItemDraft, PasswordItem};
pub use list::{Identified, OwnedList, SoftDelete};
pub use principal::{InvalidPermission, Permission, Principal};
pub use validation::{validate_draft, validate_item, FieldError, FieldErrors, MIN_PASSWORD_LEN};
