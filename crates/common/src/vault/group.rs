//! # Groups
//!
//! A group is the access-control object for a subtree of the vault. It holds:
//!
//! - **Identity**: a [`GroupId`]
//! - **Membership**: map of principals to their [`Permission`]
//!
//! ## Ownership Model
//!
//! - Every folder points at exactly one group; its password list and every item
//!   in that list are governed by the same group
//! - The account's folder list is governed by a personal group created with
//!   the root
//! - A single [`Group::grant`] therefore extends access to a whole folder,
//!   items included, with no per-item propagation
//!
//! The creator of a group always holds writer permission. Grants only ever
//! upgrade, so that invariant can't be broken through this API.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::ids::GroupId;
use super::principal::{Permission, Principal};

/// A principal together with its permission, as returned by
/// [`Group::members`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub principal: Principal,
    pub permission: Permission,
}

/// Map of principals to their permission.
///
/// A `BTreeMap` keeps a principal unique per group and gives snapshots a
/// stable order.
pub type Members = BTreeMap<Principal, Permission>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    id: GroupId,
    members: Members,
}

impl Group {
    /// Create a new group with `creator` as its only (writer) member.
    pub fn new(creator: Principal) -> Self {
        Self {
            id: GroupId::generate(),
            members: BTreeMap::from([(creator, Permission::Writer)]),
        }
    }

    pub fn id(&self) -> &GroupId {
        &self.id
    }

    /// Set or upgrade a principal's permission.
    ///
    /// Idempotent. Never downgrades: granting `Reader` to an existing writer
    /// keeps `Writer`. Returns the permission the principal holds afterwards.
    pub fn grant(&mut self, principal: Principal, permission: Permission) -> Permission {
        let held = self.members.entry(principal).or_insert(permission);
        if permission > *held {
            *held = permission;
        }
        *held
    }

    /// Get a principal's permission, if it is a member.
    pub fn permission_of(&self, principal: &Principal) -> Option<Permission> {
        self.members.get(principal).copied()
    }

    pub fn can_read(&self, principal: &Principal) -> bool {
        self.permission_of(principal).is_some()
    }

    pub fn can_write(&self, principal: &Principal) -> bool {
        self.permission_of(principal) == Some(Permission::Writer)
    }

    /// Snapshot of the current membership, ordered by principal.
    pub fn members(&self) -> Vec<Member> {
        self.members
            .iter()
            .map(|(principal, permission)| Member {
                principal: principal.clone(),
                permission: *permission,
            })
            .collect()
    }
}
