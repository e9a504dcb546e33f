//! Ordered containers of owned records.
//!
//! Lists keep insertion order and compare members by identity, never by value:
//! two items with identical fields are still two records. Soft-deleted members
//! stay in the list; [`OwnedList::visible`] is the read path for listings and
//! skips them, while [`OwnedList::iter`] and the lookup methods see everything.

use serde::{Deserialize, Serialize};

use super::ids::{GroupId, ListId};

/// A record addressable by a stable identity.
pub trait Identified {
    type Id: PartialEq + Copy;

    fn id(&self) -> Self::Id;
}

/// A record that may carry a soft-delete marker.
pub trait SoftDelete {
    fn is_deleted(&self) -> bool;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnedList<T> {
    id: ListId,
    /// Group governing access to the list and its members.
    owner: GroupId,
    members: Vec<T>,
}

impl<T> OwnedList<T> {
    pub fn new(owner: GroupId) -> Self {
        Self {
            id: ListId::generate(),
            owner,
            members: Vec::new(),
        }
    }

    pub fn id(&self) -> &ListId {
        &self.id
    }

    pub fn owner(&self) -> &GroupId {
        &self.owner
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Insert at the end; existing members are never reordered.
    pub fn append(&mut self, member: T) {
        self.members.push(member);
    }

    /// Raw iteration, deleted members included.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.members.iter()
    }
}

impl<T: Identified> OwnedList<T> {
    pub fn find_by_identity(&self, id: T::Id) -> Option<&T> {
        self.members.iter().find(|member| member.id() == id)
    }

    pub fn find_by_identity_mut(&mut self, id: T::Id) -> Option<&mut T> {
        self.members.iter_mut().find(|member| member.id() == id)
    }

    pub fn contains(&self, id: T::Id) -> bool {
        self.find_by_identity(id).is_some()
    }

    /// Take a member out of the list.
    ///
    /// Only used to move an item between folders; deleting goes through
    /// the soft-delete marker instead.
    pub fn remove_by_identity(&mut self, id: T::Id) -> Option<T> {
        let index = self.members.iter().position(|member| member.id() == id)?;
        Some(self.members.remove(index))
    }
}

impl<T: SoftDelete> OwnedList<T> {
    /// Lazily iterate members that aren't soft-deleted, in insertion order.
    ///
    /// Each call starts a fresh pass over the list.
    pub fn visible(&self) -> impl Iterator<Item = &T> + Clone + '_ {
        self.members.iter().filter(|member| !member.is_deleted())
    }
}
