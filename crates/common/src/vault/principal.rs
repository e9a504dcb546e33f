//! # Principals
//!
//! Principals represent identities that can hold a permission on a group.
//!
//! Each group member has:
//! - An **identity** ([`Principal`], an opaque string supplied by the
//!   authentication boundary)
//! - A **permission** defining their access level ([`Permission`])
//!
//! ## Trust Model
//!
//! There is no cryptographic enforcement of permissions. The vault checks
//! group membership before every mutation, and the underlying store is
//! trusted to merge concurrent writers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A logical identity, typically an e-mail address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Principal(String);

impl Principal {
    pub fn new(identity: impl Into<String>) -> Self {
        Self(identity.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Principal {
    fn from(identity: &str) -> Self {
        Self::new(identity)
    }
}

/// The permission level of a principal within a group.
///
/// Permissions are ordered: a writer can do everything a reader can.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    /// Can list the folder and read its items.
    Reader,

    /// Reader access plus:
    /// - Create, edit and delete items
    /// - Grant access to other principals
    Writer,
}

impl Permission {
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::Reader => "reader",
            Permission::Writer => "writer",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid permission: {0} (expected 'reader' or 'writer')")]
pub struct InvalidPermission(pub String);

impl FromStr for Permission {
    type Err = InvalidPermission;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "reader" => Ok(Permission::Reader),
            "writer" => Ok(Permission::Writer),
            other => Err(InvalidPermission(other.to_string())),
        }
    }
}
