//! Stable entity identifiers.
//!
//! Every record in the vault is addressed by an opaque identifier backed by a
//! v4 UUID. Identifiers are never reused: a soft-deleted item keeps its id
//! forever. Each entity kind gets its own newtype so a folder id can't be
//! handed to an item lookup by mistake.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Mint a fresh identifier.
            pub fn generate() -> Self {
                Self(Uuid::new_v4())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0.hyphenated())
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s).map(Self)
            }
        }
    };
}

entity_id!(
    /// Identity of an [`Account`](super::Account).
    AccountId
);
entity_id!(
    /// Identity of the account's [`Root`](super::Root) record.
    RootId
);
entity_id!(
    /// Identity of a [`Folder`](super::Folder).
    FolderId
);
entity_id!(
    /// Identity of a [`PasswordItem`](super::PasswordItem).
    ItemId
);
entity_id!(
    /// Identity of an access-control [`Group`](super::Group).
    GroupId
);
entity_id!(
    /// Identity of a folder list or password list container.
    ListId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique() {
        assert_ne!(ItemId::generate(), ItemId::generate());
    }

    #[test]
    fn test_id_display_parses_back() {
        let id = FolderId::generate();
        let parsed: FolderId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_id_rejects_garbage() {
        assert!("not-a-folder".parse::<FolderId>().is_err());
    }
}
