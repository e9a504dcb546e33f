//! # Invites
//!
//! An invite is a capability description: it names a folder or an item and a
//! permission level, and renders as a link of the form
//!
//! ```text
//! https://example.com/invite?folder=<folder-id>&permission=reader
//! https://example.com/invite?item=<item-id>&permission=writer
//! ```
//!
//! Invites are derived on demand and never stored. Minting one does not grant
//! anything; `Vault::redeem` writes the grant to the target's group for the
//! principal holding the link. The same target and permission always produce
//! the same link.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use url::Url;

use super::ids::{FolderId, ItemId};
use super::principal::{InvalidPermission, Permission};

pub const DEFAULT_INVITE_BASE: &str = "https://example.com";

const INVITE_PATH: &str = "invite";
const PERMISSION_PARAM: &str = "permission";
const FOLDER_PARAM: &str = "folder";
const ITEM_PARAM: &str = "item";

#[derive(Debug, thiserror::Error)]
pub enum InviteError {
    #[error("invalid invite base url: {0}")]
    InvalidBase(String),
    #[error("invalid invite link: {0}")]
    InvalidLink(String),
    #[error("invite link is missing the '{0}' parameter")]
    MissingParameter(&'static str),
    #[error("invite link names more than one target")]
    AmbiguousTarget,
    #[error("invalid invite target id: {0}")]
    InvalidTarget(String),
    #[error(transparent)]
    InvalidPermission(#[from] InvalidPermission),
}

/// The entity an invite grants access to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "id")]
pub enum InviteTarget {
    Folder(FolderId),
    Item(ItemId),
}

impl InviteTarget {
    /// Query parameter naming this kind of target.
    pub fn kind(&self) -> &'static str {
        match self {
            InviteTarget::Folder(_) => FOLDER_PARAM,
            InviteTarget::Item(_) => ITEM_PARAM,
        }
    }

    fn identifier(&self) -> String {
        match self {
            InviteTarget::Folder(id) => id.to_string(),
            InviteTarget::Item(id) => id.to_string(),
        }
    }
}

impl From<FolderId> for InviteTarget {
    fn from(id: FolderId) -> Self {
        InviteTarget::Folder(id)
    }
}

impl From<ItemId> for InviteTarget {
    fn from(id: ItemId) -> Self {
        InviteTarget::Item(id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invite {
    target: InviteTarget,
    permission: Permission,
    link: Url,
}

impl Invite {
    pub fn target(&self) -> &InviteTarget {
        &self.target
    }

    pub fn permission(&self) -> Permission {
        self.permission
    }

    pub fn link(&self) -> &Url {
        &self.link
    }

    /// Parse an invite link.
    ///
    /// Both the target and `permission` parameters are mandatory; any other
    /// query parameters are ignored.
    pub fn parse(link: &str) -> Result<Self, InviteError> {
        let link = Url::parse(link).map_err(|e| InviteError::InvalidLink(e.to_string()))?;

        let is_invite_path = link
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            == Some(INVITE_PATH);
        if !is_invite_path {
            return Err(InviteError::InvalidLink(format!(
                "expected an /{} path",
                INVITE_PATH
            )));
        }

        let mut target = None;
        let mut permission = None;
        for (key, value) in link.query_pairs() {
            let parsed = match key.as_ref() {
                FOLDER_PARAM => FolderId::from_str(&value).map(InviteTarget::Folder),
                ITEM_PARAM => ItemId::from_str(&value).map(InviteTarget::Item),
                PERMISSION_PARAM => {
                    permission = Some(value.parse::<Permission>()?);
                    continue;
                }
                _ => continue,
            };
            let parsed = parsed.map_err(|_| InviteError::InvalidTarget(value.to_string()))?;
            if target.replace(parsed).is_some() {
                return Err(InviteError::AmbiguousTarget);
            }
        }

        let target = target.ok_or(InviteError::MissingParameter("folder|item"))?;
        let permission = permission.ok_or(InviteError::MissingParameter(PERMISSION_PARAM))?;

        Ok(Self {
            target,
            permission,
            link,
        })
    }
}

impl fmt::Display for Invite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.link)
    }
}

/// Mints invite links under a configured base url.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InviteIssuer {
    base: Url,
}

impl InviteIssuer {
    pub fn new(base: &str) -> Result<Self, InviteError> {
        let base = Url::parse(base).map_err(|e| InviteError::InvalidBase(e.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(InviteError::InvalidBase(base.to_string()));
        }
        Ok(Self { base })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Build the invite for `target` at `permission`.
    pub fn issue(&self, target: InviteTarget, permission: Permission) -> Invite {
        let mut link = self.base.clone();
        link.set_query(None);
        link.set_fragment(None);
        if let Ok(mut segments) = link.path_segments_mut() {
            segments.pop_if_empty().push(INVITE_PATH);
        }
        link.query_pairs_mut()
            .append_pair(target.kind(), &target.identifier())
            .append_pair(PERMISSION_PARAM, permission.as_str());

        Invite {
            target,
            permission,
            link,
        }
    }
}

impl Default for InviteIssuer {
    fn default() -> Self {
        Self {
            base: Url::parse(DEFAULT_INVITE_BASE).expect("default invite base must parse"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_folder_invite_format() {
        let folder = FolderId::generate();
        let invite = InviteIssuer::default().issue(folder.into(), Permission::Reader);
        assert_eq!(
            invite.link().as_str(),
            format!("https://example.com/invite?folder={}&permission=reader", folder)
        );
    }

    #[test]
    fn test_item_invite_format() {
        let item = ItemId::generate();
        let invite = InviteIssuer::default().issue(item.into(), Permission::Writer);
        assert_eq!(
            invite.to_string(),
            format!("https://example.com/invite?item={}&permission=writer", item)
        );
    }

    #[test]
    fn test_issue_is_deterministic() {
        let issuer = InviteIssuer::default();
        let folder = FolderId::generate();
        assert_eq!(
            issuer.issue(folder.into(), Permission::Reader),
            issuer.issue(folder.into(), Permission::Reader)
        );
        assert_ne!(
            issuer.issue(folder.into(), Permission::Reader),
            issuer.issue(folder.into(), Permission::Writer)
        );
    }

    #[test]
    fn test_base_with_path() {
        let issuer = InviteIssuer::new("https://vault.example.org/app/").unwrap();
        let folder = FolderId::generate();
        let invite = issuer.issue(folder.into(), Permission::Reader);
        assert!(invite
            .link()
            .as_str()
            .starts_with("https://vault.example.org/app/invite?folder="));
    }

    #[test]
    fn test_invalid_base() {
        assert!(matches!(
            InviteIssuer::new("not a url"),
            Err(InviteError::InvalidBase(_))
        ));
        assert!(matches!(
            InviteIssuer::new("mailto:someone@example.com"),
            Err(InviteError::InvalidBase(_))
        ));
    }

    #[test]
    fn test_parse_ignores_unknown_parameters() {
        let folder = FolderId::generate();
        let link = format!(
            "https://example.com/invite?utm=mail&folder={}&permission=writer&x=1",
            folder
        );
        let invite = Invite::parse(&link).unwrap();
        assert_eq!(invite.target(), &InviteTarget::Folder(folder));
        assert_eq!(invite.permission(), Permission::Writer);
    }

    #[test]
    fn test_parse_requires_both_parameters() {
        let folder = FolderId::generate();
        assert!(matches!(
            Invite::parse(&format!("https://example.com/invite?folder={}", folder)),
            Err(InviteError::MissingParameter("permission"))
        ));
        assert!(matches!(
            Invite::parse("https://example.com/invite?permission=reader"),
            Err(InviteError::MissingParameter(_))
        ));
    }

    #[test]
    fn test_parse_rejects_bad_values() {
        let folder = FolderId::generate();
        assert!(matches!(
            Invite::parse(&format!(
                "https://example.com/invite?folder={}&permission=admin",
                folder
            )),
            Err(InviteError::InvalidPermission(_))
        ));
        assert!(matches!(
            Invite::parse("https://example.com/invite?folder=Personal&permission=reader"),
            Err(InviteError::InvalidTarget(_))
        ));
        assert!(matches!(
            Invite::parse(&format!(
                "https://example.com/share?folder={}&permission=reader",
                folder
            )),
            Err(InviteError::InvalidLink(_))
        ));
    }

    #[test]
    fn test_parse_round_trips_issued_link() {
        let invite = InviteIssuer::default().issue(ItemId::generate().into(), Permission::Reader);
        assert_eq!(Invite::parse(invite.link().as_str()).unwrap(), invite);
    }
}
