//! Password items and the shapes used to create and edit them.
//!
//! - **[`PasswordItem`]**: the stored record
//! - **[`ItemDraft`]**: caller input for a new item, validated before anything
//!   is written
//! - **[`ItemChanges`]**: a partial update; only the fields that are set are
//!   applied (diff-apply), everything else stays as it was

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use super::ids::{FolderId, ItemId};
use super::list::{Identified, SoftDelete};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordItem {
    pub id: ItemId,
    pub name: String,
    pub username: Option<String>,
    /// CSS selector of the username input on the target site.
    pub username_input_selector: Option<String>,
    pub password: String,
    /// CSS selector of the password input on the target site.
    pub password_input_selector: Option<String>,
    pub uri: Option<String>,
    /// Back-reference to the owning folder.
    pub folder: FolderId,
    /// Soft-delete marker. Once set it is never cleared.
    #[serde(default)]
    pub deleted: bool,
}

impl PasswordItem {
    /// Build a record from a draft.
    ///
    /// The draft is expected to have been validated; `folder` is the resolved
    /// folder selection.
    pub(crate) fn from_draft(draft: ItemDraft, folder: FolderId) -> Self {
        Self {
            id: ItemId::generate(),
            name: draft.name,
            username: non_empty(draft.username),
            username_input_selector: non_empty(draft.username_input_selector),
            password: draft.password,
            password_input_selector: non_empty(draft.password_input_selector),
            uri: non_empty(draft.uri),
            folder,
            deleted: false,
        }
    }
}

impl Identified for PasswordItem {
    type Id = ItemId;

    fn id(&self) -> ItemId {
        self.id
    }
}

impl SoftDelete for PasswordItem {
    fn is_deleted(&self) -> bool {
        self.deleted
    }
}

/// Input for creating a password item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDraft {
    pub name: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub username_input_selector: Option<String>,
    pub password: String,
    #[serde(default)]
    pub password_input_selector: Option<String>,
    #[serde(default)]
    pub uri: Option<String>,
    /// Selected folder. `None` is reported as a validation message.
    #[serde(default)]
    pub folder: Option<FolderId>,
}

impl ItemDraft {
    pub fn new(name: impl Into<String>, password: impl Into<String>, folder: FolderId) -> Self {
        Self {
            name: name.into(),
            password: password.into(),
            folder: Some(folder),
            ..Default::default()
        }
    }

    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }

    pub fn username_input_selector(mut self, selector: impl Into<String>) -> Self {
        self.username_input_selector = Some(selector.into());
        self
    }

    pub fn password_input_selector(mut self, selector: impl Into<String>) -> Self {
        self.password_input_selector = Some(selector.into());
        self
    }
}

/// A partial update to a [`PasswordItem`].
///
/// Optional item fields use a double option: `None` leaves the field alone,
/// `Some(None)` clears it, `Some(Some(v))` sets it. `deleted` is not part of
/// the diff.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemChanges {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub username: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub username_input_selector: Option<Option<String>>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub password_input_selector: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub uri: Option<Option<String>>,
    /// Reassign the item to another folder (moves it between lists).
    #[serde(default)]
    pub folder: Option<FolderId>,
}

impl ItemChanges {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    pub fn username(mut self, username: Option<String>) -> Self {
        self.username = Some(username);
        self
    }

    pub fn username_input_selector(mut self, selector: Option<String>) -> Self {
        self.username_input_selector = Some(selector);
        self
    }

    pub fn password_input_selector(mut self, selector: Option<String>) -> Self {
        self.password_input_selector = Some(selector);
        self
    }

    pub fn uri(mut self, uri: Option<String>) -> Self {
        self.uri = Some(uri);
        self
    }

    pub fn folder(mut self, folder: FolderId) -> Self {
        self.folder = Some(folder);
        self
    }

    /// Compute the changes that turn `original` into the edited `draft`.
    ///
    /// Fields equal on both sides are left out, so applying the result
    /// touches only what the editor actually changed.
    pub fn between(original: &PasswordItem, draft: &ItemDraft) -> Self {
        fn optional(current: &Option<String>, edited: &Option<String>) -> Option<Option<String>> {
            let edited = non_empty(edited.clone());
            (current != &edited).then_some(edited)
        }

        Self {
            name: (original.name != draft.name).then(|| draft.name.clone()),
            username: optional(&original.username, &draft.username),
            username_input_selector: optional(
                &original.username_input_selector,
                &draft.username_input_selector,
            ),
            password: (original.password != draft.password).then(|| draft.password.clone()),
            password_input_selector: optional(
                &original.password_input_selector,
                &draft.password_input_selector,
            ),
            uri: optional(&original.uri, &draft.uri),
            folder: draft.folder.filter(|folder| *folder != original.folder),
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Names of the fields this diff touches, for logging.
    pub fn fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.name.is_some() {
            fields.push("name");
        }
        if self.username.is_some() {
            fields.push("username");
        }
        if self.username_input_selector.is_some() {
            fields.push("username_input_selector");
        }
        if self.password.is_some() {
            fields.push("password");
        }
        if self.password_input_selector.is_some() {
            fields.push("password_input_selector");
        }
        if self.uri.is_some() {
            fields.push("uri");
        }
        if self.folder.is_some() {
            fields.push("folder");
        }
        fields
    }

    /// Apply the set fields to `item`, leaving all others untouched.
    pub fn apply_to(&self, item: &mut PasswordItem) {
        if let Some(name) = &self.name {
            item.name = name.clone();
        }
        if let Some(username) = &self.username {
            item.username = non_empty(username.clone());
        }
        if let Some(selector) = &self.username_input_selector {
            item.username_input_selector = non_empty(selector.clone());
        }
        if let Some(password) = &self.password {
            item.password = password.clone();
        }
        if let Some(selector) = &self.password_input_selector {
            item.password_input_selector = non_empty(selector.clone());
        }
        if let Some(uri) = &self.uri {
            item.uri = non_empty(uri.clone());
        }
        if let Some(folder) = self.folder {
            item.folder = folder;
        }
    }
}

/// Empty form inputs mean "not set".
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gmail() -> PasswordItem {
        let draft = ItemDraft::new("Gmail", "password123", FolderId::generate())
            .username("user@gmail.com")
            .uri("https://gmail.com");
        let folder = draft.folder.unwrap();
        PasswordItem::from_draft(draft, folder)
    }

    #[test]
    fn test_from_draft_drops_empty_optionals() {
        let mut draft = ItemDraft::new("Gmail", "password123", FolderId::generate());
        draft.username = Some(String::new());
        draft.uri = Some(String::new());
        let folder = draft.folder.unwrap();
        let item = PasswordItem::from_draft(draft, folder);
        assert_eq!(item.username, None);
        assert_eq!(item.uri, None);
        assert!(!item.deleted);
    }

    #[test]
    fn test_apply_only_set_fields() {
        let mut item = gmail();
        let before = item.clone();
        ItemChanges::new().name("X").apply_to(&mut item);

        assert_eq!(item.name, "X");
        assert_eq!(item.username, before.username);
        assert_eq!(item.password, before.password);
        assert_eq!(item.uri, before.uri);
        assert_eq!(item.folder, before.folder);
        assert_eq!(item.id, before.id);
    }

    #[test]
    fn test_double_option_clears() {
        let mut item = gmail();
        ItemChanges::new().uri(None).apply_to(&mut item);
        assert_eq!(item.uri, None);
        assert_eq!(item.username.as_deref(), Some("user@gmail.com"));
    }

    #[test]
    fn test_between_only_reports_edits() {
        let item = gmail();
        let mut draft = ItemDraft::new(item.name.clone(), item.password.clone(), item.folder)
            .username("user@gmail.com")
            .uri("https://mail.google.com");
        draft.username_input_selector = Some(String::new());

        let changes = ItemChanges::between(&item, &draft);
        assert_eq!(changes.fields(), vec!["uri"]);
        assert_eq!(
            changes.uri,
            Some(Some("https://mail.google.com".to_string()))
        );
    }

    #[test]
    fn test_changes_serialize_distinguishes_clear() {
        let changes = ItemChanges::new().uri(None);
        let json = serde_json::to_string(&changes).unwrap();
        assert_eq!(json, r#"{"uri":null}"#);

        let decoded: ItemChanges = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, changes);

        let untouched: ItemChanges = serde_json::from_str("{}").unwrap();
        assert!(untouched.is_empty());
    }
}
