//! Integration tests for item save, update and delete

mod common;

use ::common::store::VaultStore;
use ::common::vault::{ItemChanges, ItemDraft, VaultError};

#[tokio::test]
async fn test_save_allows_duplicate_names() {
    let (vault, _) = common::setup_vault().await;
    let folder = vault.create_folder("Personal").await.unwrap();

    let draft = ItemDraft::new("Gmail", "password123", *folder.id());
    let first = vault.save_item(draft.clone()).await.unwrap();
    let second = vault.save_item(draft).await.unwrap();

    assert_ne!(first.id, second.id);
    assert_eq!(vault.items(folder.id()).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_short_password_rejected_on_create() {
    let (vault, store) = common::setup_vault().await;
    let folder = vault.create_folder("Personal").await.unwrap();

    for password in ["", "a", "1234567"] {
        let result = vault
            .save_item(ItemDraft::new("Gmail", password, *folder.id()))
            .await;
        match result {
            Err(VaultError::ValidationFailed(errors)) => {
                assert!(errors.get("password").is_some());
            }
            other => panic!("expected validation failure, got {:?}", other),
        }
    }

    assert!(store.items(folder.items()).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_short_password_rejected_on_update() {
    let (vault, store) = common::setup_vault().await;
    let (folder, item) = common::folder_with_item(&vault, "Personal", "Gmail").await;
    let before = store.items(folder.items()).await.unwrap();

    let result = vault
        .update_item(&item, ItemChanges::new().name("X").password("short"))
        .await;
    match result {
        Err(VaultError::ValidationFailed(errors)) => {
            assert_eq!(
                errors.get("password"),
                Some("Password must be at least 8 characters long")
            );
        }
        other => panic!("expected validation failure, got {:?}", other),
    }

    assert_eq!(store.items(folder.items()).await.unwrap(), before);
}

#[tokio::test]
async fn test_invalid_uri_rejected() {
    let (vault, _) = common::setup_vault().await;
    let (_, item) = common::folder_with_item(&vault, "Personal", "Gmail").await;

    let result = vault
        .update_item(&item, ItemChanges::new().uri(Some("gmail.com".to_string())))
        .await;
    assert!(matches!(result, Err(VaultError::ValidationFailed(e)) if e.get("uri").is_some()));
}

#[tokio::test]
async fn test_update_changes_only_given_fields() {
    let (vault, store) = common::setup_vault().await;
    let (folder, item) = common::folder_with_item(&vault, "Personal", "Gmail").await;

    let updated = vault
        .update_item(&item, ItemChanges::new().name("X"))
        .await
        .unwrap();
    assert_eq!(updated.name, "X");

    let items = store.items(folder.items()).await.unwrap();
    let stored = items.find_by_identity(item.id).unwrap();
    assert_eq!(stored.name, "X");
    assert_eq!(stored.username, item.username);
    assert_eq!(stored.username_input_selector, item.username_input_selector);
    assert_eq!(stored.password, item.password);
    assert_eq!(stored.password_input_selector, item.password_input_selector);
    assert_eq!(stored.uri, item.uri);
    assert_eq!(stored.folder, item.folder);
    assert_eq!(stored.deleted, item.deleted);
}

#[tokio::test]
async fn test_update_applies_to_stored_copy() {
    let (vault, _) = common::setup_vault().await;
    let (_, item) = common::folder_with_item(&vault, "Personal", "Gmail").await;

    // a stale copy must not roll back fields changed since
    vault
        .update_item(&item, ItemChanges::new().password("newpassword1"))
        .await
        .unwrap();
    let updated = vault
        .update_item(&item, ItemChanges::new().name("Mail"))
        .await
        .unwrap();

    assert_eq!(updated.name, "Mail");
    assert_eq!(updated.password, "newpassword1");
}

#[tokio::test]
async fn test_update_missing_item() {
    let (vault, _) = common::setup_vault().await;
    let (_, mut item) = common::folder_with_item(&vault, "Work", "Gmail").await;
    let other = vault.create_folder("Other").await.unwrap();

    // points at a folder whose list never held the item
    item.folder = *other.id();
    let result = vault.update_item(&item, ItemChanges::new().name("X")).await;
    assert!(matches!(result, Err(VaultError::ItemNotFound(_))));
}

#[tokio::test]
async fn test_update_never_resurrects() {
    let (vault, _) = common::setup_vault().await;
    let (folder, item) = common::folder_with_item(&vault, "Personal", "Gmail").await;

    vault.delete_item(&item).await.unwrap();
    let updated = vault
        .update_item(&item, ItemChanges::new().name("X"))
        .await
        .unwrap();

    assert!(updated.deleted);
    assert!(vault.items(folder.id()).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_move_between_folders() {
    let (vault, store) = common::setup_vault().await;
    let (personal, item) = common::folder_with_item(&vault, "Personal", "Gmail").await;
    let work = vault.create_folder("Work").await.unwrap();

    let moved = vault
        .update_item(&item, ItemChanges::new().folder(*work.id()).name("Work mail"))
        .await
        .unwrap();
    assert_eq!(moved.folder, *work.id());
    assert_eq!(moved.id, item.id);
    assert_eq!(moved.name, "Work mail");

    let old = store.items(personal.items()).await.unwrap();
    assert!(old.find_by_identity(item.id).is_none());

    let new = vault.items(work.id()).await.unwrap();
    assert_eq!(new, vec![moved]);
}

#[tokio::test]
async fn test_move_to_missing_folder() {
    let (vault, store) = common::setup_vault().await;
    let (personal, item) = common::folder_with_item(&vault, "Personal", "Gmail").await;

    let result = vault
        .update_item(
            &item,
            ItemChanges::new().folder(::common::vault::FolderId::generate()),
        )
        .await;
    assert!(matches!(result, Err(VaultError::FolderNotFound(_))));
    assert_eq!(store.items(personal.items()).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_delete_is_idempotent() {
    let (vault, store) = common::setup_vault().await;
    let (folder, item) = common::folder_with_item(&vault, "Personal", "Gmail").await;

    vault.delete_item(&item).await.unwrap();
    assert!(vault.items(folder.id()).await.unwrap().is_empty());

    vault.delete_item(&item).await.unwrap();
    let raw = store.items(folder.items()).await.unwrap();
    assert_eq!(raw.len(), 1);
    assert!(raw.find_by_identity(item.id).unwrap().deleted);
}

#[tokio::test]
async fn test_delete_in_missing_folder() {
    let (vault, _) = common::setup_vault().await;
    let (_, mut item) = common::folder_with_item(&vault, "Personal", "Gmail").await;

    item.folder = ::common::vault::FolderId::generate();
    let result = vault.delete_item(&item).await;
    assert!(matches!(result, Err(VaultError::FolderNotFound(_))));
}

#[tokio::test]
async fn test_items_in_filter() {
    let (vault, _) = common::setup_vault().await;
    common::folder_with_item(&vault, "Personal", "Gmail").await;
    common::folder_with_item(&vault, "Work", "Jira").await;

    let all: Vec<_> = vault
        .items_in(None)
        .await
        .unwrap()
        .into_iter()
        .map(|i| i.name)
        .collect();
    assert_eq!(all, vec!["Gmail", "Jira"]);

    let work = vault.items_in(Some("Work")).await.unwrap();
    assert_eq!(work.len(), 1);
    assert_eq!(work[0].name, "Jira");
}
