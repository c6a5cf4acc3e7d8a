use std::sync::Arc;

use tempfile::tempdir;
use vinho::{
    CredentialKey, CredentialStore, InMemoryCredentialStore, JsonCredentialStore,
    LoadCredentialUseCase, SaveCredentialUseCase,
};

#[tokio::test]
async fn missing_file_reads_as_empty() {
    let dir = tempdir().expect("tempdir");
    let store = JsonCredentialStore::in_dir(dir.path());

    assert_eq!(store.get(CredentialKey::ChatApiKey).await.expect("get"), None);
    assert!(!store.path().exists());
}

#[tokio::test]
async fn set_then_get_survives_a_new_instance() {
    let dir = tempdir().expect("tempdir");

    let store = JsonCredentialStore::in_dir(dir.path());
    store
        .set(CredentialKey::ChatApiKey, "sk-chat")
        .await
        .expect("set chat");
    store
        .set(CredentialKey::VisionApiKey, "vision-key")
        .await
        .expect("set vision");

    let reopened = JsonCredentialStore::in_dir(dir.path());
    assert_eq!(
        reopened.get(CredentialKey::ChatApiKey).await.expect("get"),
        Some("sk-chat".to_string())
    );
    assert_eq!(
        reopened.get(CredentialKey::VisionApiKey).await.expect("get"),
        Some("vision-key".to_string())
    );

    let raw = std::fs::read_to_string(reopened.path()).expect("read");
    let json: serde_json::Value = serde_json::from_str(&raw).expect("json");
    assert_eq!(json["chatApiKey"], "sk-chat");
    assert_eq!(json["visionApiKey"], "vision-key");
}

#[tokio::test]
async fn clear_removes_only_that_key() {
    let dir = tempdir().expect("tempdir");
    let store = JsonCredentialStore::in_dir(dir.path());

    store.set(CredentialKey::ChatApiKey, "a").await.expect("set");
    store.set(CredentialKey::VisionApiKey, "b").await.expect("set");
    store.clear(CredentialKey::ChatApiKey).await.expect("clear");
    store.clear(CredentialKey::ChatApiKey).await.expect("clear twice");

    assert_eq!(store.get(CredentialKey::ChatApiKey).await.expect("get"), None);
    assert_eq!(
        store.get(CredentialKey::VisionApiKey).await.expect("get"),
        Some("b".to_string())
    );
}

#[tokio::test]
async fn corrupt_file_is_a_storage_error() {
    let dir = tempdir().expect("tempdir");
    let store = JsonCredentialStore::in_dir(dir.path());
    std::fs::write(store.path(), "{not json").expect("write");

    let err = store.get(CredentialKey::ChatApiKey).await.unwrap_err();
    assert!(matches!(err, vinho::DomainError::StorageError(_)));
}

#[cfg(unix)]
#[tokio::test]
async fn file_is_private_to_owner() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().expect("tempdir");
    let store = JsonCredentialStore::in_dir(dir.path());
    store.set(CredentialKey::ChatApiKey, "a").await.expect("set");

    let mode = std::fs::metadata(store.path()).expect("metadata").permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}

#[tokio::test]
async fn load_returns_empty_credential_when_unset() {
    let store = Arc::new(InMemoryCredentialStore::new());
    let credential = LoadCredentialUseCase::new(store)
        .execute(CredentialKey::ChatApiKey)
        .await
        .expect("load");

    assert!(credential.is_empty());
}

#[tokio::test]
async fn saved_empty_value_loads_as_empty_credential() {
    let store = Arc::new(InMemoryCredentialStore::new());
    SaveCredentialUseCase::new(store.clone())
        .execute(CredentialKey::ChatApiKey, "")
        .await
        .expect("save");

    let credential = LoadCredentialUseCase::new(store.clone())
        .execute(CredentialKey::ChatApiKey)
        .await
        .expect("load");
    assert!(credential.is_empty());
    assert_eq!(
        store.get(CredentialKey::ChatApiKey).await.expect("get"),
        Some(String::new())
    );
}

#[tokio::test]
async fn override_wins_over_stored_value() {
    let store = Arc::new(InMemoryCredentialStore::new());
    store
        .set(CredentialKey::ChatApiKey, "stored")
        .await
        .expect("set");

    let credential = LoadCredentialUseCase::new(store)
        .with_override(CredentialKey::ChatApiKey, "from-env")
        .execute(CredentialKey::ChatApiKey)
        .await
        .expect("load");

    assert_eq!(credential.expose(), "from-env");
}
