//! On-disk store behavior

use mdocx_store::{MarkdownStore, StoreError};
use pretty_assertions::assert_eq;

#[tokio::test]
async fn test_round_trip_is_byte_exact() {
    let dir = tempfile::tempdir().unwrap();
    let store = MarkdownStore::open(dir.path().join("files.db")).await.unwrap();

    let content = "# Ünïcödé\r\n\n| a | b |\n\t$x^2$ \u{1F600}\n";
    let id = store.create("unicode.md", content).await.unwrap();
    assert_eq!(store.read(id).await.unwrap(), content);
}

#[tokio::test]
async fn test_data_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("files.db");

    let id = {
        let store = MarkdownStore::open(&path).await.unwrap();
        let id = store.create("kept.md", "still here").await.unwrap();
        store.close().await;
        id
    };

    let reopened = MarkdownStore::open(&path).await.unwrap();
    assert_eq!(reopened.read(id).await.unwrap(), "still here");
    assert_eq!(reopened.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_ids_keep_increasing_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("files.db");

    let store = MarkdownStore::open(&path).await.unwrap();
    let first = store.create("a.md", "a").await.unwrap();
    store.delete(first).await.unwrap();
    store.close().await;

    let reopened = MarkdownStore::open(&path).await.unwrap();
    let second = reopened.create("b.md", "b").await.unwrap();
    assert!(second > first);
}

#[tokio::test]
async fn test_delete_is_visible_to_other_handles() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("files.db");

    let writer = MarkdownStore::open(&path).await.unwrap();
    let reader = MarkdownStore::open(&path).await.unwrap();

    let id = writer.create("shared.md", "x").await.unwrap();
    assert_eq!(reader.read(id).await.unwrap(), "x");

    writer.delete(id).await.unwrap();
    assert!(matches!(reader.read(id).await, Err(StoreError::NotFound(i)) if i == id));
}

#[tokio::test]
async fn test_empty_store_lists_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let store = MarkdownStore::open(dir.path().join("empty.db")).await.unwrap();
    assert!(store.list().await.unwrap().is_empty());
}
