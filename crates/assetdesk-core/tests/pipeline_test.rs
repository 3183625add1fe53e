//! Ingest → submit → refresh against an in-memory asset store.
//!
//! Run with: `cargo test -p assetdesk-core --test pipeline_test`

mod helpers;

use std::sync::Arc;

use assetdesk_core::models::PendingFilePatch;
use assetdesk_core::{
    AppError, AssetDesk, DataUrl, ErrorClass, FileSource, MemoryFile, NoticeLevel,
};
use helpers::{png_bytes, test_config, FakeBackend};

fn desk(backend: FakeBackend) -> (AssetDesk<Arc<FakeBackend>>, Arc<FakeBackend>) {
    let backend = Arc::new(backend);
    (AssetDesk::new(backend.clone(), &test_config()), backend)
}

#[tokio::test]
async fn test_ingest_classifies_and_queues() {
    let (mut desk, _) = desk(FakeBackend::new());
    let logo = MemoryFile::new("company-logo.png", Some("image/png"), png_bytes());
    let report = MemoryFile::new("Q1-report.pdf", Some("application/pdf"), b"%PDF-1.7".to_vec());

    let result = desk.ingest(&[&logo, &report]).await;

    assert!(result.is_clean());
    assert_eq!(result.accepted.len(), 2);
    let entries = desk.queue().entries();
    assert_eq!(entries[0].name, "company-logo");
    assert_eq!(entries[0].category, "logo");
    assert_eq!(entries[1].name, "Q1-report");
    assert_eq!(entries[1].category, "document");
}

#[tokio::test]
async fn test_empty_and_oversized_files_never_enter_the_queue() {
    let (mut desk, _) = desk(FakeBackend::new());
    let limit = test_config().max_file_size_bytes as usize;
    let empty = MemoryFile::new("empty.png", Some("image/png"), Vec::new());
    let huge = MemoryFile::new("huge.bin", None, vec![0u8; limit + 1]);
    let ok = MemoryFile::new("ok.png", Some("image/png"), png_bytes());

    let result = desk.ingest(&[&empty, &huge, &ok]).await;

    assert_eq!(result.accepted.len(), 1);
    assert_eq!(result.rejected.len(), 2);
    assert!(matches!(result.rejected[0].1, AppError::EmptyFile(_)));
    assert!(matches!(result.rejected[1].1, AppError::FileTooLarge { .. }));
    assert!(result
        .rejected
        .iter()
        .all(|(_, e)| e.class() == ErrorClass::Admission));
    assert_eq!(desk.queue().len(), 1);
    assert_eq!(desk.queue().entries()[0].original_filename, "ok.png");
}

#[tokio::test]
async fn test_encoded_data_round_trips() {
    let (mut desk, _) = desk(FakeBackend::new());
    let bytes: Vec<u8> = (0..=255u8).cycle().take(70_000).collect();
    let file = MemoryFile::new("blob.bin", None, bytes.clone());

    desk.ingest(&[&file]).await;

    let entry = &desk.queue().entries()[0];
    let data_url = DataUrl::parse(&entry.encoded_data).unwrap();
    assert_eq!(data_url.mime_type, "application/octet-stream");
    assert_eq!(data_url.decode().unwrap(), bytes);
}

#[tokio::test]
async fn test_partial_failure_tallies_and_empties_queue() {
    let (mut desk, backend) = desk(FakeBackend::new().fail_create_on(2));
    let a = MemoryFile::new("a.png", Some("image/png"), png_bytes());
    let b = MemoryFile::new("b.png", Some("image/png"), png_bytes());
    let c = MemoryFile::new("c.png", Some("image/png"), png_bytes());
    desk.ingest(&[&a, &b, &c]).await;

    let outcome = desk.submit().await.unwrap();

    assert_eq!(outcome.succeeded, 2);
    assert_eq!(outcome.failed, 1);
    assert_eq!(outcome.failures[0].name, "b");
    assert!(desk.queue().is_empty());
    assert_eq!(backend.creates(), 3);
    // gallery refreshed from the store after the batch
    assert_eq!(desk.gallery().assets().len(), 2);

    let notice = desk.notifier().current().unwrap();
    assert_eq!(notice.level, NoticeLevel::Success);
    assert_eq!(notice.message, "Successfully uploaded 2 assets (1 failed)");
}

#[tokio::test]
async fn test_unnamed_entries_block_submission() {
    let (mut desk, backend) = desk(FakeBackend::new());
    let a = MemoryFile::new("a.png", Some("image/png"), png_bytes());
    let b = MemoryFile::new("b.png", Some("image/png"), png_bytes());
    let report = desk.ingest(&[&a, &b]).await;
    for id in &report.accepted {
        desk.queue_mut().update(id, PendingFilePatch::name("   "));
    }
    let before = desk.queue().entries().to_vec();

    let err = desk.submit().await.unwrap_err();

    assert!(matches!(err, AppError::Validation(_)));
    assert!(err.to_string().contains("a.png, b.png"));
    assert_eq!(desk.queue().entries(), before.as_slice());
    assert_eq!(backend.creates(), 0);
    assert_eq!(desk.notifier().current().unwrap().level, NoticeLevel::Error);
}

#[tokio::test]
async fn test_bulk_delete_removes_ids_from_refreshed_list() {
    let (mut desk, backend) = desk(FakeBackend::new());
    let files: Vec<MemoryFile> = ["a.png", "b.png", "c.png"]
        .iter()
        .map(|name| MemoryFile::new(*name, Some("image/png"), png_bytes()))
        .collect();
    let sources: Vec<&dyn FileSource> = files.iter().map(|f| f as &dyn FileSource).collect();
    desk.ingest(&sources).await;
    let created = desk.submit().await.unwrap().created;

    let doomed: Vec<_> = created.iter().take(2).map(|a| a.id).collect();
    desk.gallery_mut().toggle_select(doomed[0]);

    let outcome = desk.bulk_delete(&doomed).await.unwrap();

    assert_eq!(outcome.succeeded, 2);
    assert_eq!(outcome.failed, 0);
    let remaining: Vec<_> = desk.gallery().assets().iter().map(|a| a.id).collect();
    assert!(doomed.iter().all(|id| !remaining.contains(id)));
    assert_eq!(remaining, vec![created[2].id]);
    assert!(desk.gallery().selected_ids().is_empty());
    assert_eq!(backend.stored().len(), 1);
}

#[tokio::test]
async fn test_bulk_delete_counts_missing_ids_as_failures() {
    let (mut desk, _) = desk(FakeBackend::new());
    let outcome = desk.bulk_delete(&[uuid::Uuid::new_v4()]).await.unwrap();

    assert_eq!(outcome.succeeded, 0);
    assert_eq!(outcome.failed, 1);
    assert_eq!(
        desk.notifier().current().unwrap().message,
        "Failed to process 1 asset"
    );
}
