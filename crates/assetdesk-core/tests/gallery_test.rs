//! Gallery listing, grouping and bulk download.
//!
//! Run with: `cargo test -p assetdesk-core --test gallery_test`

mod helpers;

use assetdesk_core::models::{Asset, AssetKind};
use assetdesk_core::{AppError, AssetGallery, DataUrl, DirectoryTarget, DownloadTarget};
use async_trait::async_trait;
use chrono::Utc;
use helpers::{png_bytes, FakeBackend};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;
use uuid::Uuid;

fn stored(name: &str, category: &str, url: String) -> Asset {
    Asset {
        id: Uuid::new_v4(),
        name: name.to_string(),
        kind: AssetKind::Image,
        category: category.to_string(),
        description: None,
        url,
        file_size: None,
        created_at: Utc::now(),
        user_id: None,
    }
}

#[tokio::test]
async fn test_refresh_groups_by_category() {
    let png = DataUrl::encode("image/png", &png_bytes()).to_string();
    let backend = FakeBackend::new().with_assets(vec![
        stored("Logo", "logo", png.clone()),
        stored("Hero", "image", png.clone()),
        stored("Mark", "logo", png),
    ]);
    let mut gallery = AssetGallery::new();

    gallery.refresh(&backend).await.unwrap();

    let groups = gallery.grouped_by_category();
    let keys: Vec<_> = groups.keys().copied().collect();
    assert_eq!(keys, vec!["image", "logo"]);
    let logos: Vec<_> = groups["logo"].iter().map(|a| a.name.as_str()).collect();
    assert_eq!(logos, vec!["Logo", "Mark"]);
}

#[tokio::test]
async fn test_refresh_drops_stale_selection() {
    let png = DataUrl::encode("image/png", &png_bytes()).to_string();
    let keep = stored("Keep", "image", png.clone());
    let gone = stored("Gone", "image", png);
    let backend = FakeBackend::new().with_assets(vec![keep.clone(), gone.clone()]);
    let mut gallery = AssetGallery::new();
    gallery.refresh(&backend).await.unwrap();
    gallery.select_all();

    let backend = FakeBackend::new().with_assets(vec![keep.clone()]);
    gallery.refresh(&backend).await.unwrap();

    assert_eq!(gallery.selected_ids(), vec![keep.id]);
}

#[tokio::test]
async fn test_bulk_download_writes_decoded_files() {
    let dir = tempfile::tempdir().unwrap();
    let logo = stored(
        "Logo",
        "logo",
        DataUrl::encode("image/png", &png_bytes()).to_string(),
    );
    let remote = stored("Remote", "image", "https://cdn.example.com/r.png".to_string());
    let backend = FakeBackend::new().with_assets(vec![logo.clone(), remote.clone()]);
    let mut gallery = AssetGallery::new();
    gallery.refresh(&backend).await.unwrap();

    let target = DirectoryTarget::new(dir.path());
    let outcome = gallery
        .bulk_download(
            &backend,
            &[logo.id, remote.id, Uuid::new_v4()],
            &target,
            Duration::ZERO,
        )
        .await;

    assert_eq!(outcome.succeeded, 1);
    assert_eq!(outcome.failed, 2);
    assert_eq!(outcome.failures[0].name, "Remote");
    assert_eq!(std::fs::read(dir.path().join("Logo.png")).unwrap(), png_bytes());
}

/// Records when each file arrives instead of writing it.
#[derive(Default)]
struct RecordingTarget {
    saved: Mutex<Vec<(String, Instant)>>,
}

#[async_trait]
impl DownloadTarget for RecordingTarget {
    async fn save(&self, file_name: &str, _bytes: &[u8]) -> Result<PathBuf, AppError> {
        self.saved
            .lock()
            .unwrap()
            .push((file_name.to_string(), Instant::now()));
        Ok(PathBuf::from(file_name))
    }
}

#[tokio::test(start_paused = true)]
async fn test_bulk_download_pauses_between_items() {
    let png = DataUrl::encode("image/png", &png_bytes()).to_string();
    let assets = vec![
        stored("One", "image", png.clone()),
        stored("Two", "image", png.clone()),
        stored("Three", "image", png),
    ];
    let ids: Vec<Uuid> = assets.iter().map(|a| a.id).collect();
    let backend = FakeBackend::new().with_assets(assets);
    let mut gallery = AssetGallery::new();
    gallery.refresh(&backend).await.unwrap();

    let delay = Duration::from_millis(100);
    let target = RecordingTarget::default();
    let start = Instant::now();
    let outcome = gallery.bulk_download(&backend, &ids, &target, delay).await;

    assert_eq!(outcome.succeeded, 3);
    let saved = target.saved.lock().unwrap();
    let names: Vec<&str> = saved.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, vec!["One.png", "Two.png", "Three.png"]);
    // no pause before the first item
    assert!(saved[0].1 - start < delay);
    for pair in saved.windows(2) {
        assert!(pair[1].1 - pair[0].1 >= delay);
    }
}

#[tokio::test]
async fn test_bulk_delete_keeps_failed_ids_selected() {
    let png = DataUrl::encode("image/png", &png_bytes()).to_string();
    let gone = stored("Gone", "image", png.clone());
    let stuck = stored("Stuck", "image", png);
    let backend = FakeBackend::new()
        .with_assets(vec![gone.clone(), stuck.clone()])
        .fail_delete_of(stuck.id);
    let mut gallery = AssetGallery::new();
    gallery.refresh(&backend).await.unwrap();
    gallery.select_all();

    let outcome = gallery
        .bulk_delete(&backend, &[gone.id, stuck.id])
        .await
        .unwrap();

    assert_eq!(outcome.succeeded, 1);
    assert_eq!(outcome.failed, 1);
    assert_eq!(outcome.deleted, vec![gone.id]);
    assert_eq!(gallery.selected_ids(), vec![stuck.id]);
    let remaining: Vec<Uuid> = gallery.assets().iter().map(|a| a.id).collect();
    assert_eq!(remaining, vec![stuck.id]);
}
