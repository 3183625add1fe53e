//! Test helpers: an in-memory asset store and a config tuned for fast tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use assetdesk_core::models::{Asset, NewAsset};
use assetdesk_core::{AppError, AssetBackend, DeskConfig};
use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

/// Asset store kept in memory. `fail_create_on(n)` makes the n-th create
/// call (1-based) fail with a server error.
#[derive(Default)]
pub struct FakeBackend {
    assets: Mutex<Vec<Asset>>,
    fail_create_on: Option<usize>,
    fail_delete_of: Option<Uuid>,
    pub create_calls: AtomicUsize,
    pub delete_calls: AtomicUsize,
    pub list_calls: AtomicUsize,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_create_on(mut self, call: usize) -> Self {
        self.fail_create_on = Some(call);
        self
    }

    pub fn fail_delete_of(mut self, id: Uuid) -> Self {
        self.fail_delete_of = Some(id);
        self
    }

    pub fn with_assets(self, assets: Vec<Asset>) -> Self {
        *self.assets.lock().unwrap() = assets;
        self
    }

    pub fn stored(&self) -> Vec<Asset> {
        self.assets.lock().unwrap().clone()
    }

    pub fn creates(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AssetBackend for FakeBackend {
    async fn create_asset(&self, asset: NewAsset) -> Result<Asset, AppError> {
        let call = self.create_calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_create_on == Some(call) {
            return Err(AppError::Api {
                status: 500,
                message: "storage unavailable".to_string(),
            });
        }

        let created = Asset {
            id: Uuid::new_v4(),
            name: asset.name,
            kind: asset.kind,
            category: asset.category,
            description: asset.description,
            url: asset.url,
            file_size: Some(asset.file_size as i64),
            created_at: Utc::now(),
            user_id: None,
        };
        self.assets.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn delete_asset(&self, id: Uuid) -> Result<(), AppError> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_delete_of == Some(id) {
            return Err(AppError::Api {
                status: 409,
                message: "asset is in use".to_string(),
            });
        }
        let mut assets = self.assets.lock().unwrap();
        let before = assets.len();
        assets.retain(|a| a.id != id);
        if assets.len() == before {
            return Err(AppError::NotFound(format!("Asset {} not found", id)));
        }
        Ok(())
    }

    async fn list_assets(&self) -> Result<Vec<Asset>, AppError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.stored())
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, AppError> {
        Err(AppError::Network(format!("no network in tests: {}", url)))
    }
}

/// Config with no download pause and no auto-dismiss racing the assertions.
pub fn test_config() -> DeskConfig {
    DeskConfig {
        download_delay: Duration::ZERO,
        notice_dismiss_after: Duration::from_secs(3600),
        ..DeskConfig::default()
    }
}

pub fn png_bytes() -> Vec<u8> {
    vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 13]
}
