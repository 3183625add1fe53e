//! Trait for the remote asset store.
//!
//! The pipeline only talks to the asset API through this trait. The REST client
//! in `assetdesk-api-client` implements it; tests use an in-memory store.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{Asset, NewAsset};

#[async_trait]
pub trait AssetBackend: Send + Sync {
    /// `POST /assets`
    async fn create_asset(&self, asset: NewAsset) -> Result<Asset, AppError>;

    /// `DELETE /assets/{id}`
    async fn delete_asset(&self, id: Uuid) -> Result<(), AppError>;

    /// `GET /assets`
    async fn list_assets(&self) -> Result<Vec<Asset>, AppError>;

    /// Download the content behind a non-data asset URL.
    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, AppError>;
}

#[async_trait]
impl<T: AssetBackend + ?Sized> AssetBackend for std::sync::Arc<T> {
    async fn create_asset(&self, asset: NewAsset) -> Result<Asset, AppError> {
        (**self).create_asset(asset).await
    }

    async fn delete_asset(&self, id: Uuid) -> Result<(), AppError> {
        (**self).delete_asset(id).await
    }

    async fn list_assets(&self) -> Result<Vec<Asset>, AppError> {
        (**self).list_assets().await
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, AppError> {
        (**self).fetch_bytes(url).await
    }
}
