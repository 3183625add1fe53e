//! Asset endpoints and the [`AssetBackend`] implementation.

use assetdesk_core::models::{Asset, AssetEnvelope, AssetListEnvelope, NewAsset};
use assetdesk_core::{AppError, AssetBackend};
use async_trait::async_trait;
use uuid::Uuid;

use crate::ApiClient;

impl ApiClient {
    /// `POST /assets` with the encoded content inline.
    pub async fn create_asset(&self, asset: &NewAsset) -> Result<Asset, AppError> {
        let envelope: AssetEnvelope = self.post_json("/assets", asset).await?;
        tracing::debug!(asset_id = %envelope.asset.id, name = %envelope.asset.name, "Asset created");
        Ok(envelope.asset)
    }

    pub async fn delete_asset(&self, id: Uuid) -> Result<(), AppError> {
        self.delete(&format!("/assets/{}", id)).await
    }

    pub async fn list_assets(&self) -> Result<Vec<Asset>, AppError> {
        let envelope: AssetListEnvelope = self.get("/assets", &[]).await?;
        Ok(envelope.assets)
    }

    /// Content behind a stored asset URL that is not a data URL.
    pub async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, AppError> {
        if url.starts_with('/') {
            return self.get_bytes(&format!("{}{}", self.base_url(), url)).await;
        }
        self.get_bytes(url).await
    }
}

#[async_trait]
impl AssetBackend for ApiClient {
    async fn create_asset(&self, asset: NewAsset) -> Result<Asset, AppError> {
        ApiClient::create_asset(self, &asset).await
    }

    async fn delete_asset(&self, id: Uuid) -> Result<(), AppError> {
        ApiClient::delete_asset(self, id).await
    }

    async fn list_assets(&self) -> Result<Vec<Asset>, AppError> {
        ApiClient::list_assets(self).await
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, AppError> {
        ApiClient::fetch_bytes(self, url).await
    }
}
