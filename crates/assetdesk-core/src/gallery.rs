//! Persisted asset list plus the selection used by bulk actions.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::backend::AssetBackend;
use crate::batch::{BatchOutcome, BatchSubmitter, EntryFailure};
use crate::data_url::{extension_for_mime, DataUrl};
use crate::error::{log_error, AppError, ErrorMetadata};
use crate::models::{filter_by_kind, group_by_category, Asset, AssetKind};

/// Where downloaded asset content ends up.
#[async_trait]
pub trait DownloadTarget: Send + Sync {
    /// Store `bytes` under a name derived from `file_name`. Returns where it went.
    async fn save(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf, AppError>;
}

/// Writes downloads into a directory, never overwriting existing files.
#[derive(Debug, Clone)]
pub struct DirectoryTarget {
    dir: PathBuf,
}

impl DirectoryTarget {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `name`, then `stem (1).ext`, `stem (2).ext`, ...
    fn candidate(&self, name: &str, attempt: u32) -> PathBuf {
        if attempt == 0 {
            return self.dir.join(name);
        }
        match name.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => {
                self.dir.join(format!("{} ({}).{}", stem, attempt, ext))
            }
            _ => self.dir.join(format!("{} ({})", name, attempt)),
        }
    }
}

#[async_trait]
impl DownloadTarget for DirectoryTarget {
    async fn save(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf, AppError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let name = sanitize_file_name(file_name);

        let mut attempt = 0u32;
        loop {
            let path = self.candidate(&name, attempt);
            let opened = tokio::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await;
            match opened {
                Ok(mut file) => {
                    file.write_all(bytes).await?;
                    file.flush().await?;
                    return Ok(path);
                }
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                    attempt = attempt.checked_add(1).ok_or_else(|| {
                        AppError::Internal(format!("No free file name for {}", name))
                    })?;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
}

/// Strip path separators and control characters from a display name.
fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let trimmed = cleaned.trim().trim_start_matches('.');
    if trimmed.is_empty() {
        "asset".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Name to save an asset under: its display name plus an extension when the
/// name has none and the content type suggests one.
pub fn download_file_name(asset: &Asset, mime_type: Option<&str>) -> String {
    let has_extension = Path::new(&asset.name).extension().is_some();
    match mime_type.and_then(extension_for_mime) {
        Some(ext) if !has_extension => format!("{}.{}", asset.name, ext),
        _ => asset.name.clone(),
    }
}

#[derive(Debug, Default)]
pub struct AssetGallery {
    assets: Vec<Asset>,
    selected: BTreeSet<Uuid>,
}

impl AssetGallery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole list from the backend. Selections of assets that no
    /// longer exist are dropped.
    pub async fn refresh<B: AssetBackend + ?Sized>(&mut self, backend: &B) -> Result<(), AppError> {
        let assets = backend.list_assets().await?;
        tracing::debug!(count = assets.len(), "Asset list refreshed");
        self.selected
            .retain(|id| assets.iter().any(|asset| asset.id == *id));
        self.assets = assets;
        Ok(())
    }

    pub fn assets(&self) -> &[Asset] {
        &self.assets
    }

    pub fn find(&self, id: Uuid) -> Option<&Asset> {
        self.assets.iter().find(|a| a.id == id)
    }

    pub fn grouped_by_category(&self) -> BTreeMap<&str, Vec<&Asset>> {
        group_by_category(&self.assets)
    }

    pub fn filter_kind(&self, kind: AssetKind) -> Vec<&Asset> {
        filter_by_kind(&self.assets, kind)
    }

    pub fn toggle_select(&mut self, id: Uuid) {
        if !self.selected.remove(&id) {
            self.selected.insert(id);
        }
    }

    pub fn select_all(&mut self) {
        self.selected = self.assets.iter().map(|a| a.id).collect();
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    pub fn is_selected(&self, id: Uuid) -> bool {
        self.selected.contains(&id)
    }

    pub fn selected_ids(&self) -> Vec<Uuid> {
        self.selected.iter().copied().collect()
    }

    /// Download each asset in turn, pausing `delay` between items. Ids not in
    /// the list count as failures.
    pub async fn bulk_download<B, T>(
        &self,
        backend: &B,
        ids: &[Uuid],
        target: &T,
        delay: Duration,
    ) -> BatchOutcome
    where
        B: AssetBackend + ?Sized,
        T: DownloadTarget + ?Sized,
    {
        let mut outcome = BatchOutcome::default();
        for (index, id) in ids.iter().enumerate() {
            if index > 0 && !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }

            let result = match self.find(*id) {
                Some(asset) => download_one(backend, asset, target).await,
                None => Err(AppError::NotFound(format!("Asset {} is not in the list", id))),
            };

            match result {
                Ok(path) => {
                    tracing::debug!(asset_id = %id, path = %path.display(), "Asset downloaded");
                    outcome.succeeded += 1;
                }
                Err(e) => {
                    log_error(&e, "Failed to download asset", &id.to_string());
                    outcome.failed += 1;
                    outcome.failures.push(EntryFailure {
                        name: self
                            .find(*id)
                            .map(|a| a.name.clone())
                            .unwrap_or_else(|| id.to_string()),
                        message: e.client_message(),
                    });
                }
            }
        }
        outcome
    }

    /// Delete each id in turn, then refresh the list. Only ids that were
    /// actually deleted leave the selection.
    pub async fn bulk_delete<B: AssetBackend + ?Sized>(
        &mut self,
        backend: &B,
        ids: &[Uuid],
    ) -> Result<BatchOutcome, AppError> {
        let outcome = BatchSubmitter::new(backend).delete_each(ids).await;
        for id in &outcome.deleted {
            self.selected.remove(id);
        }
        self.refresh(backend).await?;
        Ok(outcome)
    }
}

async fn download_one<B, T>(backend: &B, asset: &Asset, target: &T) -> Result<PathBuf, AppError>
where
    B: AssetBackend + ?Sized,
    T: DownloadTarget + ?Sized,
{
    let (bytes, mime) = if asset.url.starts_with("data:") {
        let data_url = DataUrl::parse(&asset.url)?;
        (data_url.decode()?, Some(data_url.mime_type))
    } else {
        (backend.fetch_bytes(&asset.url).await?, None)
    };
    let file_name = download_file_name(asset, mime.as_deref());
    target.save(&file_name, &bytes).await
}
