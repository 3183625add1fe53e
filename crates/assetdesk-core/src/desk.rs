//! The active upload view: owns the queue, the gallery and the notifier, and
//! drives ingest → submit → refresh against one backend.

use uuid::Uuid;

use crate::backend::AssetBackend;
use crate::batch::{BatchOutcome, BatchSubmitter};
use crate::config::DeskConfig;
use crate::encoder::{FileEncoder, FileSource};
use crate::error::{log_error, AppError, ErrorMetadata};
use crate::gallery::{AssetGallery, DownloadTarget};
use crate::models::PendingId;
use crate::notify::{Notice, Notifier};
use crate::queue::{pending_from_encoded, UploadQueue};

/// Files accepted into the queue and files turned away, in input order.
#[derive(Debug, Default)]
pub struct IngestReport {
    pub accepted: Vec<PendingId>,
    pub rejected: Vec<(String, AppError)>,
}

impl IngestReport {
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}

pub struct AssetDesk<B: AssetBackend> {
    backend: B,
    encoder: FileEncoder,
    queue: UploadQueue,
    gallery: AssetGallery,
    notifier: Notifier,
    download_delay: std::time::Duration,
}

impl<B: AssetBackend> AssetDesk<B> {
    pub fn new(backend: B, config: &DeskConfig) -> Self {
        Self {
            backend,
            encoder: FileEncoder::from_config(config),
            queue: UploadQueue::new(),
            gallery: AssetGallery::new(),
            notifier: Notifier::new(Some(config.notice_dismiss_after)),
            download_delay: config.download_delay,
        }
    }

    pub fn with_encoder(mut self, encoder: FileEncoder) -> Self {
        self.encoder = encoder;
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn queue(&self) -> &UploadQueue {
        &self.queue
    }

    pub fn queue_mut(&mut self) -> &mut UploadQueue {
        &mut self.queue
    }

    pub fn gallery(&self) -> &AssetGallery {
        &self.gallery
    }

    pub fn gallery_mut(&mut self) -> &mut AssetGallery {
        &mut self.gallery
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    /// Encode and classify each source. Accepted files are appended to the
    /// queue; rejected ones never enter it.
    pub async fn ingest(&mut self, sources: &[&dyn FileSource]) -> IngestReport {
        let mut report = IngestReport::default();
        let mut accepted = Vec::new();

        for source in sources {
            match self.encoder.encode(*source).await {
                Ok(encoded) => {
                    let pending = pending_from_encoded(encoded);
                    tracing::info!(
                        file = %pending.original_filename,
                        kind = %pending.kind,
                        category = %pending.category,
                        size = pending.size_bytes,
                        "File added to upload queue"
                    );
                    report.accepted.push(pending.id.clone());
                    accepted.push(pending);
                }
                Err(e) => {
                    log_error(&e, "File rejected", source.file_name());
                    self.notifier.show(Notice::error(e.client_message()));
                    report
                        .rejected
                        .push((source.file_name().to_string(), e));
                }
            }
        }

        self.queue.add(accepted);
        report
    }

    /// Submit the queue. On a validation failure nothing is sent and the
    /// queue is kept; otherwise the queue ends empty and the gallery is
    /// refreshed whatever the per-entry outcome.
    pub async fn submit(&mut self) -> Result<BatchOutcome, AppError> {
        let outcome = match BatchSubmitter::new(&self.backend)
            .submit(&mut self.queue)
            .await
        {
            Ok(outcome) => outcome,
            Err(e) => {
                self.notifier.show(Notice::error(e.client_message()));
                return Err(e);
            }
        };

        self.refresh_after_batch().await;
        if let Some(notice) = outcome.notice("uploaded") {
            self.notifier.show(notice);
        }
        Ok(outcome)
    }

    pub async fn refresh(&mut self) -> Result<(), AppError> {
        self.gallery.refresh(&self.backend).await
    }

    pub async fn bulk_delete(&mut self, ids: &[Uuid]) -> Result<BatchOutcome, AppError> {
        let outcome = match self.gallery.bulk_delete(&self.backend, ids).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to refresh asset list after delete");
                self.notifier.show(Notice::error(e.client_message()));
                return Err(e);
            }
        };
        if let Some(notice) = outcome.notice("deleted") {
            self.notifier.show(notice);
        }
        Ok(outcome)
    }

    pub async fn bulk_download<T: DownloadTarget + ?Sized>(
        &mut self,
        ids: &[Uuid],
        target: &T,
    ) -> BatchOutcome {
        let outcome = self
            .gallery
            .bulk_download(&self.backend, ids, target, self.download_delay)
            .await;
        if let Some(notice) = outcome.notice("downloaded") {
            self.notifier.show(notice);
        }
        outcome
    }

    /// A failed refresh after a batch is reported but does not undo the batch.
    async fn refresh_after_batch(&mut self) {
        if let Err(e) = self.gallery.refresh(&self.backend).await {
            tracing::warn!(error = %e, "Failed to refresh asset list");
            self.notifier.show(Notice::error(e.client_message()));
        }
    }
}
