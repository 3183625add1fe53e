//! Sequential batch submission with a per-entry success/failure tally.
//!
//! Batches are not transactional and carry no idempotency key: entries that
//! were created before a failure stay created, and re-submitting the same files
//! creates new assets.

use uuid::Uuid;

use crate::backend::AssetBackend;
use crate::error::{log_error, AppError, ErrorMetadata};
use crate::models::Asset;
use crate::notify::Notice;
use crate::queue::UploadQueue;

/// One entry that could not be processed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryFailure {
    pub name: String,
    pub message: String,
}

/// Tally of a batch run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchOutcome {
    pub succeeded: usize,
    pub failed: usize,
    pub created: Vec<Asset>,
    /// Ids whose delete succeeded.
    pub deleted: Vec<Uuid>,
    pub failures: Vec<EntryFailure>,
}

impl BatchOutcome {
    pub fn total(&self) -> usize {
        self.succeeded + self.failed
    }

    fn record_failure(&mut self, name: String, err: &AppError) {
        self.failed += 1;
        self.failures.push(EntryFailure {
            name,
            message: err.client_message(),
        });
    }

    /// Summary notice: success (mentioning failures) if anything succeeded,
    /// an error if everything failed, nothing for an empty batch.
    /// `verb` is the past tense shown to the user, e.g. "uploaded".
    pub fn notice(&self, verb: &str) -> Option<Notice> {
        let plural = |n: usize| if n == 1 { "asset" } else { "assets" };
        if self.succeeded > 0 {
            let mut message = format!(
                "Successfully {} {} {}",
                verb,
                self.succeeded,
                plural(self.succeeded)
            );
            if self.failed > 0 {
                message.push_str(&format!(" ({} failed)", self.failed));
            }
            Some(Notice::success(message))
        } else if self.failed > 0 {
            Some(Notice::error(format!(
                "Failed to process {} {}",
                self.failed,
                plural(self.failed)
            )))
        } else {
            None
        }
    }
}

pub struct BatchSubmitter<'a, B: AssetBackend + ?Sized> {
    backend: &'a B,
}

impl<'a, B: AssetBackend + ?Sized> BatchSubmitter<'a, B> {
    pub fn new(backend: &'a B) -> Self {
        Self { backend }
    }

    /// Validate the queue, then send every entry in order. A validation
    /// failure leaves the queue untouched and sends nothing; otherwise the
    /// queue is drained whatever the per-entry outcome.
    pub async fn submit(&self, queue: &mut UploadQueue) -> Result<BatchOutcome, AppError> {
        queue.validate_for_submit()?;

        let entries = queue.take_all();
        tracing::info!(count = entries.len(), "Submitting upload batch");

        let mut outcome = BatchOutcome::default();
        for entry in entries {
            let name = entry.name.clone();
            match self.backend.create_asset(entry.into_new_asset()).await {
                Ok(asset) => {
                    tracing::debug!(asset_id = %asset.id, name = %name, "Asset created");
                    outcome.succeeded += 1;
                    outcome.created.push(asset);
                }
                Err(e) => {
                    log_error(&e, "Failed to create asset", &name);
                    outcome.record_failure(name, &e);
                }
            }
        }

        tracing::info!(
            succeeded = outcome.succeeded,
            failed = outcome.failed,
            "Upload batch finished"
        );
        Ok(outcome)
    }

    /// Delete each id in order, counting failures without stopping.
    pub async fn delete_each(&self, ids: &[Uuid]) -> BatchOutcome {
        let mut outcome = BatchOutcome::default();
        for id in ids {
            match self.backend.delete_asset(*id).await {
                Ok(()) => {
                    outcome.succeeded += 1;
                    outcome.deleted.push(*id);
                }
                Err(e) => {
                    log_error(&e, "Failed to delete asset", &id.to_string());
                    outcome.record_failure(id.to_string(), &e);
                }
            }
        }
        tracing::info!(
            succeeded = outcome.succeeded,
            failed = outcome.failed,
            "Delete batch finished"
        );
        outcome
    }
}
