//! Asset Desk Core Library
//!
//! Client-side asset ingestion pipeline: files are admitted and encoded as data
//! URLs, classified, queued for editing, submitted in sequential batches to the
//! asset API, and shown in a gallery that supports bulk download and delete.

pub mod backend;
pub mod batch;
pub mod classify;
pub mod config;
pub mod data_url;
pub mod desk;
pub mod encoder;
pub mod error;
pub mod gallery;
pub mod models;
pub mod notify;
pub mod queue;

// Re-export commonly used types
pub use backend::AssetBackend;
pub use batch::{BatchOutcome, BatchSubmitter, EntryFailure};
pub use classify::{classify, Classification};
pub use config::DeskConfig;
pub use data_url::DataUrl;
pub use desk::{AssetDesk, IngestReport};
pub use encoder::{
    EncodedFile, FileEncoder, FileSource, LocalFile, MemoryFile, ReadFailure, ReadStrategy,
};
pub use error::{log_error, AppError, ErrorClass, ErrorMetadata, LogLevel};
pub use gallery::{AssetGallery, DirectoryTarget, DownloadTarget};
pub use notify::{Notice, NoticeLevel, Notifier};
pub use queue::{QueueAction, QueueState, UploadQueue};
