//! File encoding: admission check, then an ordered list of read strategies
//! that turn a file into a base64 data URL.
//!
//! The primary strategy asks the source for a data URL directly. If the source
//! reports [`ReadFailure::NotReadable`] the encoder falls back to reading raw
//! bytes and encoding them in fixed-size chunks. Any other failure, or failure
//! of the last strategy, is terminal for that file.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;

use crate::config::DeskConfig;
use crate::data_url::{mime_for_filename, DataUrl, OCTET_STREAM};
use crate::error::AppError;

/// Why a single read strategy failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadFailure {
    /// Access was denied by the OS or sandbox. The next strategy may still work.
    NotReadable(String),
    /// Any other I/O failure.
    Io(String),
}

impl ReadFailure {
    fn is_retryable(&self) -> bool {
        matches!(self, ReadFailure::NotReadable(_))
    }

    fn reason(&self) -> &str {
        match self {
            ReadFailure::NotReadable(r) | ReadFailure::Io(r) => r,
        }
    }
}

impl From<std::io::Error> for ReadFailure {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::PermissionDenied => ReadFailure::NotReadable(err.to_string()),
            _ => ReadFailure::Io(err.to_string()),
        }
    }
}

/// A file handle offered for upload.
#[async_trait]
pub trait FileSource: Send + Sync {
    fn file_name(&self) -> &str;

    /// Declared MIME type, if any.
    fn mime_type(&self) -> Option<&str>;

    /// Size in bytes as reported before reading.
    fn size(&self) -> u64;

    /// Read the whole file as a data URL in one operation.
    async fn read_data_url(&self) -> Result<String, ReadFailure>;

    /// Read the raw bytes.
    async fn read_bytes(&self, chunk_size: usize) -> Result<Vec<u8>, ReadFailure>;
}

/// Read strategies, tried in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadStrategy {
    DataUrl,
    ChunkedBytes,
}

/// Output of a successful encode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedFile {
    pub file_name: String,
    pub mime_type: String,
    pub size_bytes: u64,
    pub data_url: String,
    pub strategy: ReadStrategy,
}

#[derive(Debug, Clone)]
pub struct FileEncoder {
    max_file_size: u64,
    read_timeout: Option<Duration>,
    chunk_size: usize,
    strategies: Vec<ReadStrategy>,
}

impl FileEncoder {
    pub fn new(max_file_size: u64) -> Self {
        let defaults = DeskConfig::default();
        Self {
            max_file_size,
            read_timeout: defaults.read_timeout,
            chunk_size: defaults.fallback_chunk_size,
            strategies: vec![ReadStrategy::DataUrl, ReadStrategy::ChunkedBytes],
        }
    }

    pub fn from_config(config: &DeskConfig) -> Self {
        Self {
            max_file_size: config.max_file_size_bytes,
            read_timeout: config.read_timeout,
            chunk_size: config.fallback_chunk_size,
            strategies: vec![ReadStrategy::DataUrl, ReadStrategy::ChunkedBytes],
        }
    }

    pub fn with_read_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.read_timeout = timeout;
        self
    }

    pub fn with_strategies(mut self, strategies: Vec<ReadStrategy>) -> Self {
        self.strategies = strategies;
        self
    }

    pub fn max_file_size(&self) -> u64 {
        self.max_file_size
    }

    /// Size checks done before any byte is read.
    pub fn admit(&self, source: &dyn FileSource) -> Result<(), AppError> {
        let size = source.size();
        if size == 0 {
            return Err(AppError::EmptyFile(source.file_name().to_string()));
        }
        if size > self.max_file_size {
            return Err(AppError::FileTooLarge {
                name: source.file_name().to_string(),
                size,
                limit: self.max_file_size,
            });
        }
        Ok(())
    }

    pub async fn encode(&self, source: &dyn FileSource) -> Result<EncodedFile, AppError> {
        self.admit(source)?;

        let name = source.file_name().to_string();
        let mime_type = source
            .mime_type()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or(OCTET_STREAM)
            .to_string();

        let mut last_failure = ReadFailure::Io("no read strategy configured".to_string());
        for (attempt, strategy) in self.strategies.iter().enumerate() {
            if attempt > 0 && !last_failure.is_retryable() {
                break;
            }

            let result = match strategy {
                ReadStrategy::DataUrl => self.read_primary(source).await?,
                ReadStrategy::ChunkedBytes => source
                    .read_bytes(self.chunk_size)
                    .await
                    .map(|bytes| {
                        DataUrl::encode_chunked(&mime_type, &bytes, self.chunk_size).to_string()
                    }),
            };

            match result {
                Ok(data_url) => {
                    tracing::debug!(file = %name, strategy = ?strategy, "File encoded");
                    return Ok(EncodedFile {
                        file_name: name,
                        mime_type,
                        size_bytes: source.size(),
                        data_url,
                        strategy: *strategy,
                    });
                }
                Err(failure) => {
                    tracing::warn!(
                        file = %name,
                        strategy = ?strategy,
                        reason = failure.reason(),
                        "Read strategy failed"
                    );
                    last_failure = failure;
                }
            }
        }

        Err(match last_failure {
            ReadFailure::NotReadable(reason) => AppError::ReadRestricted { name, reason },
            ReadFailure::Io(reason) => AppError::ReadFailed { name, reason },
        })
    }

    /// Primary read under the advisory timeout. A timeout is terminal.
    async fn read_primary(
        &self,
        source: &dyn FileSource,
    ) -> Result<Result<String, ReadFailure>, AppError> {
        match self.read_timeout {
            None => Ok(source.read_data_url().await),
            Some(limit) => tokio::time::timeout(limit, source.read_data_url())
                .await
                .map_err(|_| AppError::ReadTimedOut {
                    name: source.file_name().to_string(),
                    limit,
                }),
        }
    }
}

/// A file on the local filesystem.
#[derive(Debug, Clone)]
pub struct LocalFile {
    path: PathBuf,
    file_name: String,
    mime_type: Option<String>,
    size: u64,
}

impl LocalFile {
    /// Stat the path. Anything but a regular file is rejected here.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let path = path.as_ref().to_path_buf();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let metadata = tokio::fs::metadata(&path).await.map_err(|e| {
            match ReadFailure::from(e) {
                ReadFailure::NotReadable(reason) => AppError::ReadRestricted {
                    name: file_name.clone(),
                    reason,
                },
                ReadFailure::Io(reason) => AppError::ReadFailed {
                    name: file_name.clone(),
                    reason,
                },
            }
        })?;

        if !metadata.is_file() {
            return Err(AppError::NotAFile(file_name));
        }

        let mime_type = mime_for_filename(&file_name).map(str::to_string);
        Ok(Self {
            path,
            file_name,
            mime_type,
            size: metadata.len(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl FileSource for LocalFile {
    fn file_name(&self) -> &str {
        &self.file_name
    }

    fn mime_type(&self) -> Option<&str> {
        self.mime_type.as_deref()
    }

    fn size(&self) -> u64 {
        self.size
    }

    async fn read_data_url(&self) -> Result<String, ReadFailure> {
        let bytes = tokio::fs::read(&self.path).await?;
        let mime = self.mime_type.as_deref().unwrap_or(OCTET_STREAM);
        Ok(DataUrl::encode(mime, &bytes).to_string())
    }

    async fn read_bytes(&self, chunk_size: usize) -> Result<Vec<u8>, ReadFailure> {
        let path = self.path.clone();
        let expected = self.size as usize;
        tokio::task::spawn_blocking(move || -> Result<Vec<u8>, ReadFailure> {
            let mut file = std::fs::File::open(&path)?;
            let mut bytes = Vec::with_capacity(expected);
            let mut buf = vec![0u8; chunk_size.max(1)];
            loop {
                let n = file.read(&mut buf)?;
                if n == 0 {
                    break;
                }
                bytes.extend_from_slice(&buf[..n]);
            }
            Ok(bytes)
        })
        .await
        .map_err(|e| ReadFailure::Io(format!("read task failed: {}", e)))?
    }
}

/// An in-memory file. The switches simulate a source whose reads are denied.
#[derive(Debug, Clone)]
pub struct MemoryFile {
    file_name: String,
    mime_type: Option<String>,
    bytes: Vec<u8>,
    primary_failure: Option<ReadFailure>,
    fallback_failure: Option<ReadFailure>,
    primary_delay: Option<Duration>,
}

impl MemoryFile {
    pub fn new(file_name: impl Into<String>, mime_type: Option<&str>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.map(str::to_string),
            bytes,
            primary_failure: None,
            fallback_failure: None,
            primary_delay: None,
        }
    }

    pub fn failing_primary(mut self, failure: ReadFailure) -> Self {
        self.primary_failure = Some(failure);
        self
    }

    pub fn failing_fallback(mut self, failure: ReadFailure) -> Self {
        self.fallback_failure = Some(failure);
        self
    }

    pub fn slow_primary(mut self, delay: Duration) -> Self {
        self.primary_delay = Some(delay);
        self
    }
}

#[async_trait]
impl FileSource for MemoryFile {
    fn file_name(&self) -> &str {
        &self.file_name
    }

    fn mime_type(&self) -> Option<&str> {
        self.mime_type.as_deref()
    }

    fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    async fn read_data_url(&self) -> Result<String, ReadFailure> {
        if let Some(delay) = self.primary_delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(failure) = &self.primary_failure {
            return Err(failure.clone());
        }
        let mime = self.mime_type.as_deref().unwrap_or(OCTET_STREAM);
        Ok(DataUrl::encode(mime, &self.bytes).to_string())
    }

    async fn read_bytes(&self, _chunk_size: usize) -> Result<Vec<u8>, ReadFailure> {
        if let Some(failure) = &self.fallback_failure {
            return Err(failure.clone());
        }
        Ok(self.bytes.clone())
    }
}
