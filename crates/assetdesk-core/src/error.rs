//! Error types module
//!
//! All failures in the ingestion pipeline are unified under the `AppError` enum.
//! Each variant belongs to one `ErrorClass` (admission, encoding, validation,
//! submission, internal), which decides how the caller reports it: admission and
//! encoding errors reject a single file, validation errors block a whole batch,
//! submission errors are counted per entry.

use std::io;
use std::time::Duration;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues like a single failed upload
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Where in the pipeline an error originates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Rejected before any read attempt (empty, too large, not a file).
    Admission,
    /// Every read strategy failed for a file.
    Encoding,
    /// The queue is not fit for submission.
    Validation,
    /// A single request to the asset API failed.
    Submission,
    /// Configuration or programming errors.
    Internal,
}

/// Metadata for presenting errors to the user.
pub trait ErrorMetadata {
    /// Machine-readable error code (e.g., "FILE_TOO_LARGE")
    fn error_code(&self) -> &'static str;

    /// Whether repeating the operation may succeed
    fn is_recoverable(&self) -> bool;

    /// Suggested action for the user
    fn suggested_action(&self) -> Option<&'static str>;

    /// User-facing message (may differ from the internal error message)
    fn client_message(&self) -> String;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("File is empty: {0}")]
    EmptyFile(String),

    #[error("File too large: {name} is {size} bytes, maximum is {limit} bytes")]
    FileTooLarge { name: String, size: u64, limit: u64 },

    #[error("Not a regular file: {0}")]
    NotAFile(String),

    #[error("Security restriction while reading {name}: {reason}")]
    ReadRestricted { name: String, reason: String },

    #[error("Failed to read {name}: {reason}")]
    ReadFailed { name: String, reason: String },

    #[error("Timed out reading {name} after {limit:?}")]
    ReadTimedOut { name: String, limit: Duration },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("API request failed with status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error with source")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Internal(format!("IO error: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InvalidInput(format!("JSON parsing error: {}", err))
    }
}

impl From<base64::DecodeError> for AppError {
    fn from(err: base64::DecodeError) -> Self {
        AppError::InvalidInput(format!("Base64 decoding error: {}", err))
    }
}

/// Static metadata for each variant: (class, error_code, recoverable, suggested_action, log_level).
fn app_error_static_metadata(
    err: &AppError,
) -> (
    ErrorClass,
    &'static str,
    bool,
    Option<&'static str>,
    LogLevel,
) {
    match err {
        AppError::EmptyFile(_) => (
            ErrorClass::Admission,
            "EMPTY_FILE",
            false,
            Some("Choose a file that has content"),
            LogLevel::Debug,
        ),
        AppError::FileTooLarge { .. } => (
            ErrorClass::Admission,
            "FILE_TOO_LARGE",
            false,
            Some("Compress the file or choose a smaller one"),
            LogLevel::Debug,
        ),
        AppError::NotAFile(_) => (
            ErrorClass::Admission,
            "NOT_A_FILE",
            false,
            Some("Select a regular file, not a folder or device"),
            LogLevel::Debug,
        ),
        AppError::ReadRestricted { .. } => (
            ErrorClass::Encoding,
            "READ_RESTRICTED",
            false,
            Some("Copy the file to an unprotected folder (e.g. Desktop or Documents) and try again"),
            LogLevel::Warn,
        ),
        AppError::ReadFailed { .. } => (
            ErrorClass::Encoding,
            "READ_FAILED",
            false,
            Some("Close programs that may hold the file open and try again"),
            LogLevel::Warn,
        ),
        AppError::ReadTimedOut { .. } => (
            ErrorClass::Encoding,
            "READ_TIMED_OUT",
            true,
            Some("Check that the file is not on a slow or disconnected drive"),
            LogLevel::Warn,
        ),
        AppError::Validation(_) => (
            ErrorClass::Validation,
            "VALIDATION_FAILED",
            false,
            Some("Give every file a name before uploading"),
            LogLevel::Debug,
        ),
        AppError::Unauthorized(_) => (
            ErrorClass::Submission,
            "UNAUTHORIZED",
            false,
            Some("Sign in again to refresh your session"),
            LogLevel::Warn,
        ),
        AppError::NotFound(_) => (
            ErrorClass::Submission,
            "NOT_FOUND",
            false,
            Some("Refresh the asset list; the asset may already be gone"),
            LogLevel::Debug,
        ),
        AppError::Api { .. } => (
            ErrorClass::Submission,
            "API_ERROR",
            true,
            Some("Retry after a short delay"),
            LogLevel::Warn,
        ),
        AppError::Network(_) => (
            ErrorClass::Submission,
            "NETWORK_ERROR",
            true,
            Some("Check your connection and retry"),
            LogLevel::Warn,
        ),
        AppError::InvalidInput(_) => (
            ErrorClass::Internal,
            "INVALID_INPUT",
            false,
            Some("Check the input and try again"),
            LogLevel::Debug,
        ),
        AppError::Config(_) => (
            ErrorClass::Internal,
            "CONFIG_ERROR",
            false,
            Some("Fix the environment configuration"),
            LogLevel::Error,
        ),
        AppError::Internal(_) => (
            ErrorClass::Internal,
            "INTERNAL_ERROR",
            true,
            Some("Retry after a short delay"),
            LogLevel::Error,
        ),
        AppError::InternalWithSource { .. } => (
            ErrorClass::Internal,
            "INTERNAL_ERROR",
            true,
            Some("Retry after a short delay"),
            LogLevel::Error,
        ),
    }
}

impl AppError {
    /// Pipeline stage this error belongs to.
    pub fn class(&self) -> ErrorClass {
        app_error_static_metadata(self).0
    }

    /// Get the error type name for detailed reports
    pub fn error_type(&self) -> &str {
        match self {
            AppError::EmptyFile(_) => "EmptyFile",
            AppError::FileTooLarge { .. } => "FileTooLarge",
            AppError::NotAFile(_) => "NotAFile",
            AppError::ReadRestricted { .. } => "ReadRestricted",
            AppError::ReadFailed { .. } => "ReadFailed",
            AppError::ReadTimedOut { .. } => "ReadTimedOut",
            AppError::Validation(_) => "Validation",
            AppError::Unauthorized(_) => "Unauthorized",
            AppError::NotFound(_) => "NotFound",
            AppError::Api { .. } => "Api",
            AppError::Network(_) => "Network",
            AppError::InvalidInput(_) => "InvalidInput",
            AppError::Config(_) => "Config",
            AppError::Internal(_) => "Internal",
            AppError::InternalWithSource { .. } => "Internal",
        }
    }

    /// Get detailed error information including error chain
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();

        let mut source = self.source();
        let mut depth = 0;
        while let Some(err) = source {
            depth += 1;
            if depth > 5 {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str(&format!("\n  Caused by: {}", err));
            source = err.source();
        }

        details
    }
}

/// Log `error` at its own level, tagged with the operation and the item it concerns.
pub fn log_error(error: &AppError, operation: &str, subject: &str) {
    let error_type = error.error_type();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type, subject, "{}", operation);
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type, subject, "{}", operation);
        }
        LogLevel::Error => {
            tracing::error!(error = %error, error_type, subject, "{}", operation);
        }
    }
}

impl ErrorMetadata for AppError {
    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn is_recoverable(&self) -> bool {
        app_error_static_metadata(self).2
    }

    fn suggested_action(&self) -> Option<&'static str> {
        app_error_static_metadata(self).3
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).4
    }

    fn client_message(&self) -> String {
        match self {
            AppError::EmptyFile(name) => format!("\"{}\" is empty and was not added", name),
            AppError::FileTooLarge { name, limit, .. } => format!(
                "\"{}\" is too large. Maximum file size is {} MB",
                name,
                limit / 1024 / 1024
            ),
            AppError::NotAFile(name) => format!("\"{}\" is not a regular file", name),
            AppError::ReadRestricted { name, .. } => format!(
                "Cannot read \"{}\" due to a security restriction. The file may be in a \
                 protected system folder, locked by another program, or you may lack \
                 permission to read it",
                name
            ),
            AppError::ReadFailed { name, reason } => {
                format!("Failed to read \"{}\": {}", name, reason)
            }
            AppError::ReadTimedOut { name, limit } => format!(
                "Reading \"{}\" took longer than {:?} and was cancelled",
                name, limit
            ),
            AppError::Validation(ref msg) => msg.clone(),
            AppError::Unauthorized(_) => "Your session has expired. Please sign in again".to_string(),
            AppError::NotFound(ref msg) => msg.clone(),
            AppError::Api { message, .. } => message.clone(),
            AppError::Network(_) => "Could not reach the server".to_string(),
            AppError::InvalidInput(ref msg) => msg.clone(),
            AppError::Config(ref msg) => msg.clone(),
            AppError::Internal(_) => "Internal error".to_string(),
            AppError::InternalWithSource { .. } => "Internal error".to_string(),
        }
    }
}
