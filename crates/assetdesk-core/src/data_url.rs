//! `data:<mime>;base64,<payload>` encoding used to ship file bytes inline in JSON.

use std::fmt;

use base64::{engine::general_purpose, Engine as _};

use crate::error::AppError;

pub const OCTET_STREAM: &str = "application/octet-stream";

/// A parsed or freshly encoded base64 data URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl {
    pub mime_type: String,
    pub payload: String,
}

fn mime_or_default(mime_type: &str) -> String {
    let trimmed = mime_type.trim();
    if trimmed.is_empty() {
        OCTET_STREAM.to_string()
    } else {
        trimmed.to_string()
    }
}

impl DataUrl {
    /// Encode `bytes` in one pass.
    pub fn encode(mime_type: &str, bytes: &[u8]) -> Self {
        Self {
            mime_type: mime_or_default(mime_type),
            payload: general_purpose::STANDARD.encode(bytes),
        }
    }

    /// Encode `bytes` in fixed-size chunks. The chunk size is rounded down to a
    /// multiple of 3 so no padding appears mid-payload and the output matches
    /// [`DataUrl::encode`].
    pub fn encode_chunked(mime_type: &str, bytes: &[u8], chunk_size: usize) -> Self {
        let chunk_size = (chunk_size / 3).max(1) * 3;
        let mut payload = String::with_capacity(bytes.len().div_ceil(3) * 4);
        for chunk in bytes.chunks(chunk_size) {
            general_purpose::STANDARD.encode_string(chunk, &mut payload);
        }
        Self {
            mime_type: mime_or_default(mime_type),
            payload,
        }
    }

    pub fn parse(input: &str) -> Result<Self, AppError> {
        let rest = input
            .strip_prefix("data:")
            .ok_or_else(|| AppError::InvalidInput("Not a data URL".to_string()))?;
        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| AppError::InvalidInput("Data URL has no payload".to_string()))?;
        let mime_type = header.strip_suffix(";base64").ok_or_else(|| {
            AppError::InvalidInput("Only base64 data URLs are supported".to_string())
        })?;
        Ok(Self {
            mime_type: mime_or_default(mime_type),
            payload: payload.to_string(),
        })
    }

    pub fn decode(&self) -> Result<Vec<u8>, AppError> {
        Ok(general_purpose::STANDARD.decode(self.payload.as_bytes())?)
    }

    /// Size of the decoded content without decoding it.
    pub fn decoded_len(&self) -> usize {
        let padding = self.payload.bytes().rev().take_while(|b| *b == b'=').count();
        ((self.payload.len() / 4) * 3).saturating_sub(padding.min(2))
    }
}

impl fmt::Display for DataUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "data:{};base64,{}", self.mime_type, self.payload)
    }
}

/// MIME type a browser would report for a filename, based on its extension.
pub fn mime_for_filename(filename: &str) -> Option<&'static str> {
    let (_, ext) = filename.rsplit_once('.')?;
    let mime = match ext.to_lowercase().as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "bmp" => "image/bmp",
        "ico" => "image/x-icon",
        "tif" | "tiff" => "image/tiff",
        "avif" => "image/avif",
        "heic" => "image/heic",
        "mp4" => "video/mp4",
        "mov" => "video/quicktime",
        "webm" => "video/webm",
        "avi" => "video/x-msvideo",
        "mkv" => "video/x-matroska",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "ogg" => "audio/ogg",
        "flac" => "audio/flac",
        "m4a" => "audio/mp4",
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "xls" => "application/vnd.ms-excel",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "ppt" => "application/vnd.ms-powerpoint",
        "pptx" => "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        "txt" => "text/plain",
        "csv" => "text/csv",
        "json" => "application/json",
        "zip" => "application/zip",
        _ => return None,
    };
    Some(mime)
}

/// File extension to use when saving content of the given MIME type.
pub fn extension_for_mime(mime_type: &str) -> Option<&'static str> {
    let ext = match mime_type.split(';').next().unwrap_or("").trim() {
        "image/jpeg" => "jpg",
        "image/png" => "png",
        "image/gif" => "gif",
        "image/webp" => "webp",
        "image/svg+xml" => "svg",
        "video/mp4" => "mp4",
        "video/quicktime" => "mov",
        "video/webm" => "webm",
        "audio/mpeg" => "mp3",
        "audio/wav" => "wav",
        "audio/ogg" => "ogg",
        "application/pdf" => "pdf",
        "text/plain" => "txt",
        "application/zip" => "zip",
        _ => return None,
    };
    Some(ext)
}
