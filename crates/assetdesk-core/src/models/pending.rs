use std::fmt;

use serde::{Deserialize, Serialize};

use super::asset::{AssetKind, NewAsset};

/// Identity of a queued file. Only meaningful while the file sits in the queue.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PendingId(String);

impl PendingId {
    /// Millisecond timestamp plus a random suffix, both base36.
    pub fn generate() -> Self {
        let millis = chrono::Utc::now().timestamp_millis().max(0) as u64;
        let suffix: u64 = rand::random::<u64>() & 0xFFFF_FFFF_FFFF;
        PendingId(format!("{}-{}", to_base36(millis), to_base36(suffix)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PendingId {
    fn from(value: &str) -> Self {
        PendingId(value.to_string())
    }
}

impl fmt::Display for PendingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn to_base36(mut n: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}

/// An encoded, classified file waiting for submission.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingFile {
    pub id: PendingId,
    pub name: String,
    pub kind: AssetKind,
    pub category: String,
    pub description: Option<String>,
    /// Full `data:<mime>;base64,<payload>` string.
    pub encoded_data: String,
    pub size_bytes: u64,
    pub original_filename: String,
    pub mime_type: String,
}

impl PendingFile {
    pub fn has_name(&self) -> bool {
        !self.name.trim().is_empty()
    }

    /// Build the request body, moving the encoded data out of the entry.
    pub fn into_new_asset(self) -> NewAsset {
        NewAsset {
            name: self.name.trim().to_string(),
            kind: self.kind,
            category: self.category,
            description: self.description.filter(|d| !d.trim().is_empty()),
            url: self.encoded_data,
            file_size: self.size_bytes,
        }
    }
}

/// Partial edit of a queued file; `None` fields are left as they are.
/// `description: Some(None)` clears the description.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PendingFilePatch {
    pub name: Option<String>,
    pub kind: Option<AssetKind>,
    pub category: Option<String>,
    pub description: Option<Option<String>>,
}

impl PendingFilePatch {
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn apply_to(self, file: &mut PendingFile) {
        if let Some(name) = self.name {
            file.name = name;
        }
        if let Some(kind) = self.kind {
            file.kind = kind;
        }
        if let Some(category) = self.category {
            file.category = category;
        }
        if let Some(description) = self.description {
            file.description = description;
        }
    }
}

/// Template applied to every queued file by the bulk edit.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetDefaults {
    pub kind: AssetKind,
    pub category: String,
    pub description: Option<String>,
}
