use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

/// Well-known category tags. Categories are free-form; these are the ones
/// the classifier produces.
pub mod category {
    pub const LOGO: &str = "logo";
    pub const BRANDING: &str = "branding";
    pub const IMAGE: &str = "image";
    pub const DOCUMENT: &str = "document";
    pub const OTHER: &str = "other";
}

/// Asset type enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Image,
    Video,
    Audio,
    Document,
}

impl AssetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetKind::Image => "image",
            AssetKind::Video => "video",
            AssetKind::Audio => "audio",
            AssetKind::Document => "document",
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "image" | "images" => Ok(AssetKind::Image),
            "video" | "videos" => Ok(AssetKind::Video),
            "audio" | "audios" => Ok(AssetKind::Audio),
            "document" | "documents" => Ok(AssetKind::Document),
            other => Err(AppError::InvalidInput(format!(
                "Invalid asset type '{}'. Must be: image, video, audio, or document",
                other
            ))),
        }
    }
}

/// Persisted asset as returned by `GET /assets`. The `url` is an opaque blob
/// reference (often a data URL) and is never rewritten client-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: AssetKind,
    pub category: String,
    #[serde(default)]
    pub description: Option<String>,
    pub url: String,
    #[serde(default)]
    pub file_size: Option<i64>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub user_id: Option<Uuid>,
}

/// Body of `POST /assets`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAsset {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: AssetKind,
    pub category: String,
    pub description: Option<String>,
    pub url: String,
    pub file_size: u64,
}

/// `{ "asset": ... }`
#[derive(Debug, Serialize, Deserialize)]
pub struct AssetEnvelope {
    pub asset: Asset,
}

/// `{ "assets": [...] }`
#[derive(Debug, Serialize, Deserialize)]
pub struct AssetListEnvelope {
    #[serde(default)]
    pub assets: Vec<Asset>,
}

/// `{ "error": "..." }` returned with non-2xx responses.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub error: String,
}

/// Group assets by category, keyed in alphabetical order. Assets keep their
/// relative order inside each group.
pub fn group_by_category(assets: &[Asset]) -> BTreeMap<&str, Vec<&Asset>> {
    let mut groups: BTreeMap<&str, Vec<&Asset>> = BTreeMap::new();
    for asset in assets {
        groups.entry(asset.category.as_str()).or_default().push(asset);
    }
    groups
}

pub fn filter_by_kind(assets: &[Asset], kind: AssetKind) -> Vec<&Asset> {
    assets.iter().filter(|a| a.kind == kind).collect()
}
