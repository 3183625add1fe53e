//! Infers asset type, category and display name from a filename and MIME type.

use crate::models::{category, AssetKind};

/// Extensions treated as images when the MIME type says nothing useful.
pub const IMAGE_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "webp", "svg", "bmp", "ico", "tif", "tiff", "avif", "heic",
];

/// Result of classifying a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub kind: AssetKind,
    pub category: String,
    pub default_name: String,
}

/// Classify a file. Pure and deterministic.
pub fn classify(filename: &str, mime_type: Option<&str>) -> Classification {
    let kind = infer_kind(filename, mime_type);
    Classification {
        kind,
        category: infer_category(filename, kind).to_string(),
        default_name: default_name(filename),
    }
}

/// MIME prefix first, then the image extension set, otherwise `Document`.
pub fn infer_kind(filename: &str, mime_type: Option<&str>) -> AssetKind {
    let mime = mime_type
        .and_then(|m| m.split(';').next())
        .map(|m| m.trim().to_lowercase())
        .unwrap_or_default();

    if mime.starts_with("image/") {
        return AssetKind::Image;
    }
    if mime.starts_with("video/") {
        return AssetKind::Video;
    }
    if mime.starts_with("audio/") {
        return AssetKind::Audio;
    }
    if mime == "application/pdf" {
        return AssetKind::Document;
    }

    match extension(filename) {
        Some(ext) if IMAGE_EXTENSIONS.contains(&ext.as_str()) => AssetKind::Image,
        _ => AssetKind::Document,
    }
}

/// Keyword match on the lowercased filename, in priority order.
pub fn infer_category(filename: &str, kind: AssetKind) -> &'static str {
    let lower = filename.to_lowercase();
    let has_any = |needles: &[&str]| needles.iter().any(|n| lower.contains(n));

    if has_any(&["logo"]) {
        category::LOGO
    } else if has_any(&["brand", "identity"]) {
        category::BRANDING
    } else if has_any(&["document", "doc", "pdf"]) {
        category::DOCUMENT
    } else if has_any(&["image", "photo", "picture"]) {
        category::IMAGE
    } else if kind == AssetKind::Image {
        category::IMAGE
    } else {
        category::OTHER
    }
}

/// Filename without its last extension; the full filename if that would be empty.
pub fn default_name(filename: &str) -> String {
    match filename.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem.to_string(),
        _ => filename.to_string(),
    }
}

fn extension(filename: &str) -> Option<String> {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .filter(|ext| !ext.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logo_png() {
        let c = classify("company-logo.png", Some("image/png"));
        assert_eq!(c.kind, AssetKind::Image);
        assert_eq!(c.category, "logo");
        assert_eq!(c.default_name, "company-logo");
    }

    #[test]
    fn report_pdf() {
        let c = classify("Q1-report.pdf", Some("application/pdf"));
        assert_eq!(c.kind, AssetKind::Document);
        assert_eq!(c.category, "document");
        assert_eq!(c.default_name, "Q1-report");
    }

    #[test]
    fn mime_takes_precedence_over_extension() {
        assert_eq!(infer_kind("clip.png", Some("video/mp4")), AssetKind::Video);
        assert_eq!(infer_kind("song.bin", Some("audio/mpeg")), AssetKind::Audio);
        assert_eq!(
            infer_kind("scan.jpg", Some("IMAGE/JPEG; charset=binary")),
            AssetKind::Image
        );
    }

    #[test]
    fn extension_fallback_without_mime() {
        assert_eq!(infer_kind("hero.WEBP", None), AssetKind::Image);
        assert_eq!(infer_kind("hero.webp", Some("")), AssetKind::Image);
        assert_eq!(
            infer_kind("hero.jpeg", Some("application/octet-stream")),
            AssetKind::Image
        );
        assert_eq!(infer_kind("notes.txt", None), AssetKind::Document);
        assert_eq!(infer_kind("Makefile", None), AssetKind::Document);
    }

    #[test]
    fn category_priority() {
        // logo beats brand
        assert_eq!(infer_category("brand-logo.svg", AssetKind::Image), "logo");
        assert_eq!(infer_category("Identity-Guide.key", AssetKind::Document), "branding");
        assert_eq!(infer_category("brand-photo.jpg", AssetKind::Image), "branding");
        assert_eq!(infer_category("team-photo.jpg", AssetKind::Image), "image");
        assert_eq!(infer_category("Picture1.bmp", AssetKind::Image), "image");
        assert_eq!(infer_category("contract.docx", AssetKind::Document), "document");
        assert_eq!(infer_category("hero.png", AssetKind::Image), "image");
        assert_eq!(infer_category("intro.mp4", AssetKind::Video), "other");
    }

    #[test]
    fn default_name_edge_cases() {
        assert_eq!(default_name("archive.tar.gz"), "archive.tar");
        assert_eq!(default_name("README"), "README");
        assert_eq!(default_name(".env"), ".env");
        assert_eq!(default_name("trailing."), "trailing");
    }

    #[test]
    fn deterministic() {
        let inputs = [
            ("company-logo.png", Some("image/png")),
            ("Q1-report.pdf", Some("application/pdf")),
            ("mystery", None),
        ];
        for (name, mime) in inputs {
            assert_eq!(classify(name, mime), classify(name, mime));
        }
    }
}
