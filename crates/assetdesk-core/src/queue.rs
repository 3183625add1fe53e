//! Upload queue: files that have been encoded and classified but not yet sent.
//!
//! All mutations go through [`reduce`], a pure `(state, action) -> state`
//! function. [`UploadQueue`] is a thin owner around that state.

use crate::classify::classify;
use crate::encoder::EncodedFile;
use crate::error::AppError;
use crate::models::{AssetDefaults, PendingFile, PendingFilePatch, PendingId};

#[derive(Debug, Clone, PartialEq)]
pub enum QueueAction {
    Add(Vec<PendingFile>),
    Update(PendingId, PendingFilePatch),
    Remove(PendingId),
    ApplyDefaults(AssetDefaults),
    Clear,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueueState {
    pub entries: Vec<PendingFile>,
}

/// Apply one action. Unknown ids in `Update`/`Remove` leave the state as is;
/// `Add` skips entries whose id is already queued.
pub fn reduce(mut state: QueueState, action: QueueAction) -> QueueState {
    match action {
        QueueAction::Add(files) => {
            for file in files {
                if state.entries.iter().any(|e| e.id == file.id) {
                    tracing::debug!(id = %file.id, "Skipping queue entry with duplicate id");
                    continue;
                }
                state.entries.push(file);
            }
        }
        QueueAction::Update(id, patch) => {
            if let Some(entry) = state.entries.iter_mut().find(|e| e.id == id) {
                patch.apply_to(entry);
            }
        }
        QueueAction::Remove(id) => {
            state.entries.retain(|e| e.id != id);
        }
        QueueAction::ApplyDefaults(defaults) => {
            for entry in &mut state.entries {
                entry.kind = defaults.kind;
                entry.category = defaults.category.clone();
                entry.description = defaults.description.clone();
            }
        }
        QueueAction::Clear => state.entries.clear(),
    }
    state
}

/// Build a queue entry from an encoded file, filling in classifier defaults.
pub fn pending_from_encoded(encoded: EncodedFile) -> PendingFile {
    let classification = classify(&encoded.file_name, Some(&encoded.mime_type));
    PendingFile {
        id: PendingId::generate(),
        name: classification.default_name,
        kind: classification.kind,
        category: classification.category,
        description: None,
        encoded_data: encoded.data_url,
        size_bytes: encoded.size_bytes,
        original_filename: encoded.file_name,
        mime_type: encoded.mime_type,
    }
}

#[derive(Debug, Default)]
pub struct UploadQueue {
    state: QueueState,
}

impl UploadQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dispatch(&mut self, action: QueueAction) {
        let state = std::mem::take(&mut self.state);
        self.state = reduce(state, action);
    }

    pub fn add(&mut self, files: Vec<PendingFile>) {
        self.dispatch(QueueAction::Add(files));
    }

    pub fn update(&mut self, id: &PendingId, patch: PendingFilePatch) {
        self.dispatch(QueueAction::Update(id.clone(), patch));
    }

    pub fn remove(&mut self, id: &PendingId) {
        self.dispatch(QueueAction::Remove(id.clone()));
    }

    pub fn apply_defaults_to_all(&mut self, defaults: AssetDefaults) {
        self.dispatch(QueueAction::ApplyDefaults(defaults));
    }

    pub fn clear(&mut self) {
        self.dispatch(QueueAction::Clear);
    }

    /// Drain every entry in queue order.
    pub fn take_all(&mut self) -> Vec<PendingFile> {
        std::mem::take(&mut self.state.entries)
    }

    pub fn entries(&self) -> &[PendingFile] {
        &self.state.entries
    }

    pub fn get(&self, id: &PendingId) -> Option<&PendingFile> {
        self.state.entries.iter().find(|e| &e.id == id)
    }

    pub fn len(&self) -> usize {
        self.state.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.entries.is_empty()
    }

    pub fn total_size_bytes(&self) -> u64 {
        self.state.entries.iter().map(|e| e.size_bytes).sum()
    }

    /// Every entry needs a non-blank name. Reports all offenders at once.
    pub fn validate_for_submit(&self) -> Result<(), AppError> {
        let unnamed: Vec<&str> = self
            .state
            .entries
            .iter()
            .filter(|e| !e.has_name())
            .map(|e| e.original_filename.as_str())
            .collect();

        if unnamed.is_empty() {
            return Ok(());
        }

        let noun = if unnamed.len() == 1 { "file is" } else { "files are" };
        Err(AppError::Validation(format!(
            "{} {} missing a name: {}",
            unnamed.len(),
            noun,
            unnamed.join(", ")
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AssetKind;

    fn pending(id: &str, name: &str) -> PendingFile {
        PendingFile {
            id: PendingId::from(id),
            name: name.to_string(),
            kind: AssetKind::Image,
            category: "image".to_string(),
            description: None,
            encoded_data: "data:image/png;base64,AA==".to_string(),
            size_bytes: 1,
            original_filename: format!("{}.png", id),
            mime_type: "image/png".to_string(),
        }
    }

    #[test]
    fn add_then_remove_leaves_the_other() {
        let mut queue = UploadQueue::new();
        let a = pending("a", "A");
        let b = pending("b", "B");
        queue.add(vec![a.clone(), b.clone()]);
        queue.remove(&a.id);
        assert_eq!(queue.entries(), &[b]);
    }

    #[test]
    fn add_keeps_same_named_files_but_not_same_ids() {
        let state = reduce(
            QueueState::default(),
            QueueAction::Add(vec![pending("a", "Same"), pending("b", "Same"), pending("a", "Dup")]),
        );
        let ids: Vec<_> = state.entries.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn update_merges_and_ignores_unknown_ids() {
        let mut queue = UploadQueue::new();
        queue.add(vec![pending("a", "A")]);
        queue.update(
            &PendingId::from("a"),
            PendingFilePatch {
                name: Some("Renamed".to_string()),
                description: Some(Some("hero shot".to_string())),
                ..PendingFilePatch::default()
            },
        );
        queue.update(&PendingId::from("missing"), PendingFilePatch::name("x"));
        queue.remove(&PendingId::from("missing"));

        let entry = queue.get(&PendingId::from("a")).unwrap();
        assert_eq!(entry.name, "Renamed");
        assert_eq!(entry.description.as_deref(), Some("hero shot"));
        assert_eq!(entry.category, "image");
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn apply_defaults_overwrites_every_entry() {
        let mut queue = UploadQueue::new();
        queue.add(vec![pending("a", "A"), pending("b", "B")]);
        queue.apply_defaults_to_all(AssetDefaults {
            kind: AssetKind::Document,
            category: "branding".to_string(),
            description: Some("2024 refresh".to_string()),
        });
        for entry in queue.entries() {
            assert_eq!(entry.kind, AssetKind::Document);
            assert_eq!(entry.category, "branding");
            assert_eq!(entry.description.as_deref(), Some("2024 refresh"));
        }
        // names are not part of the template
        assert_eq!(queue.entries()[0].name, "A");
    }

    #[test]
    fn validation_reports_every_unnamed_entry() {
        let mut queue = UploadQueue::new();
        queue.add(vec![pending("a", ""), pending("b", "   "), pending("c", "ok")]);
        let err = queue.validate_for_submit().unwrap_err();
        match err {
            AppError::Validation(msg) => {
                assert!(msg.starts_with("2 files are missing a name"));
                assert!(msg.contains("a.png"));
                assert!(msg.contains("b.png"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(queue.len(), 3);
    }

    #[test]
    fn clear_and_take_all() {
        let mut queue = UploadQueue::new();
        queue.add(vec![pending("a", "A"), pending("b", "B")]);
        assert_eq!(queue.total_size_bytes(), 2);
        let taken = queue.take_all();
        assert_eq!(taken.len(), 2);
        assert!(queue.is_empty());

        queue.add(taken);
        queue.clear();
        assert!(queue.is_empty());
    }

    #[test]
    fn pending_from_encoded_uses_classifier() {
        let encoded = EncodedFile {
            file_name: "company-logo.png".to_string(),
            mime_type: "image/png".to_string(),
            size_bytes: 3,
            data_url: "data:image/png;base64,AAAA".to_string(),
            strategy: crate::encoder::ReadStrategy::DataUrl,
        };
        let file = pending_from_encoded(encoded);
        assert_eq!(file.name, "company-logo");
        assert_eq!(file.kind, AssetKind::Image);
        assert_eq!(file.category, "logo");
        assert_eq!(file.size_bytes, 3);
    }
}
