use std::sync::Arc;

use serde::{Deserialize, Serialize};
use time::{OffsetDateTime, format_description::well_known::Rfc3339};
use tracing::{debug, warn};

use crate::core::store::KeyValueStore;

use super::answers::Answers;

const DRAFT_VERSION: u32 = 1;

/// Serialized snapshot written under a flow's storage key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedDraft {
    pub version: u32,
    pub flow: String,
    pub saved_at: String,
    pub answers: Answers,
}

/// Outcome of reading a draft.
#[derive(Debug, Clone, PartialEq)]
pub enum DraftRead {
    Found(PersistedDraft),
    /// Nothing stored, or the stored value is corrupt or from another
    /// version or flow. Safe to overwrite.
    Missing,
    /// The store itself failed. A draft may exist and must not be
    /// overwritten.
    Unreadable,
}

/// Best-effort draft persistence for one storage key.
///
/// Nothing here returns an error: read failures and corrupt data mean "no
/// draft", write failures mean "save skipped". Both are logged.
#[derive(Clone)]
pub struct DraftStore {
    store: Arc<dyn KeyValueStore>,
    key: String,
    flow: String,
}

impl DraftStore {
    pub fn new(store: Arc<dyn KeyValueStore>, key: impl Into<String>, flow: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
            flow: flow.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Read the stored draft, telling an unusable value apart from a store
    /// that could not be read at all.
    pub fn read(&self) -> DraftRead {
        let raw = match self.store.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return DraftRead::Missing,
            Err(e) => {
                warn!(key = %self.key, "Failed to read draft: {}", e);
                return DraftRead::Unreadable;
            }
        };
        match self.parse(&raw) {
            Some(draft) => DraftRead::Found(draft),
            None => DraftRead::Missing,
        }
    }

    /// Read the stored draft, if a readable one exists.
    pub fn load(&self) -> Option<PersistedDraft> {
        match self.read() {
            DraftRead::Found(draft) => Some(draft),
            DraftRead::Missing | DraftRead::Unreadable => None,
        }
    }

    fn parse(&self, raw: &str) -> Option<PersistedDraft> {
        let draft: PersistedDraft = match serde_json::from_str(raw) {
            Ok(draft) => draft,
            Err(e) => {
                warn!(key = %self.key, "Ignoring corrupt draft: {}", e);
                return None;
            }
        };
        if draft.version != DRAFT_VERSION {
            warn!(
                key = %self.key,
                "Ignoring draft with unsupported version {} (expected {})",
                draft.version,
                DRAFT_VERSION
            );
            return None;
        }
        if draft.flow != self.flow {
            warn!(
                key = %self.key,
                "Ignoring draft written by flow {:?} (expected {:?})",
                draft.flow,
                self.flow
            );
            return None;
        }
        Some(draft)
    }

    /// Write `answers` with file content stripped. Returns whether the
    /// write went through.
    pub fn save(&self, answers: &Answers) -> bool {
        let draft = PersistedDraft {
            version: DRAFT_VERSION,
            flow: self.flow.clone(),
            saved_at: OffsetDateTime::now_utc()
                .format(&Rfc3339)
                .unwrap_or_default(),
            answers: answers.without_binary(),
        };
        let raw = match serde_json::to_string(&draft) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(key = %self.key, "Failed to serialize draft: {}", e);
                return false;
            }
        };
        match self.store.set(&self.key, &raw) {
            Ok(()) => {
                debug!(key = %self.key, fields = draft.answers.len(), "Saved draft");
                true
            }
            Err(e) => {
                warn!(key = %self.key, "Failed to save draft: {}", e);
                false
            }
        }
    }

    pub fn clear(&self) {
        match self.store.remove(&self.key) {
            Ok(()) => debug!(key = %self.key, "Cleared draft"),
            Err(e) => warn!(key = %self.key, "Failed to clear draft: {}", e),
        }
    }
}

impl std::fmt::Debug for DraftStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DraftStore")
            .field("key", &self.key)
            .field("flow", &self.flow)
            .finish()
    }
}
