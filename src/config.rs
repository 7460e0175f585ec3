use std::path::PathBuf;

/// Environment variable consulted by the binary for the draft directory.
pub const STORE_DIR_ENV: &str = "STUDYPLAN_STORE_DIR";

/// Whether a wizard auto-saves its answers, and under which key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Persistence {
    #[default]
    Disabled,
    Enabled { storage_key: String },
}

/// Construction-time settings for a `WizardController`.
///
/// Everything that changes controller behaviour is passed in here; the
/// controller reads no environment or global flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WizardConfig {
    pub persistence: Persistence,
}

impl WizardConfig {
    /// Keep answers in memory only.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Auto-save answers under `storage_key`.
    pub fn persisted(storage_key: impl Into<String>) -> Self {
        Self {
            persistence: Persistence::Enabled {
                storage_key: storage_key.into(),
            },
        }
    }

    pub fn storage_key(&self) -> Option<&str> {
        match &self.persistence {
            Persistence::Enabled { storage_key } => Some(storage_key),
            Persistence::Disabled => None,
        }
    }
}

/// Platform data directory for drafts, e.g. `~/.local/share/studyplan/drafts`.
/// Falls back to a relative `.studyplan/drafts` when the platform has none.
pub fn default_store_dir() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("studyplan"))
        .unwrap_or_else(|| PathBuf::from(".studyplan"))
        .join("drafts")
}
