pub mod config;
pub mod core;
pub mod logging;
pub mod project;
pub mod wizard;

pub use config::{Persistence, WizardConfig};
pub use crate::core::store::{FileStore, KeyValueStore, MemoryStore, StorageError};
pub use project::{
    CreateProjectRequest, ProjectV2, ProjectWire, is_school_project, is_self_study_project,
    project_display_name, reconcile, try_reconcile,
};
pub use wizard::{AnswerValue, Answers, StepOutcome, WizardController, WizardFlow};
