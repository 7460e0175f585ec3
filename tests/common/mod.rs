mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from studyplan for tests
pub use studyplan::{
    config::WizardConfig,
    core::store::{FileStore, KeyValueStore, MemoryStore, StorageError},
    project::{ProjectType, ProjectV2, ProjectWire, SchoolData, SelfStudyData},
    wizard::{
        AnswerValue, Answers, BackOutcome, FileAnswer, FileHandle, FileMeta, StepOutcome,
        WizardController, WizardFlow, WizardPhase,
    },
};
