pub mod answers;
pub mod controller;
pub mod draft;
pub mod flows;
pub mod step;

pub use answers::{AnswerValue, Answers, FileAnswer, FileHandle, FileMeta};
pub use controller::{
    BackOutcome, ExitHandler, StepOutcome, WizardBuilder, WizardController, WizardError,
    WizardPhase,
};
pub use draft::{DraftRead, DraftStore, PersistedDraft};
pub use flows::WizardFlow;
pub use step::{CompletionRule, StepDescriptor, ValidationIssue, WizardStep};
