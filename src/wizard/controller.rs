use std::{collections::HashMap, sync::Arc};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{config::WizardConfig, core::store::KeyValueStore};

use super::{
    answers::{AnswerValue, Answers},
    draft::{DraftRead, DraftStore},
    flows::WizardFlow,
    step::{CompletionRule, StepDescriptor, ValidationIssue, WizardStep},
};

/// Callback invoked when the user backs out of the first step.
pub type ExitHandler = Box<dyn FnMut() + Send>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WizardError {
    #[error("wizard {0:?} has no steps")]
    NoSteps(String),
    #[error("wizard {flow:?} declares step {step:?} more than once")]
    DuplicateStep { flow: String, step: String },
    #[error("persistence enabled for key {0:?} but no store was supplied")]
    MissingStore(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardPhase {
    InProgress,
    /// Past the last step; answers are the submission payload.
    Summary,
}

/// Result of a forward move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Advanced { from: usize, to: usize },
    /// Moved past the last step into the summary phase.
    Completed,
    /// The active step's predicate does not hold.
    Blocked {
        step_id: String,
        issues: Vec<ValidationIssue>,
    },
    /// Already in the summary phase; nothing to do.
    AlreadyComplete,
}

/// Result of a backward move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackOutcome {
    Moved { from: usize, to: usize },
    /// Left the summary phase for the last step.
    ReturnedFromSummary,
    /// At the first step; the exit handler was invoked.
    Exited,
}

/// Drives a linear, step-gated wizard.
pub struct WizardController {
    flow_id: String,
    steps: Vec<WizardStep>,
    rules: HashMap<String, Arc<dyn CompletionRule>>,
    current_step_index: usize,
    phase: WizardPhase,
    answers: Answers,
    dirty: bool,
    drafts: Option<DraftStore>,
    on_exit: Option<ExitHandler>,
}

/// Builder for `WizardController`.
pub struct WizardBuilder {
    flow: WizardFlow,
    config: WizardConfig,
    store: Option<Arc<dyn KeyValueStore>>,
    on_exit: Option<ExitHandler>,
}

impl WizardBuilder {
    pub fn with_config(mut self, config: WizardConfig) -> Self {
        self.config = config;
        self
    }

    /// Store used when persistence is enabled in the config.
    pub fn with_store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn on_exit(mut self, handler: impl FnMut() + Send + 'static) -> Self {
        self.on_exit = Some(Box::new(handler));
        self
    }

    /// Validate the flow and, when persistence is enabled, merge any stored
    /// draft over the flow's default answers.
    pub fn build(self) -> Result<WizardController, WizardError> {
        let WizardFlow {
            id: flow_id,
            steps,
            defaults,
            ..
        } = self.flow;

        if steps.is_empty() {
            return Err(WizardError::NoSteps(flow_id));
        }
        let mut rules = HashMap::with_capacity(steps.len());
        for step in &steps {
            if rules
                .insert(step.id().to_string(), step.rule.clone())
                .is_some()
            {
                return Err(WizardError::DuplicateStep {
                    flow: flow_id,
                    step: step.id().to_string(),
                });
            }
        }

        let mut drafts = match (self.config.storage_key(), self.store) {
            (Some(key), Some(store)) => Some(DraftStore::new(store, key, flow_id.clone())),
            (Some(key), None) => return Err(WizardError::MissingStore(key.to_string())),
            (None, _) => None,
        };

        let mut answers = defaults;
        match drafts.as_ref().map(DraftStore::read) {
            Some(DraftRead::Found(draft)) => {
                info!(
                    flow = %flow_id,
                    fields = draft.answers.len(),
                    "Restored draft answers"
                );
                answers.merge_all(draft.answers);
            }
            Some(DraftRead::Unreadable) => {
                warn!(
                    flow = %flow_id,
                    "Draft store unreadable; auto-save disabled for this session"
                );
                drafts = None;
            }
            Some(DraftRead::Missing) | None => {}
        }

        Ok(WizardController {
            flow_id,
            steps,
            rules,
            current_step_index: 0,
            phase: WizardPhase::InProgress,
            answers,
            dirty: false,
            drafts,
            on_exit: self.on_exit,
        })
    }
}

impl WizardController {
    pub fn builder(flow: WizardFlow) -> WizardBuilder {
        WizardBuilder {
            flow,
            config: WizardConfig::default(),
            store: None,
            on_exit: None,
        }
    }

    pub fn flow_id(&self) -> &str {
        &self.flow_id
    }

    pub fn steps(&self) -> impl Iterator<Item = &StepDescriptor> {
        self.steps.iter().map(|s| &s.descriptor)
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    pub fn current_step_index(&self) -> usize {
        self.current_step_index
    }

    pub fn current_step(&self) -> &StepDescriptor {
        &self.steps[self.current_step_index].descriptor
    }

    pub fn phase(&self) -> WizardPhase {
        self.phase
    }

    pub fn is_complete(&self) -> bool {
        self.phase == WizardPhase::Summary
    }

    pub fn answers(&self) -> &Answers {
        &self.answers
    }

    /// True when answers changed since construction or the last successful save.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn is_persistent(&self) -> bool {
        self.drafts.is_some()
    }

    /// Collected answers once the wizard has reached the summary phase.
    pub fn submission_payload(&self) -> Option<&Answers> {
        self.is_complete().then_some(&self.answers)
    }

    /// Evaluate a step's predicate. Unknown ids count as satisfied.
    pub fn is_step_complete(&self, step_id: &str) -> bool {
        match self.rules.get(step_id) {
            Some(rule) => rule.is_satisfied(&self.answers),
            None => {
                debug!(flow = %self.flow_id, step = step_id, "No rule for step; treating as complete");
                true
            }
        }
    }

    /// Inline messages for a step; empty for complete or unknown steps.
    pub fn validation_issues(&self, step_id: &str) -> Vec<ValidationIssue> {
        self.rules
            .get(step_id)
            .map(|rule| rule.check(&self.answers))
            .unwrap_or_default()
    }

    /// `(index + 1) / total * 100`, rounded.
    pub fn progress_percent(&self) -> u8 {
        let ratio = (self.current_step_index + 1) as f64 / self.steps.len() as f64;
        (ratio * 100.0).round() as u8
    }

    pub fn go_next(&mut self) -> StepOutcome {
        if self.is_complete() {
            return StepOutcome::AlreadyComplete;
        }
        let step = &self.steps[self.current_step_index];
        let issues = step.rule.check(&self.answers);
        if !issues.is_empty() {
            debug!(
                flow = %self.flow_id,
                step = step.id(),
                issues = issues.len(),
                "Step incomplete; not advancing"
            );
            return StepOutcome::Blocked {
                step_id: step.id().to_string(),
                issues,
            };
        }
        self.advance()
    }

    /// Advance past an optional step regardless of its predicate. On a
    /// required step this is a gated `go_next`.
    pub fn skip(&mut self) -> StepOutcome {
        if self.is_complete() {
            return StepOutcome::AlreadyComplete;
        }
        if self.current_step().is_optional {
            debug!(flow = %self.flow_id, step = %self.current_step().id, "Skipping optional step");
            self.advance()
        } else {
            self.go_next()
        }
    }

    pub fn go_back(&mut self) -> BackOutcome {
        if self.is_complete() {
            self.phase = WizardPhase::InProgress;
            debug!(flow = %self.flow_id, "Returned from summary");
            return BackOutcome::ReturnedFromSummary;
        }
        if self.current_step_index > 0 {
            let from = self.current_step_index;
            self.current_step_index -= 1;
            debug!(flow = %self.flow_id, from, to = self.current_step_index, "Moved back");
            return BackOutcome::Moved {
                from,
                to: self.current_step_index,
            };
        }
        debug!(flow = %self.flow_id, "Exiting wizard from first step");
        if let Some(handler) = self.on_exit.as_mut() {
            handler();
        }
        BackOutcome::Exited
    }

    /// Merge one field into the answers and auto-save when enabled.
    pub fn set_answer(&mut self, field: impl Into<String>, value: impl Into<AnswerValue>) {
        if self.answers.merge(field, value.into()) {
            self.dirty = true;
        }
        self.persist();
    }

    /// Drop one field and auto-save when enabled.
    pub fn clear_answer(&mut self, field: &str) {
        if self.answers.remove(field).is_some() {
            self.dirty = true;
        }
        self.persist();
    }

    /// Discard the wizard after a successful submission, clearing its
    /// draft. This is the only path that removes a stored draft.
    pub fn finish_submission(self) -> Answers {
        if let Some(drafts) = &self.drafts {
            drafts.clear();
        }
        info!(flow = %self.flow_id, "Wizard submitted");
        self.answers
    }

    /// Discard the wizard without submitting. A stored draft is kept so the
    /// flow can resume later.
    pub fn cancel(self) {
        info!(flow = %self.flow_id, "Wizard cancelled");
    }

    fn advance(&mut self) -> StepOutcome {
        let from = self.current_step_index;
        if from + 1 < self.steps.len() {
            self.current_step_index += 1;
            debug!(flow = %self.flow_id, from, to = self.current_step_index, "Advanced");
            StepOutcome::Advanced {
                from,
                to: self.current_step_index,
            }
        } else {
            self.phase = WizardPhase::Summary;
            info!(flow = %self.flow_id, "Wizard complete");
            StepOutcome::Completed
        }
    }

    fn persist(&mut self) {
        if let Some(drafts) = &self.drafts {
            if drafts.save(&self.answers) {
                self.dirty = false;
            }
        }
    }
}

impl std::fmt::Debug for WizardController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WizardController")
            .field("flow_id", &self.flow_id)
            .field("current_step_index", &self.current_step_index)
            .field("phase", &self.phase)
            .field("answers", &self.answers)
            .field("drafts", &self.drafts)
            .finish_non_exhaustive()
    }
}
