use std::sync::Arc;

use serde::Serialize;

use super::answers::Answers;

/// Static description of one wizard step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepDescriptor {
    pub id: String,
    pub title: String,
    pub description: String,
    pub is_optional: bool,
}

impl StepDescriptor {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            is_optional: false,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn optional(mut self) -> Self {
        self.is_optional = true;
        self
    }
}

/// Inline message shown next to a field that blocks advancement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub field: String,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn required(field: &str) -> Self {
        Self::new(field, format!("{} is required", humanize(field)))
    }
}

/// Completion predicate for a step. Must be a pure function of `answers`.
pub trait CompletionRule: Send + Sync {
    /// Issues preventing completion; empty when the step is complete.
    fn check(&self, answers: &Answers) -> Vec<ValidationIssue>;

    fn is_satisfied(&self, answers: &Answers) -> bool {
        self.check(answers).is_empty()
    }
}

/// Always complete. Used for optional steps such as material uploads.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysComplete;

impl CompletionRule for AlwaysComplete {
    fn check(&self, _answers: &Answers) -> Vec<ValidationIssue> {
        Vec::new()
    }
}

/// Text field must be non-empty after trimming.
#[derive(Debug, Clone)]
pub struct NonEmptyText {
    pub field: String,
}

impl CompletionRule for NonEmptyText {
    fn check(&self, answers: &Answers) -> Vec<ValidationIssue> {
        match answers.text(&self.field) {
            Some(s) if !s.trim().is_empty() => Vec::new(),
            _ => vec![ValidationIssue::required(&self.field)],
        }
    }
}

/// Choice list must contain at least one entry.
#[derive(Debug, Clone)]
pub struct NonEmptyList {
    pub field: String,
}

impl CompletionRule for NonEmptyList {
    fn check(&self, answers: &Answers) -> Vec<ValidationIssue> {
        if answers.choices(&self.field).is_empty() {
            vec![ValidationIssue::new(
                &self.field,
                format!("Select at least one {}", humanize_singular(&self.field)),
            )]
        } else {
            Vec::new()
        }
    }
}

/// Field must hold one of an enumerated set of options.
#[derive(Debug, Clone)]
pub struct OneOf {
    pub field: String,
    pub options: Vec<String>,
}

impl CompletionRule for OneOf {
    fn check(&self, answers: &Answers) -> Vec<ValidationIssue> {
        match answers.text(&self.field) {
            Some(s) if self.options.iter().any(|o| o == s) => Vec::new(),
            Some(s) if !s.is_empty() => vec![ValidationIssue::new(
                &self.field,
                format!("{:?} is not a valid {}", s, humanize(&self.field).to_lowercase()),
            )],
            _ => vec![ValidationIssue::required(&self.field)],
        }
    }
}

/// Integer field within an inclusive range.
#[derive(Debug, Clone)]
pub struct NumberInRange {
    pub field: String,
    pub min: i64,
    pub max: i64,
}

impl CompletionRule for NumberInRange {
    fn check(&self, answers: &Answers) -> Vec<ValidationIssue> {
        match answers.number(&self.field) {
            Some(n) if (self.min..=self.max).contains(&n) => Vec::new(),
            Some(_) => vec![ValidationIssue::new(
                &self.field,
                format!(
                    "{} must be between {} and {}",
                    humanize(&self.field),
                    self.min,
                    self.max
                ),
            )],
            None => vec![ValidationIssue::required(&self.field)],
        }
    }
}

/// At least one uploaded file.
#[derive(Debug, Clone)]
pub struct HasFiles {
    pub field: String,
}

impl CompletionRule for HasFiles {
    fn check(&self, answers: &Answers) -> Vec<ValidationIssue> {
        if answers.files(&self.field).is_empty() {
            vec![ValidationIssue::new(&self.field, "Upload at least one file")]
        } else {
            Vec::new()
        }
    }
}

/// Every inner rule must hold; issues are concatenated.
pub struct AllOf(pub Vec<Arc<dyn CompletionRule>>);

impl CompletionRule for AllOf {
    fn check(&self, answers: &Answers) -> Vec<ValidationIssue> {
        self.0.iter().flat_map(|r| r.check(answers)).collect()
    }
}

/// Rule chosen by the current value of a selector field. Falls back to
/// `otherwise` when the selector matches no branch.
pub struct Branch {
    pub selector: String,
    pub branches: Vec<(String, Arc<dyn CompletionRule>)>,
    pub otherwise: Arc<dyn CompletionRule>,
}

impl CompletionRule for Branch {
    fn check(&self, answers: &Answers) -> Vec<ValidationIssue> {
        let selected = answers.text(&self.selector);
        self.branches
            .iter()
            .find(|(value, _)| Some(value.as_str()) == selected)
            .map(|(_, rule)| rule.check(answers))
            .unwrap_or_else(|| self.otherwise.check(answers))
    }
}

/// A step together with the rule that gates it.
#[derive(Clone)]
pub struct WizardStep {
    pub descriptor: StepDescriptor,
    pub rule: Arc<dyn CompletionRule>,
}

impl WizardStep {
    pub fn new(descriptor: StepDescriptor, rule: impl CompletionRule + 'static) -> Self {
        Self {
            descriptor,
            rule: Arc::new(rule),
        }
    }

    pub fn id(&self) -> &str {
        &self.descriptor.id
    }
}

impl std::fmt::Debug for WizardStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WizardStep")
            .field("descriptor", &self.descriptor)
            .finish_non_exhaustive()
    }
}

pub fn non_empty_text(field: &str) -> NonEmptyText {
    NonEmptyText {
        field: field.to_string(),
    }
}

pub fn non_empty_list(field: &str) -> NonEmptyList {
    NonEmptyList {
        field: field.to_string(),
    }
}

pub fn one_of(field: &str, options: &[&str]) -> OneOf {
    OneOf {
        field: field.to_string(),
        options: options.iter().map(|o| o.to_string()).collect(),
    }
}

/// "focus_areas" -> "Focus areas"
fn humanize(field: &str) -> String {
    let spaced = field.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// "focus_areas" -> "focus area"
fn humanize_singular(field: &str) -> String {
    let lower = field.replace('_', " ");
    lower.strip_suffix('s').map(str::to_string).unwrap_or(lower)
}
