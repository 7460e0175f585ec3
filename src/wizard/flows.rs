//! Built-in wizard flows.

use std::sync::Arc;

use super::{
    answers::Answers,
    step::{
        AllOf, AlwaysComplete, Branch, CompletionRule, HasFiles, NumberInRange, StepDescriptor,
        WizardStep, non_empty_list, non_empty_text, one_of,
    },
};

pub const PROJECT_CREATION: &str = "project-creation";
pub const SELF_STUDY_SETUP: &str = "self-study-setup";
pub const DIAGNOSTIC_CREATION: &str = "diagnostic-creation";
pub const FLASHCARD_CREATION: &str = "flashcard-creation";

pub const COLLABORATION_OPTIONS: &[&str] = &["solo", "study_group", "class"];
pub const PURPOSE_OPTIONS: &[&str] = &["exam_prep", "skill_building", "career", "curiosity"];
pub const TIMEFRAME_OPTIONS: &[&str] = &["2_weeks", "1_month", "3_months", "6_months"];
pub const FREQUENCY_OPTIONS: &[&str] = &["daily", "few_times_week", "weekly"];
pub const DIAGNOSTIC_FORMAT_OPTIONS: &[&str] = &["multiple_choice", "short_answer", "mixed"];
pub const FLASHCARD_SOURCE_OPTIONS: &[&str] = &["materials", "topic"];

pub const MIN_DIAGNOSTIC_QUESTIONS: i64 = 5;
pub const MAX_DIAGNOSTIC_QUESTIONS: i64 = 50;
pub const MIN_FLASHCARDS: i64 = 5;
pub const MAX_FLASHCARDS: i64 = 100;

/// A named sequence of steps plus the answers a fresh run starts from.
#[derive(Debug, Clone)]
pub struct WizardFlow {
    pub id: String,
    pub title: String,
    pub steps: Vec<WizardStep>,
    pub defaults: Answers,
}

impl WizardFlow {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            steps: Vec::new(),
            defaults: Answers::new(),
        }
    }

    pub fn add_step(mut self, step: WizardStep) -> Self {
        self.steps.push(step);
        self
    }

    pub fn with_defaults(mut self, defaults: Answers) -> Self {
        self.defaults = defaults;
        self
    }

    /// Storage key used for this flow's drafts.
    pub fn storage_key(&self) -> String {
        format!("{}-draft", self.id)
    }
}

/// Look up a built-in flow by id.
pub fn by_id(id: &str) -> Option<WizardFlow> {
    match id {
        PROJECT_CREATION => Some(project_creation()),
        SELF_STUDY_SETUP => Some(self_study_setup()),
        DIAGNOSTIC_CREATION => Some(diagnostic_creation()),
        FLASHCARD_CREATION => Some(flashcard_creation()),
        _ => None,
    }
}

pub fn all() -> Vec<WizardFlow> {
    vec![
        project_creation(),
        self_study_setup(),
        diagnostic_creation(),
        flashcard_creation(),
    ]
}

fn name_step() -> WizardStep {
    WizardStep::new(
        StepDescriptor::new("name", "Name your project")
            .with_description("Give the project a name you will recognise later."),
        non_empty_text("project_name"),
    )
}

fn materials_step() -> WizardStep {
    WizardStep::new(
        StepDescriptor::new("materials", "Learning materials")
            .with_description("Upload notes, slides or a syllabus. You can add these later.")
            .optional(),
        AlwaysComplete,
    )
}

fn collaboration_step() -> WizardStep {
    WizardStep::new(
        StepDescriptor::new("collaboration", "Who are you studying with?"),
        one_of("collaboration", COLLABORATION_OPTIONS),
    )
}

/// School course project.
pub fn project_creation() -> WizardFlow {
    WizardFlow::new(PROJECT_CREATION, "Create a school project")
        .add_step(name_step())
        .add_step(WizardStep::new(
            StepDescriptor::new("course", "Course details")
                .with_description("Course name is required; code and teacher are optional."),
            non_empty_text("course_name"),
        ))
        .add_step(materials_step())
        .add_step(collaboration_step())
        .with_defaults(Answers::new().with("collaboration", "solo"))
}

pub fn self_study_setup() -> WizardFlow {
    WizardFlow::new(SELF_STUDY_SETUP, "Set up a self-study plan")
        .add_step(name_step())
        .add_step(WizardStep::new(
            StepDescriptor::new("purpose", "Why are you studying?").optional(),
            one_of("purpose", PURPOSE_OPTIONS),
        ))
        .add_step(WizardStep::new(
            StepDescriptor::new("focus_areas", "Focus areas"),
            non_empty_list("focus_areas"),
        ))
        .add_step(WizardStep::new(
            StepDescriptor::new("timeframe", "Timeframe"),
            one_of("timeframe", TIMEFRAME_OPTIONS),
        ))
        .add_step(WizardStep::new(
            StepDescriptor::new("frequency", "Study frequency"),
            one_of("frequency", FREQUENCY_OPTIONS),
        ))
        .add_step(WizardStep::new(
            StepDescriptor::new("goal", "Your goal")
                .with_description("Describe what you want to be able to do when you finish."),
            non_empty_text("goal_description"),
        ))
        .add_step(materials_step())
        .add_step(collaboration_step())
        .with_defaults(Answers::new().with("collaboration", "solo"))
}

pub fn diagnostic_creation() -> WizardFlow {
    WizardFlow::new(DIAGNOSTIC_CREATION, "Create a diagnostic")
        .add_step(WizardStep::new(
            StepDescriptor::new("topics", "Topics to assess"),
            non_empty_list("topics"),
        ))
        .add_step(WizardStep::new(
            StepDescriptor::new("format", "Question format"),
            one_of("format", DIAGNOSTIC_FORMAT_OPTIONS),
        ))
        .add_step(WizardStep::new(
            StepDescriptor::new("length", "Number of questions"),
            NumberInRange {
                field: "question_count".to_string(),
                min: MIN_DIAGNOSTIC_QUESTIONS,
                max: MAX_DIAGNOSTIC_QUESTIONS,
            },
        ))
        .with_defaults(
            Answers::new()
                .with("format", "mixed")
                .with("question_count", 10_i64),
        )
}

pub fn flashcard_creation() -> WizardFlow {
    let content_rule = Branch {
        selector: "source".to_string(),
        branches: vec![(
            "materials".to_string(),
            Arc::new(HasFiles {
                field: "materials".to_string(),
            }) as Arc<dyn CompletionRule>,
        )],
        otherwise: Arc::new(non_empty_text("topic")),
    };
    WizardFlow::new(FLASHCARD_CREATION, "Create flashcards")
        .add_step(WizardStep::new(
            StepDescriptor::new("source", "Generate from"),
            one_of("source", FLASHCARD_SOURCE_OPTIONS),
        ))
        .add_step(WizardStep::new(
            StepDescriptor::new("content", "Content")
                .with_description("Upload materials or name a topic, depending on the source."),
            content_rule,
        ))
        .add_step(WizardStep::new(
            StepDescriptor::new("deck", "Deck"),
            AllOf(vec![
                Arc::new(non_empty_text("deck_name")) as Arc<dyn CompletionRule>,
                Arc::new(NumberInRange {
                    field: "card_count".to_string(),
                    min: MIN_FLASHCARDS,
                    max: MAX_FLASHCARDS,
                }),
            ]),
        ))
        .with_defaults(Answers::new().with("card_count", 20_i64))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_flow_resolves_by_id() {
        for flow in all() {
            let found = by_id(&flow.id).expect("flow should resolve");
            assert_eq!(found.steps.len(), flow.steps.len());
        }
        assert!(by_id("nope").is_none());
    }

    #[test]
    fn step_ids_are_unique_per_flow() {
        for flow in all() {
            let mut ids: Vec<&str> = flow.steps.iter().map(|s| s.id()).collect();
            ids.sort();
            ids.dedup();
            assert_eq!(ids.len(), flow.steps.len(), "duplicate step in {}", flow.id);
        }
    }
}
