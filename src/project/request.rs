use serde::Serialize;
use thiserror::Error;

use crate::wizard::{
    answers::Answers,
    flows::{PROJECT_CREATION, SELF_STUDY_SETUP},
};

use super::wire::{ProjectType, SchoolData, SelfStudyData};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PayloadError {
    #[error("flow {0:?} does not create projects")]
    UnsupportedFlow(String),
    #[error("answer {0:?} is missing or empty")]
    MissingField(&'static str),
}

/// Body of a project-create call, in the backend's field names.
///
/// Both the flat legacy fields and the nested `*_data` object are filled so
/// older and newer backends read the same values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateProjectRequest {
    pub name: String,
    pub project_type: ProjectType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub teacher_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goal_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub study_frequency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub school_data: Option<SchoolData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub self_study_data: Option<SelfStudyData>,
    pub is_draft: bool,
}

impl CreateProjectRequest {
    /// Build the request from a finished wizard payload.
    pub fn from_answers(flow_id: &str, answers: &Answers) -> Result<Self, PayloadError> {
        let name = required(answers, "project_name")?;
        match flow_id {
            PROJECT_CREATION => {
                let school = SchoolData {
                    course_name: Some(required(answers, "course_name")?),
                    course_code: optional(answers, "course_code"),
                    teacher_name: optional(answers, "teacher_name"),
                };
                Ok(Self {
                    name,
                    project_type: ProjectType::School,
                    course_name: school.course_name.clone(),
                    course_code: school.course_code.clone(),
                    teacher_name: school.teacher_name.clone(),
                    goal_description: None,
                    study_frequency: None,
                    school_data: Some(school),
                    self_study_data: None,
                    is_draft: false,
                })
            }
            SELF_STUDY_SETUP => {
                let self_study = SelfStudyData {
                    goal_description: Some(required(answers, "goal_description")?),
                    study_frequency: optional(answers, "frequency"),
                };
                Ok(Self {
                    name,
                    project_type: ProjectType::SelfStudy,
                    course_name: None,
                    course_code: None,
                    teacher_name: None,
                    goal_description: self_study.goal_description.clone(),
                    study_frequency: self_study.study_frequency.clone(),
                    school_data: None,
                    self_study_data: Some(self_study),
                    is_draft: false,
                })
            }
            other => Err(PayloadError::UnsupportedFlow(other.to_string())),
        }
    }

    /// Mark the project as a server-side draft.
    pub fn as_draft(mut self) -> Self {
        self.is_draft = true;
        self
    }
}

fn required(answers: &Answers, field: &'static str) -> Result<String, PayloadError> {
    optional(answers, field).ok_or(PayloadError::MissingField(field))
}

fn optional(answers: &Answers, field: &str) -> Option<String> {
    answers
        .text(field)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
