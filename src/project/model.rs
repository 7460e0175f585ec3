use std::fmt;

use serde::{Deserialize, Serialize};

/// Subject-area tag shown on project cards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubjectArea {
    #[default]
    General,
    Science,
    Mathematics,
    Languages,
    Humanities,
    Arts,
    Technology,
}

/// AI-derived tags and summary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectMeta {
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchoolMeta {
    pub course_name: String,
    pub course_code: String,
    pub teacher_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelfStudyMeta {
    pub goal_description: String,
    pub study_frequency: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProjectKind {
    School,
    SelfStudy,
}

impl fmt::Display for ProjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectKind::School => f.write_str("school"),
            ProjectKind::SelfStudy => f.write_str("self_study"),
        }
    }
}

/// Kind-specific half of a project. Serialized with a `kind` tag next to
/// the common fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum ProjectDetails {
    #[serde(rename = "school")]
    School { school_meta: SchoolMeta },
    #[serde(rename = "self_study")]
    SelfStudy { self_study_meta: SelfStudyMeta },
}

/// A project as the UI consumes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectV2 {
    pub id: String,
    pub description: String,
    #[serde(rename = "lastUpdated")]
    pub last_updated: String,
    #[serde(rename = "type")]
    pub subject: SubjectArea,
    pub progress: u8,
    pub collaborators: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<ProjectMeta>,
    #[serde(flatten)]
    pub details: ProjectDetails,
}

impl ProjectV2 {
    pub fn kind(&self) -> ProjectKind {
        match self.details {
            ProjectDetails::School { .. } => ProjectKind::School,
            ProjectDetails::SelfStudy { .. } => ProjectKind::SelfStudy,
        }
    }

    pub fn school_meta(&self) -> Option<&SchoolMeta> {
        match &self.details {
            ProjectDetails::School { school_meta } => Some(school_meta),
            ProjectDetails::SelfStudy { .. } => None,
        }
    }

    pub fn self_study_meta(&self) -> Option<&SelfStudyMeta> {
        match &self.details {
            ProjectDetails::SelfStudy { self_study_meta } => Some(self_study_meta),
            ProjectDetails::School { .. } => None,
        }
    }

    pub fn is_school(&self) -> bool {
        self.school_meta().is_some()
    }

    pub fn is_self_study(&self) -> bool {
        self.self_study_meta().is_some()
    }

    /// Course name for school projects, goal for self-study ones; the
    /// description when that field is empty.
    pub fn display_name(&self) -> &str {
        let preferred = match &self.details {
            ProjectDetails::School { school_meta } => school_meta.course_name.as_str(),
            ProjectDetails::SelfStudy { self_study_meta } => {
                self_study_meta.goal_description.as_str()
            }
        };
        if preferred.is_empty() {
            &self.description
        } else {
            preferred
        }
    }
}

pub fn is_school_project(project: &ProjectV2) -> bool {
    project.is_school()
}

pub fn is_self_study_project(project: &ProjectV2) -> bool {
    project.is_self_study()
}

pub fn project_display_name(project: &ProjectV2) -> &str {
    project.display_name()
}
