use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use super::model::ProjectMeta;

/// `project_type` discriminator as sent by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ProjectType {
    School,
    SelfStudy,
    /// Any tag outside the known set, kept verbatim.
    Unknown(String),
}

impl ProjectType {
    pub fn as_str(&self) -> &str {
        match self {
            ProjectType::School => "school",
            ProjectType::SelfStudy => "self_study",
            ProjectType::Unknown(tag) => tag,
        }
    }
}

impl From<String> for ProjectType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "school" => ProjectType::School,
            "self_study" => ProjectType::SelfStudy,
            _ => ProjectType::Unknown(value),
        }
    }
}

impl From<&str> for ProjectType {
    fn from(value: &str) -> Self {
        ProjectType::from(value.to_string())
    }
}

impl From<ProjectType> for String {
    fn from(value: ProjectType) -> Self {
        match value {
            ProjectType::Unknown(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ProjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchoolData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teacher_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelfStudyData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub study_frequency: Option<String>,
}

/// Project as exchanged with the backend. Field names are part of the API
/// contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectWire {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
    pub project_type: ProjectType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teacher_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub study_frequency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub school_data: Option<SchoolData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub self_study_data: Option<SelfStudyData>,
    #[serde(default)]
    pub is_draft: bool,
    #[serde(default)]
    pub created_at: String,
    pub updated_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<ProjectMeta>,
}

impl ProjectWire {
    /// Wire value with only the required fields set.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        project_type: impl Into<ProjectType>,
        updated_at: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            project_type: project_type.into(),
            course_name: None,
            course_code: None,
            teacher_name: None,
            goal_description: None,
            study_frequency: None,
            school_data: None,
            self_study_data: None,
            is_draft: false,
            created_at: String::new(),
            updated_at: updated_at.into(),
            meta: None,
        }
    }
}

/// Some backends send numeric ids; both forms become a string.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Str(String),
        Int(i64),
        Uint(u64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Str(s) => s,
        Id::Int(n) => n.to_string(),
        Id::Uint(n) => n.to_string(),
    })
}
