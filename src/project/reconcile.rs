use thiserror::Error;
use time::{
    Date, OffsetDateTime, PrimitiveDateTime, format_description::well_known::Rfc3339,
    macros::format_description,
};
use tracing::{debug, warn};

use super::{
    model::{ProjectDetails, ProjectKind, ProjectV2, SchoolMeta, SelfStudyMeta, SubjectArea},
    wire::{ProjectType, ProjectWire},
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReconcileError {
    #[error("project {id:?} has unknown project_type {tag:?}")]
    UnknownProjectType { id: String, tag: String },
}

/// Convert a wire project into its UI shape.
///
/// Total: missing optional fields become empty strings, and an unknown
/// `project_type` is logged and treated as self-study.
pub fn reconcile(wire: &ProjectWire) -> ProjectV2 {
    let kind = match &wire.project_type {
        ProjectType::School => ProjectKind::School,
        ProjectType::SelfStudy => ProjectKind::SelfStudy,
        ProjectType::Unknown(tag) => {
            warn!(
                id = %wire.id,
                project_type = %tag,
                "Unknown project_type; treating project as self_study"
            );
            ProjectKind::SelfStudy
        }
    };
    build(wire, kind)
}

/// Like `reconcile`, but an unknown `project_type` is an error.
pub fn try_reconcile(wire: &ProjectWire) -> Result<ProjectV2, ReconcileError> {
    let kind = match &wire.project_type {
        ProjectType::School => ProjectKind::School,
        ProjectType::SelfStudy => ProjectKind::SelfStudy,
        ProjectType::Unknown(tag) => {
            return Err(ReconcileError::UnknownProjectType {
                id: wire.id.clone(),
                tag: tag.clone(),
            });
        }
    };
    Ok(build(wire, kind))
}

pub fn reconcile_all(wires: &[ProjectWire]) -> Vec<ProjectV2> {
    wires.iter().map(reconcile).collect()
}

fn build(wire: &ProjectWire, kind: ProjectKind) -> ProjectV2 {
    let details = match kind {
        ProjectKind::School => {
            let nested = wire.school_data.as_ref();
            ProjectDetails::School {
                school_meta: SchoolMeta {
                    course_name: pick(
                        nested.and_then(|d| d.course_name.as_deref()),
                        wire.course_name.as_deref(),
                    ),
                    course_code: pick(
                        nested.and_then(|d| d.course_code.as_deref()),
                        wire.course_code.as_deref(),
                    ),
                    teacher_name: pick(
                        nested.and_then(|d| d.teacher_name.as_deref()),
                        wire.teacher_name.as_deref(),
                    ),
                },
            }
        }
        ProjectKind::SelfStudy => {
            let nested = wire.self_study_data.as_ref();
            ProjectDetails::SelfStudy {
                self_study_meta: SelfStudyMeta {
                    goal_description: pick(
                        nested.and_then(|d| d.goal_description.as_deref()),
                        wire.goal_description.as_deref(),
                    ),
                    study_frequency: pick(
                        nested.and_then(|d| d.study_frequency.as_deref()),
                        wire.study_frequency.as_deref(),
                    ),
                },
            }
        }
    };

    ProjectV2 {
        id: wire.id.clone(),
        description: wire.name.clone(),
        last_updated: format_last_updated(&wire.updated_at),
        subject: SubjectArea::default(),
        progress: 0,
        collaborators: 0,
        meta: wire.meta.clone(),
        details,
    }
}

/// Nested value, then the flat legacy value, then "". Empty strings count
/// as absent.
fn pick(nested: Option<&str>, flat: Option<&str>) -> String {
    nested
        .filter(|s| !s.is_empty())
        .or(flat.filter(|s| !s.is_empty()))
        .unwrap_or_default()
        .to_string()
}

/// Render a backend timestamp as a short US date (`1/31/2024`).
///
/// Accepts RFC 3339, a naive `YYYY-MM-DDTHH:MM:SS[.fff]` (or space
/// separated) date-time, or a bare `YYYY-MM-DD`. The calendar date is the
/// one written in the timestamp; no time-zone conversion happens. Anything
/// else is returned unchanged.
pub fn format_last_updated(raw: &str) -> String {
    let raw = raw.trim();
    match parse_date(raw) {
        Some(date) => date
            .format(format_description!(
                "[month padding:none]/[day padding:none]/[year]"
            ))
            .unwrap_or_else(|_| raw.to_string()),
        None => {
            debug!(value = raw, "Unrecognised updated_at; passing through");
            raw.to_string()
        }
    }
}

fn parse_date(raw: &str) -> Option<Date> {
    if let Ok(dt) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Some(dt.date());
    }
    let naive = [
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]"),
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
        format_description!("[year]-[month]-[day] [hour]:[minute]:[second].[subsecond]"),
        format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
    ];
    for format in naive {
        if let Ok(dt) = PrimitiveDateTime::parse(raw, format) {
            return Some(dt.date());
        }
    }
    Date::parse(raw, format_description!("[year]-[month]-[day]")).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pick_prefers_nested_then_flat() {
        assert_eq!(pick(Some("nested"), Some("flat")), "nested");
        assert_eq!(pick(None, Some("flat")), "flat");
        assert_eq!(pick(Some(""), Some("flat")), "flat");
        assert_eq!(pick(None, None), "");
    }

    #[test]
    fn formats_supported_timestamps() {
        assert_eq!(format_last_updated("2024-01-01"), "1/1/2024");
        assert_eq!(format_last_updated("2024-03-15T10:20:30Z"), "3/15/2024");
        assert_eq!(format_last_updated("2024-03-15T23:59:59-05:00"), "3/15/2024");
        assert_eq!(format_last_updated("2024-12-09T08:00:00.123456"), "12/9/2024");
        assert_eq!(format_last_updated("2024-12-09 08:00:00"), "12/9/2024");
    }

    #[test]
    fn unparseable_timestamps_pass_through() {
        assert_eq!(format_last_updated("yesterday"), "yesterday");
        assert_eq!(format_last_updated(""), "");
    }
}
