//! Integration tests for reconciling wire projects.
//!
//! Tests cover:
//! - School and self-study branches with nested/flat fallbacks
//! - Unknown project types in lenient and strict mode
//! - Display helpers and the serialized card shape
//! - Decoding backend JSON

mod common;

use studyplan::project::{
    ProjectKind, ReconcileError, is_school_project, is_self_study_project, project_display_name,
    reconcile, reconcile_all, try_reconcile,
};

use common::*;

#[test]
fn test_school_project_with_flat_course_name() -> anyhow::Result<()> {
    let mut wire = make_wire("1", "Bio 101", "school");
    wire.course_name = Some("Biology".to_string());

    let project = reconcile(&wire);

    assert_eq!(project.id, "1");
    assert_eq!(project.description, "Bio 101");
    assert_eq!(project.last_updated, "1/1/2024");
    assert_eq!(project.progress, 0);
    assert_eq!(project.collaborators, 0);
    assert_eq!(project.kind(), ProjectKind::School);
    let meta = project.school_meta().expect("school meta");
    assert_eq!(meta.course_name, "Biology");
    assert_eq!(meta.course_code, "");
    assert_eq!(meta.teacher_name, "");
    assert!(project.self_study_meta().is_none());

    Ok(())
}

#[test]
fn test_nested_school_data_wins_per_field() -> anyhow::Result<()> {
    let mut wire = make_wire("2", "Chem", "school");
    wire.course_name = Some("Old Chemistry".to_string());
    wire.course_code = Some("CH-100".to_string());
    wire.teacher_name = Some("Dr. Flat".to_string());
    wire.school_data = Some(SchoolData {
        course_name: Some("Chemistry".to_string()),
        course_code: None,
        teacher_name: Some(String::new()),
    });

    let project = reconcile(&wire);
    let meta = project.school_meta().expect("school meta");
    assert_eq!(meta.course_name, "Chemistry");
    assert_eq!(meta.course_code, "CH-100");
    assert_eq!(meta.teacher_name, "Dr. Flat");

    Ok(())
}

#[test]
fn test_self_study_fallbacks() -> anyhow::Result<()> {
    let mut wire = make_wire("3", "Spanish", "self_study");
    wire.study_frequency = Some("daily".to_string());
    wire.self_study_data = Some(SelfStudyData {
        goal_description: Some("Order food in Madrid".to_string()),
        study_frequency: None,
    });
    // Flat school fields are ignored on a self-study project
    wire.course_name = Some("Ignored".to_string());

    let project = reconcile(&wire);
    let meta = project.self_study_meta().expect("self-study meta");
    assert_eq!(meta.goal_description, "Order food in Madrid");
    assert_eq!(meta.study_frequency, "daily");
    assert!(project.school_meta().is_none());

    Ok(())
}

#[test]
fn test_unknown_type_falls_back_to_self_study() -> anyhow::Result<()> {
    let wire = make_wire("4", "Mystery", "bootcamp");
    assert_eq!(wire.project_type, ProjectType::Unknown("bootcamp".to_string()));

    let project = reconcile(&wire);
    assert_eq!(project.kind(), ProjectKind::SelfStudy);
    assert_eq!(
        try_reconcile(&wire),
        Err(ReconcileError::UnknownProjectType {
            id: "4".to_string(),
            tag: "bootcamp".to_string(),
        })
    );
    assert!(try_reconcile(&make_wire("5", "Known", "school")).is_ok());

    Ok(())
}

#[test]
fn test_exactly_one_kind_holds() -> anyhow::Result<()> {
    let wires = vec![
        make_wire("a", "A", "school"),
        make_wire("b", "B", "self_study"),
        make_wire("c", "C", ""),
        make_wire("d", "D", "SCHOOL"),
    ];
    for project in reconcile_all(&wires) {
        assert_ne!(is_school_project(&project), is_self_study_project(&project));
    }
    Ok(())
}

#[test]
fn test_display_name_falls_back_to_description() -> anyhow::Result<()> {
    let mut school = make_wire("1", "Bio 101", "school");
    assert_eq!(project_display_name(&reconcile(&school)), "Bio 101");
    school.course_name = Some("Biology".to_string());
    assert_eq!(project_display_name(&reconcile(&school)), "Biology");

    let mut self_study = make_wire("2", "Spanish", "self_study");
    assert_eq!(project_display_name(&reconcile(&self_study)), "Spanish");
    self_study.goal_description = Some("Be conversational".to_string());
    assert_eq!(project_display_name(&reconcile(&self_study)), "Be conversational");

    Ok(())
}

#[test]
fn test_decode_minimal_backend_json() -> anyhow::Result<()> {
    let wire: ProjectWire = serde_json::from_str(
        r#"{"id": 42, "name": "Bio 101", "project_type": "school",
            "course_name": null, "school_data": {"course_name": "Biology"},
            "updated_at": "2024-03-15T10:20:30Z"}"#,
    )?;
    assert_eq!(wire.id, "42");
    assert!(!wire.is_draft);

    let project = reconcile(&wire);
    assert_eq!(project.last_updated, "3/15/2024");
    assert_eq!(project.school_meta().map(|m| m.course_name.as_str()), Some("Biology"));

    Ok(())
}

#[test]
fn test_card_shape_serialization() -> anyhow::Result<()> {
    let mut wire = make_wire("1", "Bio 101", "school");
    wire.course_name = Some("Biology".to_string());

    let json = serde_json::to_value(reconcile(&wire))?;
    assert_eq!(
        json,
        serde_json::json!({
            "id": "1",
            "description": "Bio 101",
            "lastUpdated": "1/1/2024",
            "type": "general",
            "progress": 0,
            "collaborators": 0,
            "kind": "school",
            "school_meta": {
                "course_name": "Biology",
                "course_code": "",
                "teacher_name": ""
            }
        })
    );

    // The card shape reads back into the same value
    let back: ProjectV2 = serde_json::from_value(json)?;
    assert_eq!(back, reconcile(&wire));

    Ok(())
}

#[test]
fn test_wire_project_type_serializes_verbatim() -> anyhow::Result<()> {
    let wire = make_wire("9", "X", "bootcamp");
    let json = serde_json::to_value(&wire)?;
    assert_eq!(json["project_type"], "bootcamp");
    assert_eq!(json["is_draft"], false);
    assert!(json.get("school_data").is_none());
    Ok(())
}
