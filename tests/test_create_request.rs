//! Integration tests for turning a finished wizard into a create request,
//! and reading the backend's answer back into card shape.

mod common;

use studyplan::{
    project::{CreateProjectRequest, PayloadError, reconcile},
    wizard::flows,
};

use common::*;

fn completed_school_wizard() -> anyhow::Result<WizardController> {
    let mut wizard = WizardController::builder(flows::project_creation()).build()?;
    wizard.set_answer("project_name", "  Bio 101 ");
    wizard.go_next();
    wizard.set_answer("course_name", "Biology");
    wizard.set_answer("teacher_name", "Ms. Frizzle");
    wizard.go_next();
    wizard.skip();
    assert_eq!(wizard.go_next(), StepOutcome::Completed);
    Ok(wizard)
}

#[test]
fn test_school_request_fills_flat_and_nested_fields() -> anyhow::Result<()> {
    // 1. Finish the school flow
    let wizard = completed_school_wizard()?;
    let payload = wizard.submission_payload().expect("payload");

    // 2. Build the request
    let request = CreateProjectRequest::from_answers(wizard.flow_id(), payload)?;
    assert_eq!(request.name, "Bio 101");
    assert_eq!(request.project_type, ProjectType::School);
    assert_eq!(request.course_name.as_deref(), Some("Biology"));
    assert_eq!(request.course_code, None);

    // 3. Wire field names match the backend contract
    let json = serde_json::to_value(&request)?;
    assert_eq!(
        json,
        serde_json::json!({
            "name": "Bio 101",
            "project_type": "school",
            "course_name": "Biology",
            "teacher_name": "Ms. Frizzle",
            "school_data": {
                "course_name": "Biology",
                "teacher_name": "Ms. Frizzle"
            },
            "is_draft": false
        })
    );

    Ok(())
}

#[test]
fn test_backend_echo_reconciles_to_same_values() -> anyhow::Result<()> {
    // The backend echoes the request with id and timestamps added
    let wizard = completed_school_wizard()?;
    let request = CreateProjectRequest::from_answers(
        wizard.flow_id(),
        wizard.submission_payload().expect("payload"),
    )?
    .as_draft();

    let mut echoed = serde_json::to_value(&request)?;
    echoed["id"] = serde_json::json!("p-1");
    echoed["created_at"] = serde_json::json!("2024-05-01T09:00:00Z");
    echoed["updated_at"] = serde_json::json!("2024-05-02T09:00:00Z");
    let wire: ProjectWire = serde_json::from_value(echoed)?;
    assert!(wire.is_draft);

    let project = reconcile(&wire);
    assert_eq!(project.display_name(), "Biology");
    assert_eq!(project.last_updated, "5/2/2024");
    assert_eq!(
        project.school_meta().map(|m| m.teacher_name.as_str()),
        Some("Ms. Frizzle")
    );

    Ok(())
}

#[test]
fn test_self_study_request() -> anyhow::Result<()> {
    let answers = Answers::new()
        .with("project_name", "Spanish")
        .with("goal_description", "Order food")
        .with("frequency", "daily");
    let request = CreateProjectRequest::from_answers(flows::SELF_STUDY_SETUP, &answers)?;

    assert_eq!(request.project_type, ProjectType::SelfStudy);
    assert_eq!(request.study_frequency.as_deref(), Some("daily"));
    let nested = request.self_study_data.expect("nested data");
    assert_eq!(nested.goal_description.as_deref(), Some("Order food"));
    assert!(request.school_data.is_none());

    Ok(())
}

#[test]
fn test_request_errors() -> anyhow::Result<()> {
    let answers = Answers::new().with("project_name", "Spanish");
    assert_eq!(
        CreateProjectRequest::from_answers(flows::SELF_STUDY_SETUP, &answers),
        Err(PayloadError::MissingField("goal_description"))
    );
    assert_eq!(
        CreateProjectRequest::from_answers(flows::PROJECT_CREATION, &Answers::new()),
        Err(PayloadError::MissingField("project_name"))
    );
    assert_eq!(
        CreateProjectRequest::from_answers(flows::FLASHCARD_CREATION, &answers),
        Err(PayloadError::UnsupportedFlow("flashcard-creation".to_string()))
    );
    Ok(())
}
