pub mod model;
pub mod reconcile;
pub mod request;
pub mod wire;

pub use model::{
    ProjectDetails, ProjectKind, ProjectMeta, ProjectV2, SchoolMeta, SelfStudyMeta, SubjectArea,
    is_school_project, is_self_study_project, project_display_name,
};
pub use reconcile::{ReconcileError, format_last_updated, reconcile, reconcile_all, try_reconcile};
pub use request::{CreateProjectRequest, PayloadError};
pub use wire::{ProjectType, ProjectWire, SchoolData, SelfStudyData};
