//! Case tracking around the rule engine: stored evaluations, status pipeline, evidence
//! metadata, reusable templates, and the HTTP routes that expose them.

pub mod domain;
pub mod evidence;
pub mod repository;
pub mod router;
pub mod service;
pub mod templates;

pub use domain::{
    CaseFilter, CaseId, CaseRecord, CaseStatus, CaseSubmission, CaseSummaryView, CaseUpdate,
    ShareId,
};
pub use evidence::{EvidenceKind, EvidenceRecord, EvidenceUpload, EvidenceViolation};
pub use repository::{CaseRepository, EvidenceRepository, RepositoryError, TemplateRepository};
pub use router::{case_router, template_router};
pub use service::{CaseServiceError, HabitabilityCaseService};
pub use templates::{
    CaseTemplate, TemplateDraft, TemplateError, TemplateId, TemplateLibrary, TemplateScope,
};
