//! Catalan habitability pre-validation.
//!
//! `evaluation` holds the versioned rule catalog and the evaluator that folds per-rule outcomes
//! into one verdict. It is pure: no I/O, no logging, no shared state. Everything else here
//! (intake, cases, import, report) prepares its input or consumes its output.

pub mod cases;
pub mod domain;
pub mod evaluation;
pub mod import;
pub mod intake;
pub mod report;

#[cfg(test)]
mod tests;

pub use cases::{
    case_router, template_router, CaseFilter, CaseId, CaseRecord, CaseServiceError, CaseStatus,
    CaseSubmission, CaseUpdate, HabitabilityCaseService, ShareId,
};
pub use domain::{EvidenceField, PropertyInput, PropertyType, UseCase};
pub use evaluation::{
    catalog, evaluate_property, evaluate_property_at, EvaluationEngine, EvaluationResult, Rule,
    RuleResult, RuleSeverity, RuleSummary, RULESET_VERSION,
};
pub use import::{BatchEvaluation, PropertyCsvImporter, PropertyImportError};
pub use intake::{IntakeGuard, IntakeViolation};
pub use report::CaseReport;
