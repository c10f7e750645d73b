use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::super::domain::PropertyInput;
use super::super::evaluation::RuleSummary;
use super::super::report::CaseReport;
use super::domain::{CaseFilter, CaseId, CaseSubmission, CaseSummaryView, CaseUpdate};
use super::evidence::EvidenceUpload;
use super::repository::{CaseRepository, EvidenceRepository, RepositoryError, TemplateRepository};
use super::service::{CaseServiceError, HabitabilityCaseService};
use super::templates::{TemplateDraft, TemplateError, TemplateId, TemplateLibrary, TemplateScope};

/// Router builder exposing evaluation, case tracking, evidence, and report endpoints.
pub fn case_router<R, E>(service: Arc<HabitabilityCaseService<R, E>>) -> Router
where
    R: CaseRepository + 'static,
    E: EvidenceRepository + 'static,
{
    Router::new()
        .route("/api/v1/evaluate", post(evaluate_handler::<R, E>))
        .route("/api/v1/ruleset", get(ruleset_handler::<R, E>))
        .route(
            "/api/v1/cases",
            post(submit_handler::<R, E>).get(list_handler::<R, E>),
        )
        .route(
            "/api/v1/cases/:case_id",
            get(case_handler::<R, E>).patch(update_handler::<R, E>),
        )
        .route(
            "/api/v1/cases/:case_id/reevaluate",
            post(reevaluate_handler::<R, E>),
        )
        .route("/api/v1/cases/:case_id/report", get(report_handler::<R, E>))
        .route(
            "/api/v1/cases/:case_id/evidence",
            get(evidence_list_handler::<R, E>).post(evidence_attach_handler::<R, E>),
        )
        .route("/api/v1/share/:share_id", get(shared_case_handler::<R, E>))
        .route(
            "/api/v1/properties/batch-evaluate",
            post(batch_evaluate_handler::<R, E>),
        )
        .with_state(service)
}

/// Router builder for the template library.
pub fn template_router<T>(library: Arc<TemplateLibrary<T>>) -> Router
where
    T: TemplateRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/templates",
            get(template_list_handler::<T>).post(template_create_handler::<T>),
        )
        .route(
            "/api/v1/templates/:template_id",
            get(template_handler::<T>).delete(template_delete_handler::<T>),
        )
        .with_state(library)
}

type CaseState<R, E> = State<Arc<HabitabilityCaseService<R, E>>>;

pub(crate) async fn evaluate_handler<R, E>(
    State(service): CaseState<R, E>,
    Json(input): Json<PropertyInput>,
) -> Response
where
    R: CaseRepository + 'static,
    E: EvidenceRepository + 'static,
{
    match service.preview(input) {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(error) => case_error_response(error),
    }
}

pub(crate) async fn ruleset_handler<R, E>(State(service): CaseState<R, E>) -> Response
where
    R: CaseRepository + 'static,
    E: EvidenceRepository + 'static,
{
    let engine = service.engine();
    let rules: Vec<RuleSummary> = engine.rules().iter().map(|rule| rule.summary()).collect();
    let payload = json!({
        "rulesetVersion": engine.ruleset_version(),
        "rules": rules,
    });
    (StatusCode::OK, Json(payload)).into_response()
}

pub(crate) async fn submit_handler<R, E>(
    State(service): CaseState<R, E>,
    Json(submission): Json<CaseSubmission>,
) -> Response
where
    R: CaseRepository + 'static,
    E: EvidenceRepository + 'static,
{
    match service.submit(submission) {
        Ok(record) => (StatusCode::CREATED, Json(record)).into_response(),
        Err(error) => case_error_response(error),
    }
}

pub(crate) async fn list_handler<R, E>(
    State(service): CaseState<R, E>,
    Query(filter): Query<CaseFilter>,
) -> Response
where
    R: CaseRepository + 'static,
    E: EvidenceRepository + 'static,
{
    match service.list(&filter) {
        Ok(records) => {
            let views: Vec<CaseSummaryView> =
                records.iter().map(|record| record.summary_view()).collect();
            (StatusCode::OK, Json(views)).into_response()
        }
        Err(error) => case_error_response(error),
    }
}

pub(crate) async fn case_handler<R, E>(
    State(service): CaseState<R, E>,
    Path(case_id): Path<String>,
) -> Response
where
    R: CaseRepository + 'static,
    E: EvidenceRepository + 'static,
{
    match service.get(&CaseId(case_id)) {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(error) => case_error_response(error),
    }
}

pub(crate) async fn update_handler<R, E>(
    State(service): CaseState<R, E>,
    Path(case_id): Path<String>,
    Json(update): Json<CaseUpdate>,
) -> Response
where
    R: CaseRepository + 'static,
    E: EvidenceRepository + 'static,
{
    match service.update(&CaseId(case_id), update) {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(error) => case_error_response(error),
    }
}

pub(crate) async fn reevaluate_handler<R, E>(
    State(service): CaseState<R, E>,
    Path(case_id): Path<String>,
) -> Response
where
    R: CaseRepository + 'static,
    E: EvidenceRepository + 'static,
{
    match service.reevaluate(&CaseId(case_id)) {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(error) => case_error_response(error),
    }
}

pub(crate) async fn report_handler<R, E>(
    State(service): CaseState<R, E>,
    Path(case_id): Path<String>,
) -> Response
where
    R: CaseRepository + 'static,
    E: EvidenceRepository + 'static,
{
    match service.get(&CaseId(case_id)) {
        Ok(record) => {
            let report = CaseReport::from_record(&record);
            let headers = [
                (
                    header::CONTENT_TYPE,
                    "text/plain; charset=utf-8".to_string(),
                ),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", report.filename()),
                ),
            ];
            (StatusCode::OK, headers, report.render_text()).into_response()
        }
        Err(error) => case_error_response(error),
    }
}

pub(crate) async fn evidence_list_handler<R, E>(
    State(service): CaseState<R, E>,
    Path(case_id): Path<String>,
) -> Response
where
    R: CaseRepository + 'static,
    E: EvidenceRepository + 'static,
{
    match service.evidence_for(&CaseId(case_id)) {
        Ok(records) => (StatusCode::OK, Json(records)).into_response(),
        Err(error) => case_error_response(error),
    }
}

pub(crate) async fn evidence_attach_handler<R, E>(
    State(service): CaseState<R, E>,
    Path(case_id): Path<String>,
    Json(upload): Json<EvidenceUpload>,
) -> Response
where
    R: CaseRepository + 'static,
    E: EvidenceRepository + 'static,
{
    match service.attach_evidence(&CaseId(case_id), upload) {
        Ok(record) => (StatusCode::CREATED, Json(record)).into_response(),
        Err(error) => case_error_response(error),
    }
}

pub(crate) async fn shared_case_handler<R, E>(
    State(service): CaseState<R, E>,
    Path(share_id): Path<String>,
) -> Response
where
    R: CaseRepository + 'static,
    E: EvidenceRepository + 'static,
{
    match service.get_shared(&share_id) {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(error) => case_error_response(error),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct BatchRequest {
    csv: String,
}

pub(crate) async fn batch_evaluate_handler<R, E>(
    State(service): CaseState<R, E>,
    Json(request): Json<BatchRequest>,
) -> Response
where
    R: CaseRepository + 'static,
    E: EvidenceRepository + 'static,
{
    match service.batch_evaluate(request.csv.as_bytes()) {
        Ok(batch) => (StatusCode::OK, Json(batch)).into_response(),
        Err(error) => case_error_response(error),
    }
}

fn case_error_response(error: CaseServiceError) -> Response {
    let status = match &error {
        CaseServiceError::Intake(_) => StatusCode::UNPROCESSABLE_ENTITY,
        CaseServiceError::Evidence(_)
        | CaseServiceError::InvalidShareId(_)
        | CaseServiceError::Import(_) => StatusCode::BAD_REQUEST,
        CaseServiceError::Repository(error) => repository_status(error),
    };
    let message = match &error {
        CaseServiceError::Repository(RepositoryError::NotFound) => "case not found".to_string(),
        CaseServiceError::Repository(RepositoryError::Conflict) => {
            "case already exists".to_string()
        }
        other => other.to_string(),
    };
    error_body(status, message)
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TemplateQuery {
    #[serde(default)]
    scope: Option<String>,
    #[serde(default)]
    user_id: Option<String>,
    #[serde(default)]
    team_id: Option<String>,
}

impl TemplateQuery {
    /// `None` when the requested scope needs an identity the caller did not give.
    fn scope(&self) -> Option<TemplateScope> {
        match self.scope.as_deref() {
            Some("public") => Some(TemplateScope::Public),
            Some("team") => self.team_id.clone().map(TemplateScope::Team),
            _ => self.user_id.clone().map(TemplateScope::User),
        }
    }
}

pub(crate) async fn template_list_handler<T>(
    State(library): State<Arc<TemplateLibrary<T>>>,
    Query(query): Query<TemplateQuery>,
) -> Response
where
    T: TemplateRepository + 'static,
{
    let Some(scope) = query.scope() else {
        return (StatusCode::OK, Json(json!([]))).into_response();
    };

    match library.list(&scope) {
        Ok(templates) => (StatusCode::OK, Json(templates)).into_response(),
        Err(error) => template_error_response(error),
    }
}

pub(crate) async fn template_create_handler<T>(
    State(library): State<Arc<TemplateLibrary<T>>>,
    Json(draft): Json<TemplateDraft>,
) -> Response
where
    T: TemplateRepository + 'static,
{
    match library.create(draft) {
        Ok(template) => (StatusCode::CREATED, Json(template)).into_response(),
        Err(error) => template_error_response(error),
    }
}

pub(crate) async fn template_handler<T>(
    State(library): State<Arc<TemplateLibrary<T>>>,
    Path(template_id): Path<String>,
) -> Response
where
    T: TemplateRepository + 'static,
{
    match library.get(&TemplateId(template_id)) {
        Ok(template) => (StatusCode::OK, Json(template)).into_response(),
        Err(error) => template_error_response(error),
    }
}

pub(crate) async fn template_delete_handler<T>(
    State(library): State<Arc<TemplateLibrary<T>>>,
    Path(template_id): Path<String>,
    Query(query): Query<TemplateQuery>,
) -> Response
where
    T: TemplateRepository + 'static,
{
    let Some(actor) = query.user_id else {
        return template_error_response(TemplateError::Forbidden);
    };

    match library.delete(&TemplateId(template_id), &actor) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => template_error_response(error),
    }
}

fn template_error_response(error: TemplateError) -> Response {
    let status = match &error {
        TemplateError::InvalidName | TemplateError::MissingCreator => StatusCode::BAD_REQUEST,
        TemplateError::Intake(_) => StatusCode::UNPROCESSABLE_ENTITY,
        TemplateError::Forbidden => StatusCode::FORBIDDEN,
        TemplateError::Repository(error) => repository_status(error),
    };
    let message = match &error {
        TemplateError::Repository(RepositoryError::NotFound) => "template not found".to_string(),
        other => other.to_string(),
    };
    error_body(status, message)
}

fn repository_status(error: &RepositoryError) -> StatusCode {
    match error {
        RepositoryError::NotFound => StatusCode::NOT_FOUND,
        RepositoryError::Conflict => StatusCode::CONFLICT,
        RepositoryError::Unavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_body(status: StatusCode, message: String) -> Response {
    let payload = json!({
        "error": message,
    });
    (status, Json(payload)).into_response()
}
