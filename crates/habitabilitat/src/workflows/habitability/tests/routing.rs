use super::common::*;
use axum::body::Body;
use axum::extract::State;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use crate::workflows::habitability::cases::domain::CaseSubmission;
use crate::workflows::habitability::cases::router::{self, case_router, template_router};
use crate::workflows::habitability::cases::service::HabitabilityCaseService;
use crate::workflows::habitability::evaluation::RULESET_VERSION;

fn case_app() -> Router {
    let (service, _, _) = build_service();
    case_router(Arc::new(service))
}

fn template_app() -> Router {
    let (library, _) = build_library();
    template_router(Arc::new(library))
}

fn json_request(method: &str, uri: &str, payload: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(payload).unwrap()))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

fn submission_payload() -> Value {
    json!({
        "propertyInput": compliant_flat(),
        "userId": "user-1",
        "evaluationResult": { "overallStatus": "fail" }
    })
}

async fn create_case(app: &Router) -> Value {
    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/v1/cases", &submission_payload()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    read_json_body(response).await
}

#[tokio::test]
async fn submit_handler_returns_conflict_on_duplicate() {
    let service = Arc::new(HabitabilityCaseService::with_parts(
        guard(),
        engine(),
        Arc::new(ConflictRepository),
        Arc::new(MemoryEvidenceRepository::default()),
    ));

    let response = router::submit_handler::<ConflictRepository, MemoryEvidenceRepository>(
        State(service),
        axum::Json(CaseSubmission::anonymous(compliant_flat())),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = read_json_body(response).await;
    assert_eq!(body["error"], "case already exists");
}

#[tokio::test]
async fn submit_handler_returns_internal_error_on_repository_failure() {
    let service = Arc::new(HabitabilityCaseService::with_parts(
        guard(),
        engine(),
        Arc::new(UnavailableRepository),
        Arc::new(MemoryEvidenceRepository::default()),
    ));

    let response = router::submit_handler::<UnavailableRepository, MemoryEvidenceRepository>(
        State(service),
        axum::Json(CaseSubmission::anonymous(compliant_flat())),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn evaluate_route_returns_result_without_storing() {
    let (service, repository, _) = build_service();
    let app = case_router(Arc::new(service));

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/v1/evaluate",
            &serde_json::to_value(bare_unit()).unwrap(),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["overallStatus"], "fail");
    assert_eq!(body["rulesetVersion"], RULESET_VERSION);
    assert!(repository.records.lock().unwrap().is_empty());
}

#[tokio::test]
async fn evaluate_route_rejects_out_of_range_input() {
    let mut input = compliant_flat();
    input.num_floors = Some(0);

    let response = case_app()
        .oneshot(json_request(
            "POST",
            "/api/v1/evaluate",
            &serde_json::to_value(input).unwrap(),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = read_json_body(response).await;
    assert!(body["error"].as_str().unwrap().contains("numFloors"));
}

#[tokio::test]
async fn ruleset_route_lists_the_catalog() {
    let response = case_app()
        .oneshot(get_request("/api/v1/ruleset"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["rulesetVersion"], RULESET_VERSION);
    let rules = body["rules"].as_array().unwrap();
    assert_eq!(rules.len(), 18);
    assert_eq!(rules[0]["id"], "min-useful-area");
}

#[tokio::test]
async fn submitted_case_ignores_client_evaluation() {
    let app = case_app();
    let created = create_case(&app).await;

    assert_eq!(created["status"], "new");
    assert_eq!(created["evaluationResult"]["overallStatus"], "pass");
    assert_eq!(created["evaluationResult"]["rulesetVersion"], RULESET_VERSION);

    let id = created["id"].as_str().unwrap();
    let response = app
        .clone()
        .oneshot(get_request(&format!("/api/v1/cases/{id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json_body(response).await, created);
}

#[tokio::test]
async fn unknown_case_returns_not_found() {
    let response = case_app()
        .oneshot(get_request("/api/v1/cases/does-not-exist"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = read_json_body(response).await;
    assert_eq!(body["error"], "case not found");
}

#[tokio::test]
async fn patch_route_moves_case_through_pipeline() {
    let app = case_app();
    let created = create_case(&app).await;
    let id = created["id"].as_str().unwrap();

    let response = app
        .clone()
        .oneshot(json_request(
            "PATCH",
            &format!("/api/v1/cases/{id}"),
            &json!({
                "status": "scheduled",
                "scheduledDate": "2025-05-10T08:00:00Z",
                "actor": "user-1"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["status"], "scheduled");
    assert_eq!(body["statusUpdatedBy"], "user-1");
    assert_eq!(body["scheduledDate"], "2025-05-10T08:00:00Z");

    let listed = app
        .oneshot(get_request("/api/v1/cases?status=scheduled&userId=user-1"))
        .await
        .unwrap();
    assert_eq!(listed.status(), StatusCode::OK);
    let rows = read_json_body(listed).await;
    assert_eq!(rows.as_array().unwrap().len(), 1);
    assert_eq!(rows[0]["municipality"], "Barcelona");
    assert_eq!(rows[0]["overallStatus"], "pass");
}

#[tokio::test]
async fn patch_with_unknown_status_is_rejected() {
    let app = case_app();
    let created = create_case(&app).await;
    let id = created["id"].as_str().unwrap();

    let response = app
        .oneshot(json_request(
            "PATCH",
            &format!("/api/v1/cases/{id}"),
            &json!({ "status": "archived" }),
        ))
        .await
        .unwrap();

    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn reevaluate_route_appends_history() {
    let app = case_app();
    let created = create_case(&app).await;
    let id = created["id"].as_str().unwrap();

    let response = app
        .oneshot(
            Request::post(format!("/api/v1/cases/{id}/reevaluate"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["evaluationHistory"].as_array().unwrap().len(), 1);
    assert_eq!(body["evaluationResult"]["overallStatus"], "pass");
}

#[tokio::test]
async fn report_route_returns_text_attachment() {
    let app = case_app();
    let created = create_case(&app).await;
    let id = created["id"].as_str().unwrap();

    let response = app
        .oneshot(get_request(&format!("/api/v1/cases/{id}/report")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/plain; charset=utf-8"
    );
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        format!("attachment; filename=\"cedula-report-{id}.txt\"").as_str()
    );
    let text = read_text_body(response).await;
    assert!(text.starts_with("Informe de Pre-validació"));
    assert!(text.contains("APROVAT"));
}

#[tokio::test]
async fn evidence_routes_attach_and_list() {
    let app = case_app();
    let created = create_case(&app).await;
    let id = created["id"].as_str().unwrap();
    let uri = format!("/api/v1/cases/{id}/evidence");

    let attached = app
        .clone()
        .oneshot(json_request(
            "POST",
            &uri,
            &json!({
                "originalFilename": "certificat energètic.pdf",
                "mimeType": "application/pdf",
                "size": 48213,
                "uploadedBy": "user-1"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(attached.status(), StatusCode::CREATED);
    let record = read_json_body(attached).await;
    assert_eq!(record["type"], "document");
    assert_eq!(record["caseId"], id);

    let oversized = app
        .clone()
        .oneshot(json_request(
            "POST",
            &uri,
            &json!({
                "originalFilename": "plànol.png",
                "mimeType": "image/png",
                "size": 20 * 1024 * 1024,
                "uploadedBy": "user-1"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(oversized.status(), StatusCode::BAD_REQUEST);

    let listed = app.oneshot(get_request(&uri)).await.unwrap();
    assert_eq!(listed.status(), StatusCode::OK);
    let records = read_json_body(listed).await;
    assert_eq!(records.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn share_route_validates_format() {
    let app = case_app();
    let created = create_case(&app).await;
    let share_id = created["shareId"].as_str().unwrap();

    let found = app
        .clone()
        .oneshot(get_request(&format!("/api/v1/share/{share_id}")))
        .await
        .unwrap();
    assert_eq!(found.status(), StatusCode::OK);
    assert_eq!(read_json_body(found).await["id"], created["id"]);

    let malformed = app
        .clone()
        .oneshot(get_request("/api/v1/share/xyz"))
        .await
        .unwrap();
    assert_eq!(malformed.status(), StatusCode::BAD_REQUEST);

    let unknown = app
        .oneshot(get_request("/api/v1/share/ffffffffffffffff"))
        .await
        .unwrap();
    assert_eq!(unknown.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn batch_route_evaluates_csv_rows() {
    let csv = "municipality,region,propertyType,useCase,usefulArea,ceilingHeight,hasKitchen,hasBathroom,hasNaturalLight,hasVentilation,hasHeating\n\
Tarragona,Tarragonès,flat,segunda-ocupacion,25,2.6,true,true,true,true,true\n\
Tarragona,Tarragonès,flat,segunda-ocupacion,oops,2.6,true,true,true,true,true\n";

    let response = case_app()
        .oneshot(json_request(
            "POST",
            "/api/v1/properties/batch-evaluate",
            &json!({ "csv": csv }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["evaluated"], 1);
    assert_eq!(body["rejected"], 1);
    assert_eq!(body["rows"][0]["outcome"], "evaluated");
    assert_eq!(body["rows"][0]["overallStatus"], "fail");
    assert_eq!(body["rows"][1]["outcome"], "rejected");
    assert!(body["rows"][1]["error"].is_string());
}

#[tokio::test]
async fn template_routes_create_list_and_guard_delete() {
    let app = template_app();

    let created = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/templates",
            &json!({
                "name": "Pis Eixample",
                "propertyInput": compliant_flat(),
                "createdBy": "user-1",
                "isPublic": true
            }),
        ))
        .await
        .unwrap();
    assert_eq!(created.status(), StatusCode::CREATED);
    let template = read_json_body(created).await;
    let id = template["id"].as_str().unwrap();

    let public = app
        .clone()
        .oneshot(get_request("/api/v1/templates?scope=public"))
        .await
        .unwrap();
    assert_eq!(read_json_body(public).await.as_array().unwrap().len(), 1);

    let anonymous = app
        .clone()
        .oneshot(get_request("/api/v1/templates"))
        .await
        .unwrap();
    assert_eq!(read_json_body(anonymous).await, json!([]));

    let forbidden = app
        .clone()
        .oneshot(
            Request::delete(format!("/api/v1/templates/{id}?userId=user-2"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);

    let deleted = app
        .clone()
        .oneshot(
            Request::delete(format!("/api/v1/templates/{id}?userId=user-1"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);

    let gone = app
        .oneshot(get_request(&format!("/api/v1/templates/{id}")))
        .await
        .unwrap();
    assert_eq!(gone.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn template_with_blank_name_is_bad_request() {
    let response = template_app()
        .oneshot(json_request(
            "POST",
            "/api/v1/templates",
            &json!({
                "name": "",
                "propertyInput": compliant_flat(),
                "createdBy": "user-1"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
