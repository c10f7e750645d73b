use crate::cli::ServeArgs;
use crate::infra::{
    AppState, InMemoryCaseRepository, InMemoryEvidenceRepository, InMemoryTemplateRepository,
    SnapshotFile,
};
use crate::routes::with_habitability_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use habitabilitat::config::{AppConfig, StorageConfig};
use habitabilitat::error::AppError;
use habitabilitat::telemetry;
use habitabilitat::workflows::habitability::cases::TemplateLibrary;
use habitabilitat::workflows::habitability::{HabitabilityCaseService, RULESET_VERSION};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(data_dir) = args.data_dir.take() {
        config.storage.data_dir = Some(data_dir);
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let (cases, evidence, templates) = open_stores(&config.storage)?;
    info!(
        cases = cases.len(),
        data_dir = ?config.storage.data_dir,
        "case stores opened"
    );

    let case_service = Arc::new(HabitabilityCaseService::new(
        Arc::new(cases),
        Arc::new(evidence),
    ));
    let template_library = Arc::new(TemplateLibrary::new(Arc::new(templates)));

    let app = with_habitability_routes(case_service, template_library)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        ruleset_version = RULESET_VERSION,
        "habitability pre-validation service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}

pub(crate) fn open_stores(
    storage: &StorageConfig,
) -> Result<
    (
        InMemoryCaseRepository,
        InMemoryEvidenceRepository,
        InMemoryTemplateRepository,
    ),
    AppError,
> {
    let (Some(cases), Some(evidence), Some(templates)) = (
        storage.cases_file(),
        storage.evidence_file(),
        storage.templates_file(),
    ) else {
        return Ok(Default::default());
    };

    if let Some(dir) = &storage.data_dir {
        std::fs::create_dir_all(dir)?;
    }

    let cases = SnapshotFile::new(cases);
    info!(path = %cases.path().display(), "loading case snapshot");
    Ok((
        InMemoryCaseRepository::with_snapshot(cases)?,
        InMemoryEvidenceRepository::with_snapshot(SnapshotFile::new(evidence))?,
        InMemoryTemplateRepository::with_snapshot(SnapshotFile::new(templates))?,
    ))
}
