use crate::cli::ServeArgs;
use crate::infra::{seed_demo_data, AppState, InMemoryGuarantorRepository};
use crate::routes::with_guarantor_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use guarantor_intake::config::AppConfig;
use guarantor_intake::error::AppError;
use guarantor_intake::guarantors::{GuarantorService, RepositoryError};
use guarantor_intake::telemetry;
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

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let repository = Arc::new(InMemoryGuarantorRepository::default());
    let seeded = seed_demo_data(&repository)
        .map_err(|err: RepositoryError| AppError::Service(err.into()))?;
    info!(seeded, "loaded demo guarantor records into the in-memory store");

    let service = Arc::new(GuarantorService::new(
        repository,
        config.intake.submitted_by.clone(),
    ));

    let app = with_guarantor_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "guarantor intake service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
