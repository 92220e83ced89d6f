use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use guarantor_intake::guarantors::{guarantor_router, GuarantorRepository, GuarantorService};
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_guarantor_routes<R>(service: Arc<GuarantorService<R>>) -> axum::Router
where
    R: GuarantorRepository + 'static,
{
    guarantor_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{seed_demo_data, InMemoryGuarantorRepository};
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use axum_prometheus::PrometheusMetricLayer;
    use std::sync::atomic::AtomicBool;
    use tower::ServiceExt;

    fn build_app(ready: bool) -> axum::Router {
        let repository = Arc::new(InMemoryGuarantorRepository::default());
        seed_demo_data(&repository).expect("seed succeeds");
        let service = Arc::new(GuarantorService::new(repository, "LoanOfficer123"));

        // `pair()` installs a process-global recorder and panics if called
        // twice, so share one pair across all tests in this binary.
        static PROMETHEUS: std::sync::OnceLock<(
            PrometheusMetricLayer<'static>,
            axum_prometheus::metrics_exporter_prometheus::PrometheusHandle,
        )> = std::sync::OnceLock::new();
        let (prometheus_layer, prometheus_handle) =
            PROMETHEUS.get_or_init(PrometheusMetricLayer::pair).clone();
        let state = AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(prometheus_handle),
        };

        with_guarantor_routes(service)
            .layer(Extension(state))
            .layer(prometheus_layer)
    }

    async fn get(app: axum::Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri(uri)
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router dispatch");
        let status = response.status();
        let body = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("body");
        let payload = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
        (status, payload)
    }

    #[tokio::test]
    async fn healthcheck_reports_ok() {
        let (status, payload) = get(build_app(true), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["status"], "ok");
    }

    #[tokio::test]
    async fn readiness_follows_the_flag() {
        let (status, payload) = get(build_app(false), "/ready").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(payload["status"], "initializing");

        let (status, payload) = get(build_app(true), "/ready").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["status"], "ready");
    }

    #[tokio::test]
    async fn seeded_listing_is_served_under_the_api_prefix() {
        let (status, payload) = get(build_app(true), "/api/v1/guarantors").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["pagination"]["total"], 4);
        assert_eq!(payload["data"][0]["guarantor_name"], "Michael R. Davis");
    }

    #[tokio::test]
    async fn seeded_dashboard_queries_are_consistent() {
        let (status, payload) = get(build_app(true), "/api/v1/guarantors/stats").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["data"]["total"], 4);
        assert_eq!(payload["data"]["verified"], 2);
        assert_eq!(payload["data"]["pending_verification"], 1);
        assert_eq!(payload["data"]["rejected"], 1);
    }
}
