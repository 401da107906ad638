//! API Router configuration

use super::handlers;
use super::state::AppState;
use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

/// Create the exporter router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/metrics", get(handlers::scrape_metrics))
        .route("/health", get(handlers::health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::MetricsRegistry;
    use crate::sample::{LinkState, SampleStore, SensorSample};
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn test_router(store: Arc<SampleStore>) -> Router {
        let metrics = Arc::new(MetricsRegistry::new(Arc::clone(&store)).unwrap());
        create_router(AppState::new(metrics, store))
    }

    async fn get_body(app: Router, uri: &str) -> (StatusCode, Option<String>, String) {
        let resp = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let content_type = resp
            .headers()
            .get(header::CONTENT_TYPE)
            .map(|v| v.to_str().unwrap().to_string());
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, content_type, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn metrics_before_first_read_are_zero() {
        let (status, content_type, body) =
            get_body(test_router(Arc::new(SampleStore::new())), "/metrics").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type.as_deref(), Some(crate::metrics::TEXT_CONTENT_TYPE));
        assert!(body.contains("udco2s_CO2 0"));
        assert!(body.contains("udco2s_HUM 0"));
        assert!(body.contains("udco2s_TEMP 0"));
        assert!(body.contains("udco2s_last 0"));
    }

    #[tokio::test]
    async fn metrics_reflect_committed_sample() {
        let store = Arc::new(SampleStore::new());
        store.commit(SensorSample {
            co2_ppm: 512,
            humidity_pct: 45.3,
            temperature_c: 21.7,
            last_success_epoch: 1_700_000_000,
        });
        let (_, _, body) = get_body(test_router(store), "/metrics").await;

        assert!(body.contains("udco2s_CO2 512"));
        assert!(body.contains("udco2s_HUM 45.3"));
        assert!(body.contains("udco2s_TEMP 21.7"));
        assert!(body.contains("udco2s_last 1700000000"));
    }

    #[tokio::test]
    async fn health_reports_link_state() {
        let store = Arc::new(SampleStore::new());
        store.set_link_state(LinkState::Disconnected);
        let (status, _, body) = get_body(test_router(store), "/health").await;

        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["status"], "unhealthy");
        assert_eq!(json["link_state"], "disconnected");
        assert_eq!(json["last_success_epoch"], 0);
    }

    #[tokio::test]
    async fn unknown_path_is_not_found() {
        let (status, _, _) =
            get_body(test_router(Arc::new(SampleStore::new())), "/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
