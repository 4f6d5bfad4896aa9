//! Dashboard HTTP API
//!
//! HTTP layer for the dashboard, built with Axum.
//!
//! # Endpoints
//!
//! ## Page
//! - `GET /` - Dashboard page
//!
//! ## Chart
//! - `GET /api/v1/options` - Country list, year bounds and widget defaults
//! - `GET /api/v1/chart` - Chart for a selection given as query parameters
//! - `POST /api/v1/chart` - Chart for a selection given as JSON
//!
//! ## Health
//! - `GET /health/live` - Liveness probe
//! - `GET /health/ready` - Readiness probe
//! - `GET /health` - Full health status
//!
//! # Example
//!
//! ```rust,no_run
//! use gapminder_dash::api::{serve, AppState};
//! use gapminder_dash::config::Config;
//! use gapminder_dash::dataset::TidyTable;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!     let table = Arc::new(TidyTable::load(&config.data.path)?);
//!
//!     let state = AppState::from_config(table, &config);
//!     serve(state, &config.api).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod dto;
pub mod error;
pub mod routes;
pub mod state;

pub use crate::config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use state::AppState;

use axum::{
    http::{header, HeaderValue, Method},
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

/// Build the API router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/options", get(routes::options::get_options))
        .route(
            "/chart",
            get(routes::chart::get_chart).post(routes::chart::post_chart),
        );

    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/ready", get(routes::health::readiness))
        .route("/", get(routes::health::full_health));

    let cors = cors_layer(&state.api.cors_origins);
    let shared_state = Arc::new(state);

    Router::new()
        .route("/", get(routes::dashboard::index))
        .nest("/api/v1", api_routes)
        .nest("/health", health_routes)
        .fallback(routes::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(shared_state)
}

/// Permissive CORS unless specific origins are configured
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
}

/// Start the API server
pub async fn serve(state: AppState, config: &ApiConfig) -> Result<(), ApiError> {
    let router = build_router(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Dashboard listening on http://{}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("Dashboard shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::MissingPolicy;
    use crate::config::ChartConfig;
    use crate::dataset::TidyTable;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use tower::util::ServiceExt;

    const SAMPLE: &str = "country,1998,1999,2000,2001
USA,30k,31k,32k,33k
France,20k,,22k,23k
Japan,25k,26k,27k,28k";

    fn create_test_app() -> Router {
        let table = Arc::new(TidyTable::from_csv_str(SAMPLE).unwrap());
        build_router(AppState::new(table, ApiConfig::default()))
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    async fn post_json(app: Router, uri: &str, body: &str) -> (StatusCode, Vec<u8>) {
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("Content-Type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    #[tokio::test]
    async fn test_health_live() {
        let response = create_test_app()
            .oneshot(
                Request::builder()
                    .uri("/health/live")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health_full() {
        let (status, health) = get_json(create_test_app(), "/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(health["status"], "healthy");
        assert_eq!(health["records"], 12);
        assert_eq!(health["years"], serde_json::json!([1998, 2001]));
    }

    #[tokio::test]
    async fn test_options() {
        let (status, options) = get_json(create_test_app(), "/api/v1/options").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(options["countries"], serde_json::json!(["USA", "France", "Japan"]));
        assert_eq!(options["year_min"], 1998);
        assert_eq!(options["year_max"], 2001);
        assert_eq!(options["step"], 1);
        assert_eq!(options["marks"]["1998"], "1998");
        assert_eq!(options["default_countries"], serde_json::json!(["USA"]));
        assert_eq!(options["default_range"], serde_json::json!([1998, 2001]));
    }

    #[tokio::test]
    async fn test_options_drop_unknown_defaults() {
        let table = Arc::new(TidyTable::from_csv_str("country,2000\nChad,1").unwrap());
        let app = build_router(AppState::new(table, ApiConfig::default()));

        let (_, options) = get_json(app, "/api/v1/options").await;
        assert_eq!(options["default_countries"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_get_chart() {
        let (status, chart) = get_json(
            create_test_app(),
            "/api/v1/chart?countries=USA,Japan&start=1999&end=2000",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(chart["title"], "GDP per Capita for USA, Japan from 1999 to 2000");
        assert_eq!(chart["x_axis_label"], "Year");
        assert_eq!(chart["height"], 550);
        assert_eq!(chart["meta"]["series_count"], 2);
        assert_eq!(chart["meta"]["point_count"], 4);
        assert_eq!(chart["series"][0]["name"], "Japan");
        assert_eq!(
            chart["series"][1]["points"],
            serde_json::json!([
                {"year": 1999, "value": 31000.0},
                {"year": 2000, "value": 32000.0}
            ])
        );
    }

    #[tokio::test]
    async fn test_get_chart_defaults_to_full_span() {
        let (_, chart) = get_json(create_test_app(), "/api/v1/chart?countries=France").await;

        assert_eq!(chart["title"], "GDP per Capita for France from 1998 to 2001");
        assert_eq!(chart["meta"]["point_count"], 4);
        // Missing 1999 value plots as zero by default
        assert_eq!(chart["series"][0]["points"][1]["value"], 0.0);
    }

    #[tokio::test]
    async fn test_get_chart_without_countries_is_empty() {
        let (status, chart) = get_json(create_test_app(), "/api/v1/chart").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(chart["series"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_get_chart_rejects_bad_year() {
        let response = create_test_app()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/chart?countries=USA&start=soon")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_get_chart_on_empty_table_requires_years() {
        let app = build_router(AppState::new(
            Arc::new(TidyTable::default()),
            ApiConfig::default(),
        ));
        let (status, body) = get_json(app, "/api/v1/chart?countries=USA").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_post_chart() {
        let (status, body) = post_json(
            create_test_app(),
            "/api/v1/chart",
            r#"{"countries": ["Germany"], "year_range": [1800, 2100]}"#,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let chart: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(chart["series"], serde_json::json!([]));
        assert_eq!(chart["meta"]["series_count"], 0);
    }

    #[tokio::test]
    async fn test_post_chart_is_deterministic() {
        let request = r#"{"countries": ["Japan", "France", "USA"], "year_range": [1998, 2001]}"#;

        let (_, first) = post_json(create_test_app(), "/api/v1/chart", request).await;
        let (_, second) = post_json(create_test_app(), "/api/v1/chart", request).await;

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_post_chart_gap_policy() {
        let table = Arc::new(TidyTable::from_csv_str(SAMPLE).unwrap());
        let chart_config = ChartConfig {
            missing_values: MissingPolicy::Gap,
            ..Default::default()
        };
        let app = build_router(
            AppState::new(table, ApiConfig::default()).with_chart_config(chart_config),
        );

        let (_, body) = post_json(
            app,
            "/api/v1/chart",
            r#"{"countries": ["France"], "year_range": [1999, 1999]}"#,
        )
        .await;
        let chart: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(
            chart["series"][0]["points"],
            serde_json::json!([{"year": 1999, "value": null}])
        );
    }

    #[tokio::test]
    async fn test_post_chart_invalid_json() {
        let (status, _) = post_json(create_test_app(), "/api/v1/chart", "not json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_index_page() {
        let response = create_test_app()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let page = String::from_utf8(body.to_vec()).unwrap();
        assert!(page.contains("<h1>GDP Per Capita</h1>"));
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let (status, body) = get_json(create_test_app(), "/api/v1/metrics").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }
}
