mod views;

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use stockdash_core::AppConfig;
use stockdash_store::SnapshotStore;

use crate::middleware::{request_id, RequestId};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<SnapshotStore>,
    pub config: Arc<AppConfig>,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
struct HealthData {
    status: &'static str,
    /// Timestamp of the snapshot currently being served, if any. Staleness
    /// is not a failure: the dashboard serves the last good snapshot until
    /// a refresh succeeds.
    snapshot_computed_at: Option<DateTime<Utc>>,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "unavailable" => StatusCode::SERVICE_UNAVAILABLE,
            "bad_request" => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static("x-request-id"),
        ])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/snapshot", get(views::get_snapshot))
        .route("/api/v1/tickers/top", get(views::list_top_tickers))
        .route("/api/v1/tickers/latest", get(views::list_latest_by_ticker))
        .route("/api/v1/comments/top", get(views::list_top_comments))
        .route("/api/v1/watchlist", get(views::list_watchlist))
        .route("/api/v1/refresh", post(views::trigger_refresh))
        .layer(
            ServiceBuilder::new()
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let meta = ResponseMeta::new(req_id.0);

    match state.store.current() {
        Some(snapshot) => (
            StatusCode::OK,
            Json(ApiResponse {
                data: HealthData {
                    status: "ok",
                    snapshot_computed_at: Some(snapshot.computed_at),
                },
                meta,
            }),
        ),
        None => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ApiResponse {
                data: HealthData {
                    status: "degraded",
                    snapshot_computed_at: None,
                },
                meta,
            }),
        ),
    }
}

#[cfg(test)]
mod tests {
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use chrono::TimeZone;
    use stockdash_core::{
        AggregateSnapshot, Comment, Environment, SummaryStats, TickerAggregate, WatchlistEntry,
    };
    use tower::ServiceExt;

    use super::*;

    fn test_config(dir: &tempfile::TempDir) -> AppConfig {
        AppConfig {
            env: Environment::Test,
            bind_addr: "127.0.0.1:0".parse().expect("addr"),
            log_level: "info".to_string(),
            comments_path: dir.path().join("comments.json"),
            tickers_path: dir.path().join("tickers.json"),
            snapshot_path: None,
            recompute_cron: "0 */10 * * * *".to_string(),
            karma_threshold: 500,
            min_distinct_tickers: 2,
            top_tickers_limit: 10,
            top_comments_limit: 20,
            latest_tickers_limit: 5,
            latest_comments_per_ticker: 5,
        }
    }

    fn seeded_snapshot() -> AggregateSnapshot {
        let computed_at = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        AggregateSnapshot {
            top_tickers: vec![TickerAggregate {
                ticker: "AAPL".to_string(),
                mention_count: 2,
                top_comment_ids: vec!["c1".to_string()],
            }],
            top_comments: vec![Comment {
                id: "c1".to_string(),
                body: "$AAPL".to_string(),
                author: "x".to_string(),
                author_karma: 1000,
                score: 50,
                created_at: computed_at,
                thread_id: "t3_a".to_string(),
            }],
            watchlist: vec![WatchlistEntry {
                author: "x".to_string(),
                karma: 1000,
                distinct_tickers: vec!["AAPL".to_string(), "TSLA".to_string()],
            }],
            summary: SummaryStats {
                total_comments: 1,
                ..SummaryStats::default()
            },
            ..AggregateSnapshot::empty(computed_at)
        }
    }

    fn app_with(store: SnapshotStore, dir: &tempfile::TempDir) -> Router {
        build_app(AppState {
            store: Arc::new(store),
            config: Arc::new(test_config(dir)),
        })
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        serde_json::from_slice(&bytes).expect("json parse")
    }

    #[tokio::test]
    async fn snapshot_route_serves_the_published_snapshot() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = SnapshotStore::new();
        store.publish(seeded_snapshot());
        let app = app_with(store, &dir);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/snapshot")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["data"]["top_tickers"][0]["ticker"], "AAPL");
        assert!(json["meta"]["request_id"].is_string());
    }

    #[tokio::test]
    async fn snapshot_route_is_unavailable_before_first_publish() {
        let dir = tempfile::tempdir().expect("tempdir");
        let app = app_with(SnapshotStore::new(), &dir);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/snapshot")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "unavailable");
    }

    #[tokio::test]
    async fn watchlist_route_serves_only_that_view() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = SnapshotStore::new();
        store.publish(seeded_snapshot());
        let app = app_with(store, &dir);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/watchlist")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["data"][0]["author"], "x");
        assert_eq!(json["data"][0]["distinct_tickers"][0], "AAPL");
    }

    #[tokio::test]
    async fn health_reports_degraded_without_a_snapshot() {
        let dir = tempfile::tempdir().expect("tempdir");
        let app = app_with(SnapshotStore::new(), &dir);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/health")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let json = body_json(response).await;
        assert_eq!(json["data"]["status"], "degraded");
    }

    #[tokio::test]
    async fn refresh_route_runs_a_cycle_and_publishes() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("tickers.json"), r#"["AAPL"]"#).expect("tickers");
        std::fs::write(
            dir.path().join("comments.json"),
            r#"[{"id":"c1","body":"$AAPL","author":"x","score":5,
                 "created_utc":"2025-06-01T09:30:00","author_total_karma":100}]"#,
        )
        .expect("comments");

        let store = Arc::new(SnapshotStore::new());
        let app = build_app(AppState {
            store: Arc::clone(&store),
            config: Arc::new(test_config(&dir)),
        });

        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/api/v1/refresh")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["data"]["status"], "ok");
        assert!(store.current().is_some());
    }

    #[tokio::test]
    async fn failed_refresh_keeps_previous_snapshot_and_reports_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        // No input files exist, so the cycle must fail structurally.
        let store = Arc::new(SnapshotStore::new());
        store.publish(seeded_snapshot());
        let app = build_app(AppState {
            store: Arc::clone(&store),
            config: Arc::new(test_config(&dir)),
        });

        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/api/v1/refresh")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "refresh_failed");
        let current = store.current().expect("previous snapshot retained");
        assert_eq!(current.summary.total_comments, 1);
    }

    #[tokio::test]
    async fn request_id_header_is_echoed() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = SnapshotStore::new();
        store.publish(seeded_snapshot());
        let app = app_with(store, &dir);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/health")
                    .header("x-request-id", "req-42")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(
            response.headers().get("x-request-id").map(|v| v.to_str().unwrap()),
            Some("req-42")
        );
    }
}
