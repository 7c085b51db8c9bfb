use std::sync::Arc;

use axum::{extract::State, Extension, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;

use stockdash_core::{AggregateSnapshot, Comment, TickerAggregate, TickerLatest, WatchlistEntry};

use crate::middleware::RequestId;
use crate::refresh::run_refresh_cycle;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Serialize)]
pub(super) struct RefreshData {
    pub status: &'static str,
    pub computed_at: Option<DateTime<Utc>>,
}

/// The current snapshot, or an `unavailable` error before the first
/// successful publish. Every view handler goes through this so all of them
/// read the same atomically-swapped handle.
fn current_snapshot(
    state: &AppState,
    request_id: &str,
) -> Result<Arc<AggregateSnapshot>, ApiError> {
    state.store.current().ok_or_else(|| {
        ApiError::new(
            request_id.to_string(),
            "unavailable",
            "no snapshot has been published yet",
        )
    })
}

pub(super) async fn get_snapshot(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<AggregateSnapshot>>, ApiError> {
    let snapshot = current_snapshot(&state, &req_id.0)?;
    Ok(Json(ApiResponse {
        data: (*snapshot).clone(),
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn list_top_tickers(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Vec<TickerAggregate>>>, ApiError> {
    let snapshot = current_snapshot(&state, &req_id.0)?;
    Ok(Json(ApiResponse {
        data: snapshot.top_tickers.clone(),
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn list_top_comments(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Vec<Comment>>>, ApiError> {
    let snapshot = current_snapshot(&state, &req_id.0)?;
    Ok(Json(ApiResponse {
        data: snapshot.top_comments.clone(),
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn list_watchlist(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Vec<WatchlistEntry>>>, ApiError> {
    let snapshot = current_snapshot(&state, &req_id.0)?;
    Ok(Json(ApiResponse {
        data: snapshot.watchlist.clone(),
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn list_latest_by_ticker(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Vec<TickerLatest>>>, ApiError> {
    let snapshot = current_snapshot(&state, &req_id.0)?;
    Ok(Json(ApiResponse {
        data: snapshot.latest_by_ticker.clone(),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// Run a refresh cycle immediately. On failure the previous snapshot stays
/// current and the error is surfaced; the dashboard keeps serving stale
/// data rather than an error page.
pub(super) async fn trigger_refresh(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<RefreshData>>, ApiError> {
    let config = Arc::clone(&state.config);
    let store = Arc::clone(&state.store);
    let outcome = tokio::task::spawn_blocking(move || run_refresh_cycle(&config, &store)).await;

    match outcome {
        Ok(Ok(())) => Ok(Json(ApiResponse {
            data: RefreshData {
                status: "ok",
                computed_at: state.store.current().map(|s| s.computed_at),
            },
            meta: ResponseMeta::new(req_id.0),
        })),
        Ok(Err(error)) => {
            tracing::error!(%error, "manual refresh failed; previous snapshot retained");
            Err(ApiError::new(req_id.0, "refresh_failed", error.to_string()))
        }
        Err(join_error) => {
            tracing::error!(%join_error, "refresh task panicked");
            Err(ApiError::new(
                req_id.0,
                "internal_error",
                "refresh task failed to run",
            ))
        }
    }
}
