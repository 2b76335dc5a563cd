use crate::db;
use crate::errors::Error;
use crate::metrics::{LIST_REQUESTS_TOTAL, READINGS_INGESTED_TOTAL, REQUESTS_REJECTED_TOTAL};
use crate::model::{IngestResponse, ReadingPayload, ReadingView};
use crate::timestamp;
use crate::validate::validate;
use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use sqlx::PgPool;
use tracing::{error, warn};

const DEFAULT_LIST_LIMIT: i64 = 50;
const MAX_LIST_LIMIT: i64 = 1000;

#[derive(Debug, Clone)]
struct AppState {
    pool: PgPool,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    limit: Option<i64>,
}

pub fn create_router(pool: PgPool) -> Router {
    let state = AppState { pool };

    Router::new()
        .route("/health", get(health))
        .route("/api/temperatura", post(ingest))
        .route("/api/list", get(list))
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({"status": "ok"}))
}

/// Ingestion endpoint. Validates the payload, normalizes the optional
/// timestamp to UTC and appends exactly one row; nothing is written when
/// validation or parsing fails.
async fn ingest(
    State(state): State<AppState>,
    payload: Result<Json<ReadingPayload>, JsonRejection>,
) -> Result<Json<IngestResponse>, ApiError> {
    let Json(payload) = payload.map_err(|e| Error::Validation(e.body_text()))?;
    validate(&payload)?;

    let measured_at = match payload.timestamp.as_deref() {
        Some(raw) => Some(timestamp::normalize(raw)?),
        None => None,
    };

    let row = db::insert_reading(
        &state.pool,
        &payload.device_id,
        payload.temperature_c,
        measured_at,
    )
    .await?;
    READINGS_INGESTED_TOTAL.inc();

    Ok(Json(IngestResponse {
        status: "ok",
        id: row.id,
        created_at: row.created_at,
        measured_at: row.measured_at,
    }))
}

/// Diagnostic listing: the most recent readings, newest first.
async fn list(
    State(state): State<AppState>,
    params: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<Vec<ReadingView>>, ApiError> {
    let Query(params) = params.map_err(|e| Error::Validation(e.body_text()))?;
    LIST_REQUESTS_TOTAL.inc();

    let limit = effective_limit(params.limit);
    let rows = db::list_recent(&state.pool, limit).await?;

    Ok(Json(rows.into_iter().map(ReadingView::from).collect()))
}

fn effective_limit(requested: Option<i64>) -> i64 {
    requested.unwrap_or(DEFAULT_LIST_LIMIT).clamp(1, MAX_LIST_LIMIT)
}

/// Maps domain errors onto the wire contract: client faults become a 400
/// with the detail in `msg`, storage faults an opaque 500.
struct ApiError(Error);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, msg) = match &self.0 {
            Error::Validation(_) | Error::TimestampParse { .. } => {
                warn!("Rejected request: {}", self.0);
                REQUESTS_REJECTED_TOTAL.inc();
                (StatusCode::BAD_REQUEST, self.0.to_string())
            }
            _ => {
                error!("Internal error: {}", self.0);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal error".to_string(),
                )
            }
        };

        (status, Json(json!({"status": "erro", "msg": msg}))).into_response()
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn response_body(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_health_reports_ok() {
        let Json(body) = tokio_test::block_on(health());
        assert_eq!(body, json!({"status": "ok"}));
    }

    #[test]
    fn test_effective_limit_defaults_and_clamps() {
        assert_eq!(effective_limit(None), 50);
        assert_eq!(effective_limit(Some(10)), 10);
        assert_eq!(effective_limit(Some(0)), 1);
        assert_eq!(effective_limit(Some(-5)), 1);
        assert_eq!(effective_limit(Some(100_000)), 1000);
    }

    #[test]
    fn test_client_faults_map_to_400_with_error_body() {
        tokio_test::block_on(async {
            let response =
                ApiError(Error::Validation("device_id must not be empty".to_string()))
                    .into_response();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);

            let body = response_body(response).await;
            assert_eq!(body["status"], "erro");
            assert!(body["msg"].as_str().unwrap().contains("device_id"));
        });
    }

    #[test]
    fn test_parse_faults_carry_the_offending_input() {
        tokio_test::block_on(async {
            let source = chrono::DateTime::parse_from_rfc3339("not-a-date").unwrap_err();
            let response = ApiError(Error::TimestampParse {
                raw: "not-a-date".to_string(),
                source,
            })
            .into_response();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);

            let body = response_body(response).await;
            assert_eq!(body["status"], "erro");
            assert!(body["msg"].as_str().unwrap().contains("not-a-date"));
        });
    }

    #[test]
    fn test_storage_faults_are_opaque_500s() {
        tokio_test::block_on(async {
            let response = ApiError(Error::Database(sqlx::Error::PoolTimedOut)).into_response();
            assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

            let body = response_body(response).await;
            assert_eq!(body["status"], "erro");
            // No driver detail leaks to the caller.
            assert_eq!(body["msg"], "internal error");
        });
    }
}
