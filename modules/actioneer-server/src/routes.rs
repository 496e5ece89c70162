use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use actioneer_common::{ActioneerError, ActionMessage};
use actioneer_engine::{perform_label_action, process_batch, PerformerRegistry};

use crate::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/v1/notifications", post(handle_notifications))
        .route("/v1/actions", post(handle_action))
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

/// The notification envelope the queue pushes: one batch, each record
/// wrapping a match message body. Bodies arrive either as embedded JSON
/// objects or as JSON-encoded strings, depending on the transport.
#[derive(Deserialize)]
struct NotificationBatch {
    records: Vec<NotificationRecord>,
}

#[derive(Deserialize)]
struct NotificationRecord {
    body: serde_json::Value,
}

/// Unwrap a record body. String bodies that fail to parse pass through
/// unchanged so the batch processor reports them as malformed in their own
/// slot instead of failing the whole request.
fn unwrap_record(record: NotificationRecord) -> serde_json::Value {
    match record.body {
        serde_json::Value::String(raw) => {
            serde_json::from_str(&raw).unwrap_or(serde_json::Value::String(raw))
        }
        body => body,
    }
}

async fn handle_notifications(
    State(state): State<Arc<AppState>>,
    Json(batch): Json<NotificationBatch>,
) -> impl IntoResponse {
    let batch_id = Uuid::new_v4();
    let records: Vec<serde_json::Value> = batch.records.into_iter().map(unwrap_record).collect();
    info!(%batch_id, records = records.len(), "Processing notification batch");

    let results = process_batch(
        &records,
        state.catalog.as_ref(),
        state.policy.as_ref(),
        state.queue.as_ref(),
    )
    .await;

    Json(serde_json::json!({ "results": results }))
}

/// Direct action execution: the actions-queue consumer posts an
/// ActionMessage here and the named performer runs its webhook call.
async fn handle_action(
    State(state): State<Arc<AppState>>,
    Json(message): Json<ActionMessage>,
) -> impl IntoResponse {
    let snapshot = match state.catalog.load().await {
        Ok(snapshot) => snapshot,
        Err(error) => {
            warn!(%error, "Catalog load failed");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"error": error.to_string()})),
            )
                .into_response();
        }
    };

    let registry = match PerformerRegistry::from_entries(snapshot.performers) {
        Ok(registry) => registry,
        Err(error) => {
            warn!(%error, "Performer catalog is inconsistent");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"error": error.to_string()})),
            )
                .into_response();
        }
    };

    match perform_label_action(&registry, &state.http, &message).await {
        Ok(()) => Json(serde_json::json!({"status": "performed"})).into_response(),
        Err(error @ ActioneerError::PerformerNotFound(_)) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(serde_json::json!({"error": error.to_string()})),
        )
            .into_response(),
        Err(error @ ActioneerError::Dispatch(_)) => {
            warn!(%error, action_label = %message.action_label, "Action dispatch failed");
            (
                StatusCode::BAD_GATEWAY,
                Json(serde_json::json!({"error": error.to_string()})),
            )
                .into_response()
        }
        Err(error) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({"error": error.to_string()})),
        )
            .into_response(),
    }
}
