use crate::error::ApiError;
use crate::models::dtos::{VirtualAccountWebhook, WebhookAck};
use crate::models::models::AppState;
use crate::services::settlement_service::{SettlementOutcome, SettlementService};
use axum::extract::{Json, State};
use http::HeaderMap;
use std::sync::Arc;
use tracing::{error, info, warn};

#[utoipa::path(
    post,
    path = "/api/webhooks/virtual-account",
    request_body = VirtualAccountWebhook,
    responses(
        (status = 200, description = "Settlement applied or already processed", body = WebhookAck),
        (status = 400, description = "Malformed payload or amount mismatch"),
        (status = 401, description = "Missing or invalid callback token"),
        (status = 404, description = "Unknown external id"),
        (status = 409, description = "Payment in a terminal non-paid state"),
        (status = 500, description = "Internal consistency failure")
    ),
    tag = "Webhooks"
)]
pub async fn virtual_account_webhook(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: String,
) -> Result<Json<WebhookAck>, ApiError> {
    // Shared-secret check happens before the body is even parsed; an
    // unauthenticated caller learns nothing about what we accept.
    let token = headers
        .get("x-callback-token")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::Auth("Missing callback token".to_string()))?;

    if token != state.webhook_token {
        warn!("Webhook rejected: invalid callback token");
        return Err(ApiError::Auth("Invalid callback token".to_string()));
    }

    let payload: VirtualAccountWebhook = serde_json::from_str(&body).map_err(|e| {
        warn!("Webhook rejected: malformed payload: {}", e);
        ApiError::rejected("invalid_payload", format!("Malformed webhook payload: {}", e))
    })?;

    info!(
        "Virtual account webhook received: external_id={} amount={} status={:?}",
        payload.external_id, payload.amount, payload.status
    );

    let conn = &mut state.db.get().map_err(|e| {
        error!("Database connection error: {}", e);
        ApiError::DatabaseConnection(e.to_string())
    })?;

    let provider_reference = payload.payment_id.as_deref().or(payload.id.as_deref());

    match SettlementService::settle(
        conn,
        &payload.external_id,
        payload.amount,
        payload.transaction_timestamp,
        provider_reference,
    )? {
        SettlementOutcome::Applied(entry) => Ok(Json(WebhookAck {
            status: "applied",
            external_id: payload.external_id,
            transaction_id: Some(entry.id),
        })),
        SettlementOutcome::AlreadyProcessed => Ok(Json(WebhookAck {
            status: "already_processed",
            external_id: payload.external_id,
            transaction_id: None,
        })),
    }
}
