use crate::config::security_config::Claims;
use crate::error::ApiError;
use crate::models::dtos::{TransferRequest, TransferResponse};
use crate::models::models::AppState;
use crate::services::transfer_service::TransferService;
use axum::extract::{Extension, Json, State};
use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;
use validator::Validate;

#[utoipa::path(
    post,
    path = "/api/transfer",
    request_body = TransferRequest,
    responses(
        (status = 200, description = "Transfer completed", body = TransferResponse),
        (status = 400, description = "Rejected: bad_auth, invalid_recipient, amount_out_of_range or insufficient_funds"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearerAuth" = [])),
    tag = "Transfer"
)]
pub async fn transfer(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<TransferRequest>,
) -> Result<Json<TransferResponse>, ApiError> {
    req.validate().map_err(ApiError::Validation)?;

    let sender_id = Uuid::parse_str(&claims.sub).map_err(|e| {
        error!("Invalid user ID in claims: {}", e);
        ApiError::Auth("Invalid user ID".to_string())
    })?;

    info!(
        "Transfer request: sender={} recipient={} amount={}",
        sender_id, req.recipient_email, req.amount
    );

    let conn = &mut state.db.get().map_err(|e| {
        error!("Database connection error: {}", e);
        ApiError::DatabaseConnection(e.to_string())
    })?;

    let outcome = TransferService::transfer(
        conn,
        sender_id,
        &req.recipient_email,
        req.amount,
        &req.description,
        &req.pin,
    )?;

    Ok(Json(TransferResponse {
        status: "success",
        transaction_id: outcome.debit.id,
        recipient_email: req.recipient_email,
        amount: req.amount,
    }))
}
