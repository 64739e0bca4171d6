use crate::config::security_config::Claims;
use crate::error::ApiError;
use crate::models::dtos::PaymentStatusResponse;
use crate::models::models::{AppState, Payment};
use crate::schema::payments;
use axum::extract::{Extension, Json, Path, State};
use diesel::prelude::*;
use std::sync::Arc;
use tracing::error;
use uuid::Uuid;

/// Polled by the top-up page while the user completes the bank transfer.
#[utoipa::path(
    get,
    path = "/api/payments/{external_id}",
    params(("external_id" = String, Path, description = "Correlation id returned at top-up initiation")),
    responses(
        (status = 200, description = "Payment status", body = PaymentStatusResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Unknown payment")
    ),
    security(("bearerAuth" = [])),
    tag = "Top-up"
)]
pub async fn payment_status(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(external_id): Path<String>,
) -> Result<Json<PaymentStatusResponse>, ApiError> {
    let user_id = Uuid::parse_str(&claims.sub).map_err(|e| {
        error!("Invalid user ID in claims: {}", e);
        ApiError::Auth("Invalid user ID".to_string())
    })?;

    let conn = &mut state.db.get().map_err(|e| {
        error!("Database connection error: {}", e);
        ApiError::DatabaseConnection(e.to_string())
    })?;

    // Scoped to the owner; someone else's external id reads as unknown.
    let payment = payments::table
        .filter(payments::external_id.eq(&external_id))
        .filter(payments::user_id.eq(user_id))
        .select(Payment::as_select())
        .first::<Payment>(conn)
        .optional()
        .map_err(ApiError::Database)?
        .ok_or_else(|| {
            ApiError::not_found(
                "unknown_payment",
                format!("No payment found for external id {}", external_id),
            )
        })?;

    Ok(Json(PaymentStatusResponse {
        external_id: payment.external_id,
        status: payment.status,
        amount: payment.amount,
        virtual_account_number: payment.virtual_account_number,
        bank_code: payment.bank_code,
        created_at: payment.created_at,
        paid_at: payment.paid_at,
    }))
}
