use crate::config::security_config::Claims;
use crate::error::ApiError;
use crate::models::dtos::{TransactionView, WalletResponse};
use crate::models::models::AppState;
use crate::services::wallet_service::WalletService;
use axum::extract::{Extension, Json, State};
use std::sync::Arc;
use tracing::error;
use uuid::Uuid;

const RECENT_ACTIVITY_LIMIT: i64 = 5;

#[utoipa::path(
    get,
    path = "/api/wallet",
    responses(
        (status = 200, description = "Current balance and recent activity", body = WalletResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearerAuth" = [])),
    tag = "Wallet"
)]
pub async fn get_wallet(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<WalletResponse>, ApiError> {
    let user_id = Uuid::parse_str(&claims.sub).map_err(|e| {
        error!("Invalid user ID in claims: {}", e);
        ApiError::Auth("Invalid user ID".to_string())
    })?;

    let conn = &mut state.db.get().map_err(|e| {
        error!("Database connection error: {}", e);
        ApiError::DatabaseConnection(e.to_string())
    })?;

    let wallet = WalletService::ensure_wallet(conn, user_id)?;
    let recent = WalletService::recent_activity(conn, wallet.id, RECENT_ACTIVITY_LIMIT)?;

    Ok(Json(WalletResponse {
        wallet_id: wallet.id,
        balance: wallet.balance,
        recent_transactions: recent
            .into_iter()
            .map(|entry| TransactionView::from_row(entry, None, None))
            .collect(),
    }))
}
