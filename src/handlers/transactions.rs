use crate::config::security_config::Claims;
use crate::error::ApiError;
use crate::models::dtos::{HistoryQuery, HistoryResponse, TransactionView};
use crate::models::models::{AppState, TransactionKind};
use crate::services::wallet_service::{HistoryFilters, WalletService};
use axum::extract::{Extension, Json, Query, State};
use std::sync::Arc;
use tracing::error;
use uuid::Uuid;

#[utoipa::path(
    get,
    path = "/api/transactions",
    params(HistoryQuery),
    responses(
        (status = 200, description = "Filtered transaction history", body = HistoryResponse),
        (status = 400, description = "Unknown transaction kind"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearerAuth" = [])),
    tag = "Transactions"
)]
pub async fn get_transactions(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let user_id = Uuid::parse_str(&claims.sub).map_err(|e| {
        error!("Invalid user ID in claims: {}", e);
        ApiError::Auth("Invalid user ID".to_string())
    })?;

    let kind = match query.kind.as_deref() {
        None | Some("all") => None,
        Some(value) => Some(TransactionKind::parse(value).ok_or_else(|| {
            ApiError::rejected("invalid_kind", format!("Unknown transaction kind: {}", value))
        })?),
    };

    let filters = HistoryFilters {
        start_date: query.start_date,
        end_date: query.end_date,
        kind,
        search: query.search,
        limit: query.limit,
        offset: query.offset,
    };

    let conn = &mut state.db.get().map_err(|e| {
        error!("Database connection error: {}", e);
        ApiError::DatabaseConnection(e.to_string())
    })?;

    let rows = WalletService::get_history(conn, user_id, &filters)?;
    let data: Vec<TransactionView> = rows
        .into_iter()
        .map(|(entry, status, reference)| TransactionView::from_row(entry, status, reference))
        .collect();

    Ok(Json(HistoryResponse {
        total: data.len(),
        data,
    }))
}
