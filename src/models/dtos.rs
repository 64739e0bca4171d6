use crate::models::models::Transaction;
use crate::utility::validate_bank_code;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

#[derive(Deserialize, Validate, ToSchema)]
pub struct TopUpRequest {
    #[validate(range(
        min = 10000,
        max = 10000000,
        message = "Amount must be between 10,000 and 10,000,000"
    ))]
    pub amount: i64,
    #[validate(custom(function = "validate_bank_code"))]
    pub bank_code: String,
}

#[derive(Serialize, ToSchema)]
pub struct TopUpResponse {
    pub payment_id: Uuid,
    pub external_id: String,
    pub virtual_account_number: Option<String>,
    pub bank_code: String,
    pub amount: i64,
    pub expiration_date: Option<String>,
}

#[derive(Deserialize, Validate, ToSchema)]
pub struct TransferRequest {
    #[validate(email(message = "Invalid recipient email"))]
    pub recipient_email: String,
    pub amount: i64,
    #[validate(length(max = 255, message = "Description too long"))]
    pub description: String,
    #[validate(length(equal = 6, message = "PIN must be 6 digits"))]
    pub pin: String,
}

#[derive(Serialize, ToSchema)]
pub struct TransferResponse {
    pub status: &'static str,
    pub transaction_id: Uuid,
    pub recipient_email: String,
    pub amount: i64,
}

/// Provider callback for a settled virtual-account payment. Field names
/// follow the provider's wire format.
#[derive(Deserialize, ToSchema)]
pub struct VirtualAccountWebhook {
    pub id: Option<String>,
    pub external_id: String,
    pub amount: i64,
    pub transaction_timestamp: DateTime<Utc>,
    pub payment_id: Option<String>,
    pub bank_code: Option<String>,
    pub status: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct WebhookAck {
    pub status: &'static str,
    pub external_id: String,
    pub transaction_id: Option<Uuid>,
}

#[derive(Deserialize, IntoParams)]
pub struct HistoryQuery {
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    /// One of topup, transfer_out, transfer_in; omit or "all" for everything.
    pub kind: Option<String>,
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Serialize, ToSchema)]
pub struct TransactionView {
    pub id: Uuid,
    pub amount: i64,
    pub kind: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub status: String,
    pub reference: String,
}

impl TransactionView {
    pub fn from_row(entry: Transaction, status: Option<String>, reference: Option<String>) -> Self {
        TransactionView {
            reference: reference.unwrap_or_else(|| entry.id.to_string()),
            status: status.unwrap_or_else(|| "completed".to_string()),
            id: entry.id,
            amount: entry.amount,
            kind: entry.kind,
            description: entry.description,
            created_at: entry.created_at,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct HistoryResponse {
    pub data: Vec<TransactionView>,
    pub total: usize,
}

#[derive(Serialize, ToSchema)]
pub struct WalletResponse {
    pub wallet_id: Uuid,
    pub balance: i64,
    pub recent_transactions: Vec<TransactionView>,
}

#[derive(Serialize, ToSchema)]
pub struct PaymentStatusResponse {
    pub external_id: String,
    pub status: String,
    pub amount: i64,
    pub virtual_account_number: Option<String>,
    pub bank_code: Option<String>,
    pub created_at: DateTime<Utc>,
    pub paid_at: Option<DateTime<Utc>>,
}
