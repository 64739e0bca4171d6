use crate::error::ErrorBody;
use crate::handlers::{
    health::__path_health_check, payment_status::__path_payment_status, top_up::__path_top_up,
    transactions::__path_get_transactions, transfer::__path_transfer,
    va_webhook::__path_virtual_account_webhook, wallet::__path_get_wallet,
};
use crate::models::dtos::{
    HistoryResponse, PaymentStatusResponse, TopUpRequest, TopUpResponse, TransactionView,
    TransferRequest, TransferResponse, VirtualAccountWebhook, WalletResponse, WebhookAck,
};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    paths(
        health_check, top_up, payment_status, transfer,
        get_wallet, get_transactions, virtual_account_webhook
    ),
    components(schemas(
        ErrorBody, TopUpRequest, TopUpResponse, PaymentStatusResponse,
        TransferRequest, TransferResponse, WalletResponse, TransactionView,
        HistoryResponse, VirtualAccountWebhook, WebhookAck
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "Wallet", description = "Balance and recent activity"),
        (name = "Top-up", description = "Virtual-account top-up initiation and status"),
        (name = "Transfer", description = "Peer-to-peer transfers"),
        (name = "Transactions", description = "Transaction history"),
        (name = "Webhooks", description = "Payment provider callbacks"),
        (name = "Health", description = "Service health")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.security_schemes.insert(
                "bearerAuth".to_string(),
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
