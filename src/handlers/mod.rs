pub mod health;
pub mod payment_status;
pub mod top_up;
pub mod transactions;
pub mod transfer;
pub mod va_webhook;
pub mod wallet;
