pub mod ledger_service;
pub mod settlement_service;
pub mod topup_service;
pub mod transfer_service;
pub mod wallet_service;
