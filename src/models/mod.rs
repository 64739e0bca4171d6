pub mod dtos;
pub mod models;

pub use models::AppState;
