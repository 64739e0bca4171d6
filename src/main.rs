use diesel::{
    r2d2::{ConnectionManager, Pool},
    PgConnection,
};
use dompet::app::create_router;
use dompet::config::security_config::JWTSecret;
use dompet::logging::setup_logging;
use dompet::models::models::AppState;
use dotenvy::dotenv;
use http::HeaderValue;
use std::{env, net::SocketAddr, sync::Arc};
use tokio::{net::TcpListener, signal};
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), eyre::Error> {
    setup_logging();

    info!("Starting dompet wallet service");

    dotenv().ok();
    let db_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port = env::var("PORT").unwrap_or_else(|_| "8080".to_string());

    let cors_origins = env::var("CORS_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:3000".to_string())
        .split(',')
        .map(|s| s.trim().to_string())
        .collect::<Vec<String>>();

    info!("cors origins: {:?}", cors_origins);

    let manager = ConnectionManager::<PgConnection>::new(db_url);
    let pool = Pool::builder().max_size(10).build(manager).map_err(|e| {
        error!("Failed to create database pool: {}", e);
        eyre::eyre!("Failed to create database pool: {}", e)
    })?;

    let state = Arc::new(AppState {
        db: pool,
        jwt_secret: JWTSecret::new().jwt_secret,
        webhook_token: env::var("VA_WEBHOOK_TOKEN").map_err(|e| {
            error!("VA_WEBHOOK_TOKEN environment variable not set: {}", e);
            eyre::eyre!("VA_WEBHOOK_TOKEN environment variable must be set")
        })?,
        va_api_url: env::var("VA_API_URL").unwrap_or_else(|_| "https://api.xendit.co".to_string()),
        va_secret_key: env::var("VA_SECRET_KEY").map_err(|e| {
            error!("VA_SECRET_KEY environment variable not set: {}", e);
            eyre::eyre!("VA_SECRET_KEY environment variable must be set")
        })?,
    });

    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_headers(Any)
        .allow_origin(
            cors_origins
                .iter()
                .map(|s| s.parse::<HeaderValue>())
                .collect::<Result<Vec<_>, _>>()?,
        );

    let app = create_router(state).layer(cors);

    let addr = format!("{}:{}", host, port).parse::<SocketAddr>()?;
    let listener = TcpListener::bind(&addr).await?;
    info!("Server running on http://{}", addr);
    info!(
        "Swagger UI available at http://{}/swagger-ui/index.html#/",
        addr
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down gracefully");
    Ok(())
}

// handle Ctrl+C for graceful shutdown
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
