mod error;
mod routes;
mod state;

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use congress_trades_sdk::async_client::AsyncTradesSdkBuilder;
use tower_http::cors::CorsLayer;
use tracing_subscriber::EnvFilter;

use state::AppState;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("initializing trades SDK");
    let sdk = AsyncTradesSdkBuilder::from_env()
        .build()
        .await
        .expect("Failed to initialize trades SDK");
    tracing::info!("SDK ready");

    let state = Arc::new(AppState { sdk });

    let app = Router::new()
        .route("/api/stats", get(routes::stats::get_stats))
        .route("/api/trades", get(routes::trades::list_trades))
        .route("/api/trades/{id}", get(routes::trades::get_trade))
        .route("/api/tickers", get(routes::trades::list_tickers))
        .route("/api/members", get(routes::members::list_members))
        .route("/api/members/{id}", get(routes::members::get_member))
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr = "0.0.0.0:3000";
    tracing::info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
