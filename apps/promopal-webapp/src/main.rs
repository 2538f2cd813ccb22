use axum::Router;
use axum::routing::{get, post};
use std::env;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

mod handlers;
mod state;
mod subscriptions;

use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let database_url =
        env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://promo_bot.db".to_string());
    let static_dir = env::var("STATIC_DIR").unwrap_or_else(|_| "./static".to_string());
    let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:5000".to_string());

    let pool = promopal_db::db::init_db(&database_url).await?;
    let state = AppState {
        catalog: promopal_db::Catalog::new(pool),
    };

    let app = router(state, &static_dir);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("Mini-app server listening on {}", bind_addr);
    tracing::info!("Serving static assets from {}", static_dir);
    axum::serve(listener, app).await?;

    Ok(())
}

fn router(state: AppState, static_dir: &str) -> Router {
    Router::new()
        .route("/api/promocodes", get(handlers::api::promocodes))
        .route(
            "/api/check_subscriptions",
            post(handlers::api::check_subscriptions),
        )
        // Everything else is a passthrough file server for the mini-app,
        // index.html at the root included.
        .fallback_service(ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
