//! Server entry point: env configuration, pool, table DDL, routes.

use axum::{extract::Request, Router, ServiceExt};
use odontology_api::{common_routes_with_ready, connect, ensure_tables, entity_routes, AppState};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::Layer;
use tower_http::{normalize_path::NormalizePathLayer, trace::TraceLayer};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("odontology_api=info,tower_http=info")),
        )
        .init();

    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://odontology.db".into());
    let api_key = std::env::var("API_KEY").unwrap_or_else(|_| "secret-key".into());
    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".into());

    let pool = connect(&database_url).await?;
    ensure_tables(&pool).await?;

    let state = AppState {
        pool,
        api_key: Arc::from(api_key),
    };
    let router = Router::new()
        .merge(common_routes_with_ready(state.clone()))
        .merge(entity_routes(state))
        .layer(TraceLayer::new_for_http());
    // Collection routes are addressed with and without a trailing slash.
    let app = NormalizePathLayer::trim_trailing_slash().layer(router);

    let listener = TcpListener::bind(&bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, ServiceExt::<Request>::into_make_service(app)).await?;
    Ok(())
}
