// src/bin/api_server.rs

use schema_crud::infra::{config, logging};
use schema_crud::transport;
use schema_crud::{ConnectionParams, DataEngine};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_tracing();

    // --- Engine Initialization ---
    let params = ConnectionParams::from_env()?;
    tracing::info!(database = %params.describe(), "connecting");
    let engine = Arc::new(DataEngine::connect(&params).await?);
    match engine.list_tables().await {
        Ok(tables) => tracing::info!(
            schema = engine.schema_name(),
            tables = tables.len(),
            "schema introspected"
        ),
        Err(e) => tracing::warn!(error = %e, "could not list tables at startup"),
    }

    let app_state = transport::http::AppState {
        engine: engine.clone(),
    };

    // --- API Server Initialization ---
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);
    let app = transport::http::create_router(app_state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", transport::http::ApiDoc::openapi()))
        .layer(cors);
    let bind_addr = config::api_bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "API server listening (Swagger UI at /swagger-ui)");

    tokio::select! {
        result = axum::serve(listener, app) => {
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("shutdown signal received");
        }
    }

    // The router (and its clones of the engine) is gone once serve returns
    // or is cancelled, so the connection can be closed cleanly.
    match Arc::try_unwrap(engine) {
        Ok(engine) => {
            if let Err(e) = engine.close().await {
                tracing::warn!(error = %e, "error while closing the connection");
            }
        }
        Err(_) => tracing::warn!("engine still shared at shutdown; dropping connection"),
    }
    tracing::info!("graceful shutdown complete");

    Ok(())
}
