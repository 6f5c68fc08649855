use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use section_lib::{AssemblyCompiler, CompilerSettings};
use tower_http::cors::CorsLayer;

mod build;
mod routes;

#[derive(Clone)]
pub struct AppState {
    pub compiler: Arc<AssemblyCompiler>,
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(routes::health))
        .route("/api/compile", post(routes::compile))
        .route("/api/inspect", post(routes::inspect))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let settings = match std::env::var("SECTION_SETTINGS") {
        Ok(path) => CompilerSettings::load(std::path::Path::new(&path)),
        Err(_) => CompilerSettings::load_default(),
    };
    let state = AppState {
        compiler: Arc::new(AssemblyCompiler::new(settings)),
    };

    let addr = std::env::var("SECTION_ADDR").unwrap_or_else(|_| "0.0.0.0:3001".to_string());
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind {addr}: {e}");
            return;
        }
    };
    tracing::info!("Server running on http://{addr}");
    if let Err(e) = axum::serve(listener, app(state)).await {
        tracing::error!("Server error: {e}");
    }
}
