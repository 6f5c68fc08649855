use axum::{extract::State, http::StatusCode, response::Json};
use section_lib::{CompileError, SceneGroup};
use serde_json::{json, Value};
use shared::AssemblyFile;

use crate::build;
use crate::AppState;

type ApiError = (StatusCode, Json<Value>);

/// Health check
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Compile an assembly file into a scene group
pub async fn compile(
    State(state): State<AppState>,
    Json(file): Json<AssemblyFile>,
) -> Result<Json<SceneGroup>, ApiError> {
    let scene = compile_blocking(state, file).await?;
    Ok(Json(scene))
}

/// Compile an assembly file and return layout metrics
pub async fn inspect(
    State(state): State<AppState>,
    Json(file): Json<AssemblyFile>,
) -> Result<Json<Value>, ApiError> {
    let scene = compile_blocking(state, file).await?;
    Ok(Json(build::inspect_scene(&scene)))
}

async fn compile_blocking(state: AppState, file: AssemblyFile) -> Result<SceneGroup, ApiError> {
    tokio::task::spawn_blocking(move || state.compiler.build_file(&file))
        .await
        .map_err(|e| {
            tracing::error!("Compile task failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "compile task failed" })),
            )
        })?
        .map_err(|e| {
            tracing::error!("Compile error: {}", e);
            (StatusCode::BAD_REQUEST, Json(error_body(&e)))
        })
}

fn error_body(e: &CompileError) -> Value {
    let path = match e {
        CompileError::Configuration { path, .. } | CompileError::Parameter { path, .. } => path,
    };
    json!({ "error": e.to_string(), "path": path })
}
