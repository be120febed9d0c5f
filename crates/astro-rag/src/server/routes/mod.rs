//! API routes for the AstroAI server

pub mod generate;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};

use crate::server::state::AppState;

/// Build all `/api` routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/answer", post(generate::answer))
        .route("/info", get(info))
}

/// API info endpoint
async fn info(State(state): State<AppState>) -> Json<serde_json::Value> {
    let config = state.config();
    let orchestrator = state.orchestrator();

    Json(serde_json::json!({
        "name": "astro-rag",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Space-science question answering with retrieval and general-knowledge fallback",
        "ready": state.is_ready(),
        "index": state.index_stats(),
        "generation": {
            "provider": orchestrator.generator().name(),
            "model": orchestrator.generator().model(),
        },
        "retrieval": {
            "top_k": orchestrator.settings().top_k,
            "chunk_size": config.chunking.chunk_size,
            "chunk_overlap": config.chunking.chunk_overlap,
        },
        "endpoints": {
            "POST /generate": "Answer a question as a streamed text/plain body",
            "POST /api/answer": "Answer a question as a single JSON object",
            "GET /health": "Liveness check",
            "GET /ready": "Readiness check",
            "GET /api/info": "This document"
        }
    }))
}
