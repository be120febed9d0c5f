//! Question endpoints: streamed `/generate` and batch `/api/answer`

use axum::{
    body::Body,
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use futures::StreamExt;
use std::convert::Infallible;

use crate::domain::random_rejection;
use crate::error::Result;
use crate::server::state::AppState;
use crate::types::{AnswerResult, GenerateRequest, RejectionBody};

/// POST /generate - Answer a question as a stream of text fragments
pub async fn generate(
    State(state): State<AppState>,
    Json(request): Json<GenerateRequest>,
) -> Result<Response> {
    let query = request.query()?;

    if !state.gate().allows(query) {
        return Ok(reject(query));
    }

    tracing::info!("Generate: \"{}\"", query);

    let fragments = state
        .orchestrator()
        .answer_stream(query)
        .map(Ok::<_, Infallible>);

    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        Body::from_stream(fragments),
    )
        .into_response())
}

/// POST /api/answer - Answer a question as one JSON object
pub async fn answer(
    State(state): State<AppState>,
    Json(request): Json<GenerateRequest>,
) -> Result<Response> {
    let query = request.query()?;

    if !state.gate().allows(query) {
        return Ok(reject(query));
    }

    tracing::info!("Answer: \"{}\"", query);

    let result: AnswerResult = state.orchestrator().answer(query).await;
    tracing::info!("Answered via {:?}", result.response_type);

    Ok(Json(result).into_response())
}

fn reject(query: &str) -> Response {
    tracing::info!("Out-of-domain query rejected: \"{}\"", query);
    let message = random_rejection(&mut rand::thread_rng());
    (StatusCode::NOT_FOUND, Json(RejectionBody::new(message))).into_response()
}
