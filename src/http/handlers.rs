//! Request handlers.
//!
//! | Method | Path             | Handler              |
//! |--------|------------------|----------------------|
//! | GET    | `/manifest.json` | [`manifest`]         |
//! | GET    | any other        | [`form_page`]        |
//! | POST   | any              | [`convert`]          |
//! | HEAD   | any              | [`reject_head`]      |
//! | other  | any              | [`method_not_allowed`] |

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, Method, Request, StatusCode},
    middleware::Next,
    response::{Html, IntoResponse, Response},
    Json,
};
use std::time::Instant;

use crate::conversion::types::{ConversionError, ConversionResult};
use crate::conversion::ConversionOutcome;
use crate::http::decode::decode_request;
use crate::http::page::{Manifest, FORM_PAGE};
use crate::http::request::request_id_of;
use crate::http::server::AppState;
use crate::observability::metrics;

pub async fn manifest(State(state): State<AppState>, headers: HeaderMap) -> Json<Manifest> {
    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("localhost");
    Json(Manifest::new(host, &state.mount_path))
}

pub async fn form_page() -> Html<&'static str> {
    Html(FORM_PAGE)
}

pub async fn method_not_allowed() -> Response {
    (StatusCode::METHOD_NOT_ALLOWED, "Metodo no permitido").into_response()
}

/// GET routes would otherwise answer HEAD as well.
pub async fn reject_head(request: Request<Body>, next: Next) -> Response {
    if request.method() == Method::HEAD {
        return method_not_allowed().await;
    }
    next.run(request).await
}

/// Run the conversion pipeline. Every failure, expected or not, leaves
/// through this one boundary.
pub async fn convert(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start = Instant::now();
    let request_id = request_id_of(&request).to_string();

    let outcome = match tokio::time::timeout(state.request_timeout, run_conversion(&state, request)).await {
        Ok(result) => result,
        Err(_) => Err(ConversionError::Internal(format!(
            "conversion timed out after {}s",
            state.request_timeout.as_secs()
        ))),
    };

    match outcome {
        Ok(ConversionOutcome::Unchanged(body)) => {
            tracing::info!(request_id = %request_id, count = body.converted_ingredients.len(), "Same system, ingredients echoed");
            metrics::record_request("unchanged", 200, start);
            (StatusCode::OK, Json(body)).into_response()
        }
        Ok(ConversionOutcome::Converted(body)) => {
            tracing::info!(
                request_id = %request_id,
                source = %body.source_system,
                target = %body.target_system,
                count = body.converted_ingredients.len(),
                "Recipe converted"
            );
            metrics::record_request("converted", 200, start);
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(err) => {
            let status = err.status();
            if status.is_server_error() {
                tracing::error!(request_id = %request_id, error = %err, "Conversion failed");
            } else {
                tracing::warn!(request_id = %request_id, status = %status, error = %err, "Conversion rejected");
            }
            metrics::record_request("error", status.as_u16(), start);
            err.into_response()
        }
    }
}

async fn run_conversion(state: &AppState, request: Request<Body>) -> ConversionResult<ConversionOutcome> {
    let raw = decode_request(request, state.max_body_bytes).await?;
    let request = raw.validate()?;
    state.engine.convert(request).await
}
