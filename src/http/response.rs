//! Error responses.
//!
//! Every error leaves the service as `{"error": "<message>"}` with the
//! status of its class. 405 is the one non-JSON error and is produced
//! directly by the handlers.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::any::Any;

use crate::conversion::ConversionError;

/// JSON error body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ConversionError {
    pub fn status(&self) -> StatusCode {
        match self {
            ConversionError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ConversionError::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ConversionError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ConversionError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(ErrorBody { error: self.to_string() })).into_response()
    }
}

/// Turn a handler panic into the generic 500 JSON error.
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "internal error".to_string()
    };
    tracing::error!(panic = %message, "Handler panicked");
    ConversionError::Internal(message).into_response()
}
