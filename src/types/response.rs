//! Response envelope shared by every endpoint.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// `{"payload": ..., "message": "..."}`
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub payload: T,
    pub message: String,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(payload: T, message: impl Into<String>) -> Self {
        Self {
            payload,
            message: message.into(),
        }
    }
}

impl ApiResponse<()> {
    /// Envelope with a null payload.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            payload: (),
            message: message.into(),
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// 201 wrapper for POST endpoints that create a resource.
pub struct Created<T: Serialize>(pub ApiResponse<T>);

impl<T: Serialize> Created<T> {
    pub fn new(payload: T, message: impl Into<String>) -> Self {
        Self(ApiResponse::new(payload, message))
    }
}

impl<T: Serialize> IntoResponse for Created<T> {
    fn into_response(self) -> Response {
        (StatusCode::CREATED, Json(self.0)).into_response()
    }
}
