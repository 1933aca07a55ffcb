use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::llm::LlmError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(&'static str),

    #[error("{0}")]
    Conflict(&'static str),

    #[error("{0}")]
    Unauthorized(&'static str),

    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error("Internal error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Llm(LlmError::RateLimited { .. }) => StatusCode::TOO_MANY_REQUESTS,
            AppError::Llm(LlmError::PaymentRequired) => StatusCode::PAYMENT_REQUIRED,
            AppError::Llm(LlmError::NotConfigured(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Llm(_) => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn public_message(&self) -> String {
        match self {
            AppError::Llm(LlmError::RateLimited { .. }) => {
                "Rate limit exceeded. Please try again later.".into()
            }
            AppError::Llm(LlmError::PaymentRequired) => {
                "Payment required. Please add credits to continue.".into()
            }
            AppError::Llm(LlmError::NotConfigured(_)) => "AI service is not configured".into(),
            AppError::Llm(_) => "AI service returned an invalid response".into(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            match &self {
                AppError::Internal(e) => error!(error = ?e, "request failed"),
                other => error!(error = %other, "request failed"),
            }
        }
        (status, Json(json!({ "error": self.public_message() }))).into_response()
    }
}
