use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use session::error::UnknownDirection;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    UnknownDirection(#[from] UnknownDirection),

    #[error("Session not ready")]
    NotReady,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::UnknownDirection { .. } => StatusCode::BAD_REQUEST,
            AppError::NotReady => StatusCode::SERVICE_UNAVAILABLE,
        };

        (status, self.to_string()).into_response()
    }
}
