use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use thiserror::Error;
use tracing::error;

use crate::view::escape;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("a user with that username or email already exists")]
    Conflict,

    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("login required")]
    AuthenticationRequired,

    #[error("todo {0} not found")]
    NotFound(i64),

    #[error("todo {0} belongs to another user")]
    Authorization(i64),

    #[error("{field} must be at most {max} characters")]
    Validation { field: &'static str, max: usize },

    #[error("unknown template: {0}")]
    Template(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::AuthenticationRequired => return Redirect::to("/login").into_response(),
            AppError::Conflict => StatusCode::CONFLICT,
            AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Authorization(_) => StatusCode::FORBIDDEN,
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::Template(_) | AppError::Database(_) => {
                error!("request failed: {}", self);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        // Internal details stay in the log.
        let message = if status.is_server_error() {
            "Something went wrong while handling your request.".to_string()
        } else {
            self.to_string()
        };

        let body = format!(
            "<!doctype html>\n<html><head><title>{code}</title></head>\
             <body><h1>{code}</h1><p>{message}</p></body></html>\n",
            code = status,
            message = escape(&message),
        );

        (status, Html(body)).into_response()
    }
}
