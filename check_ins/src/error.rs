use crate::validation::FieldErrors;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

pub type Result<T = ()> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("sql error")]
    Sql(#[from] sqlx::Error),
    #[error("migration error")]
    Migrate(#[from] sqlx::migrate::MigrateError),
    #[error("db store error")]
    DbStore(#[from] db_store::Error),
    #[error("io error")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    NotFound(String),
    #[error("{}", .0.message())]
    Validation(FieldErrors),
    #[error("malformed payload: {0}")]
    MalformedPayload(String),
    #[error("unsupported media type: {0}")]
    UnsupportedMediaType(String),
    #[error("method {0} not allowed")]
    MethodNotAllowed(String),
}

impl Error {
    pub fn not_found<E: ToString>(msg: E) -> Self {
        Self::NotFound(msg.to_string())
    }

    pub fn malformed<E: ToString>(err: E) -> Self {
        Self::MalformedPayload(err.to_string())
    }

    /// Short label used for request outcome metrics
    pub fn outcome(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::Validation(_) => "validation",
            Self::MalformedPayload(_)
            | Self::UnsupportedMediaType(_)
            | Self::MethodNotAllowed(_) => "rejected",
            _ => "error",
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Self::Validation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({
                    "message": errors.message(),
                    "errors": errors,
                })),
            )
                .into_response(),
            Self::NotFound(msg) => message_response(StatusCode::NOT_FOUND, msg),
            Self::MalformedPayload(_) => message_response(StatusCode::BAD_REQUEST, self.to_string()),
            Self::UnsupportedMediaType(_) => {
                message_response(StatusCode::UNSUPPORTED_MEDIA_TYPE, self.to_string())
            }
            Self::MethodNotAllowed(_) => {
                message_response(StatusCode::METHOD_NOT_ALLOWED, self.to_string())
            }
            other => {
                tracing::error!(?other, "check-in request failed");
                message_response(StatusCode::INTERNAL_SERVER_ERROR, "Server Error".to_string())
            }
        }
    }
}

fn message_response(status: StatusCode, message: String) -> Response {
    (status, Json(json!({ "message": message }))).into_response()
}
