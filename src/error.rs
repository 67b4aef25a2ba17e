//! Error types for the stats dashboard and poller

use axum::{
  http::StatusCode,
  response::{IntoResponse, Response},
};

#[derive(Debug, thiserror::Error)]
pub enum Error {
  /// Store connection, query or write failure
  #[error("Database error: {0}")]
  Database(#[from] sea_orm::DbErr),

  #[error("Game server unreachable: {0}")]
  Unreachable(String),

  #[error("Malformed game server response: {0}")]
  MalformedResponse(String),

  #[error("Catalog error: {0}")]
  Catalog(String),

  #[error("Internal error: {0}")]
  Internal(String),
}

impl From<reqwest::Error> for Error {
  fn from(err: reqwest::Error) -> Self {
    if err.is_decode() {
      Error::MalformedResponse(err.to_string())
    } else {
      Error::Unreachable(err.to_string())
    }
  }
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      Error::Database(_) => {
        (StatusCode::INTERNAL_SERVER_ERROR, "Stat store unavailable")
      }
      Error::Unreachable(_) | Error::MalformedResponse(_) => {
        (StatusCode::BAD_GATEWAY, "Game server error")
      }
      Error::Catalog(_) | Error::Internal(_) => {
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal error")
      }
    };

    tracing::error!("Request failed: {self}");

    let body = json::json!({
      "success": false,
      "error": message
    });

    (status, axum::Json(body)).into_response()
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
