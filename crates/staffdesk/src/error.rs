use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use crate::workflows::jobs::JobsError;
use crate::workflows::venues::VenueError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// Top-level error surfaced by the service binary and HTTP layer.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("telemetry error: {0}")]
    Telemetry(#[from] TelemetryError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("server error: {0}")]
    Server(#[from] axum::Error),
    #[error(transparent)]
    Venue(#[from] VenueError),
    #[error(transparent)]
    Jobs(#[from] JobsError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Venue(err) => venue_status(err),
            AppError::Jobs(err) => jobs_status(err),
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

fn venue_status(err: &VenueError) -> StatusCode {
    match err {
        VenueError::NotFound(_)
        | VenueError::ChannelNotFound(_)
        | VenueError::ImportNotFound => StatusCode::NOT_FOUND,
        VenueError::DuplicateName(_) => StatusCode::CONFLICT,
        VenueError::Unauthorized(_) | VenueError::PendingApproval(_) => StatusCode::FORBIDDEN,
        VenueError::TooManyUsers(_)
        | VenueError::CannotRemoveUser(_)
        | VenueError::InvalidChannelKind(_)
        | VenueError::AmbiguousMatch => StatusCode::UNPROCESSABLE_ENTITY,
        VenueError::Directory(_) | VenueError::Messaging(_) => StatusCode::BAD_GATEWAY,
        VenueError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn jobs_status(err: &JobsError) -> StatusCode {
    match err {
        JobsError::NotFound(_) | JobsError::VenueNotFound(_) => StatusCode::NOT_FOUND,
        JobsError::DuplicateId(_) => StatusCode::CONFLICT,
        JobsError::PostingNotComplete | JobsError::ChannelUnset(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        JobsError::Messaging(_) => StatusCode::BAD_GATEWAY,
        JobsError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
