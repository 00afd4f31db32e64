use axum::{
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Invalid state: {0}")]
    InvalidState(String),
}

impl Error {
    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Error::InvalidState(msg.into())
    }

    /// Builds a single-field validation error, matching what the
    /// `validator` derive produces for request payloads.
    pub fn invalid_field(field: &'static str, code: &'static str, message: &str) -> Self {
        let mut err = validator::ValidationError::new(code);
        err.message = Some(message.to_string().into());
        let mut errors = validator::ValidationErrors::new();
        errors.add(field, err);
        Error::Validation(errors)
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        let (status, error_message) = match self {
            Error::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            Error::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Error::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            Error::InvalidState(msg) => (StatusCode::CONFLICT, msg),
            Error::Config(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An unexpected error occurred".to_string(),
            ),
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_error_kind() {
        let cases = [
            (Error::invalid_state("busy"), StatusCode::CONFLICT),
            (
                Error::invalid_field("role", "required", "Role is required"),
                StatusCode::BAD_REQUEST,
            ),
            (Error::Unauthorized("bad token".to_string()), StatusCode::UNAUTHORIZED),
            (Error::NotFound("gone".to_string()), StatusCode::NOT_FOUND),
            (
                Error::Config("SECRET_KEY=hunter2".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }

    #[tokio::test]
    async fn config_errors_hide_their_details() {
        let resp = Error::Config("SECRET_KEY=hunter2".to_string()).into_response();
        let bytes = axum::body::to_bytes(resp.into_body(), 1024).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "An unexpected error occurred");
    }
}
