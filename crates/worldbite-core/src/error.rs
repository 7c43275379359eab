use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Build the failure envelope shared by every service:
/// `{"sucesso": false, "kind": "...", "erro": "..."}`.
pub fn error_response(status: StatusCode, kind: &str, message: &str) -> Response {
    let body = serde_json::json!({
        "sucesso": false,
        "kind": kind,
        "erro": message,
    });
    (status, axum::Json(body)).into_response()
}

/// Rejections produced before a request reaches workflow code.
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error("malformed request body: {0}")]
    MalformedBody(String),
    #[error("invalid request: {0}")]
    Invalid(String),
    #[error("missing credentials")]
    MissingCredentials,
}

impl RequestError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MalformedBody(_) => "MALFORMED_BODY",
            Self::Invalid(_) => "INVALID_INPUT",
            Self::MissingCredentials => "UNAUTHORIZED",
        }
    }
}

impl IntoResponse for RequestError {
    fn into_response(self) -> Response {
        let status = match self {
            Self::MalformedBody(_) | Self::Invalid(_) => StatusCode::BAD_REQUEST,
            Self::MissingCredentials => StatusCode::UNAUTHORIZED,
        };
        error_response(status, self.kind(), &self.to_string())
    }
}
