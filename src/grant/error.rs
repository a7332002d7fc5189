use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::warn;

/// Request-level failures of the token endpoint. Each one maps to a JSON
/// error body; none of them is fatal to the service.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GrantError {
    #[error("client authentication failed")]
    InvalidClient { realm: String },

    #[error("unsupported grant type: {grant_type:?}")]
    UnsupportedGrantType { grant_type: Option<String> },

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: &'static str,
    pub error_description: &'static str,
}

impl GrantError {
    /// OAuth2 error code.
    pub fn code(&self) -> &'static str {
        match self {
            GrantError::InvalidClient { .. } => "invalid_client",
            GrantError::UnsupportedGrantType { .. } => "unsupported_grant_type",
            GrantError::InvalidRequest(_) => "invalid_request",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            GrantError::InvalidClient { .. } => StatusCode::UNAUTHORIZED,
            GrantError::UnsupportedGrantType { .. } | GrantError::InvalidRequest(_) => {
                StatusCode::BAD_REQUEST
            }
        }
    }

    pub fn body(&self) -> ErrorBody {
        let error_description = match self {
            GrantError::InvalidClient { .. } => "Client authentication failed",
            GrantError::UnsupportedGrantType { .. } => "The authorization grant type is not supported",
            GrantError::InvalidRequest(_) => "Invalid request format",
        };
        ErrorBody {
            error: self.code(),
            error_description,
        }
    }

    /// `WWW-Authenticate` challenge, only for client authentication failures.
    pub fn challenge(&self) -> Option<String> {
        match self {
            GrantError::InvalidClient { realm } => Some(format!("Basic realm=\"{}\"", realm)),
            _ => None,
        }
    }
}

impl IntoResponse for GrantError {
    fn into_response(self) -> Response {
        let mut response = (self.status(), Json(self.body())).into_response();
        if let Some(challenge) = self.challenge() {
            match HeaderValue::from_str(&challenge) {
                Ok(value) => {
                    response.headers_mut().insert(header::WWW_AUTHENTICATE, value);
                }
                Err(e) => warn!("cannot send challenge {:?}: {}", challenge, e),
            }
        }
        response
    }
}
