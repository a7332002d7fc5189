use serde::Serialize;

use crate::authority::token::{IssuedToken, TokenStatus};
use crate::utils::constants::TOKEN_TYPE_BEARER;

/// Successful password grant.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_in: u64,
    pub scope: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

impl TokenResponse {
    pub fn new(token: IssuedToken, scope: String) -> Self {
        Self {
            expires_in: token.ttl().num_seconds().max(0) as u64,
            access_token: token.value,
            token_type: TOKEN_TYPE_BEARER,
            scope,
            refresh_token: token.refresh_token,
        }
    }
}

pub const INVALID_TOKEN_MESSAGE: &str = "Invalid or expired token";

/// Answer of the validation endpoint. Unknown and expired tokens look the same.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ValidationResponse {
    pub valid: bool,
    #[serde(rename = "userId", skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'static str>,
}

impl ValidationResponse {
    pub fn invalid() -> Self {
        Self {
            valid: false,
            user_id: None,
            expires_in: None,
            error: Some(INVALID_TOKEN_MESSAGE),
        }
    }
}

impl From<TokenStatus> for ValidationResponse {
    fn from(status: TokenStatus) -> Self {
        let expires_in = status.seconds_remaining();
        match status {
            TokenStatus::Valid { username, .. } => Self {
                valid: true,
                user_id: Some(username),
                expires_in,
                error: None,
            },
            TokenStatus::Invalid(_) => Self::invalid(),
        }
    }
}
