use tracing::{debug, info, warn};

use crate::authority::token_authority::TokenAuthority;
use crate::credentials::candidate::Userinfo;
use crate::credentials::extractor::{bearer_token, resolve};
use crate::grant::body::{BodyError, TokenRequestBody};
use crate::grant::error::GrantError;
use crate::grant::response::{TokenResponse, ValidationResponse};
use crate::registry::user_registry::UserRegistry;
use crate::utils::constants::GRANT_TYPE_PASSWORD;

/// Everything the token endpoint needs from one HTTP request.
#[derive(Debug)]
pub struct TokenRequest<'a> {
    pub userinfo: Option<Userinfo>,
    pub authorization: Option<&'a str>,
    pub body: Result<TokenRequestBody, BodyError>,
}

impl<'a> TokenRequest<'a> {
    pub fn new(
        userinfo: Option<Userinfo>,
        authorization: Option<&'a str>,
        body: Result<TokenRequestBody, BodyError>,
    ) -> Self {
        Self {
            userinfo,
            authorization,
            body,
        }
    }

    /// Request carrying only a grant type, credentials to be set by the caller.
    pub fn with_grant_type(grant_type: &str) -> Self {
        Self::new(
            None,
            None,
            Ok(TokenRequestBody {
                grant_type: Some(grant_type.to_owned()),
            }),
        )
    }
}

/// Runs one token request: resolve credentials, authenticate, check the
/// grant, mint. Every failure comes back as a [`GrantError`].
#[derive(Clone)]
pub struct GrantProcessor {
    registry: UserRegistry,
    authority: TokenAuthority,
    realm: String,
}

impl GrantProcessor {
    pub fn new(registry: UserRegistry, authority: TokenAuthority, realm: &str) -> Self {
        Self {
            registry,
            authority,
            realm: realm.to_owned(),
        }
    }

    pub fn authority(&self) -> &TokenAuthority {
        &self.authority
    }

    pub fn registry(&self) -> &UserRegistry {
        &self.registry
    }

    pub fn handle_token_request(&self, request: TokenRequest<'_>) -> Result<TokenResponse, GrantError> {
        let candidate = resolve(request.userinfo.as_ref(), request.authorization);
        if candidate.is_empty() {
            debug!("token request without credentials");
            return Err(self.invalid_client());
        }

        let user = self
            .registry
            .authenticate(&candidate.username, &candidate.password)
            .map_err(|e| {
                warn!(username = %candidate.username, "client authentication failed: {}", e);
                self.invalid_client()
            })?;

        let body = request.body.map_err(|e| {
            warn!(username = %user.username, "token request body rejected: {}", e);
            GrantError::InvalidRequest(e.to_string())
        })?;

        if body.grant_type.as_deref() != Some(GRANT_TYPE_PASSWORD) {
            warn!(username = %user.username, grant_type = ?body.grant_type, "unsupported grant type");
            return Err(GrantError::UnsupportedGrantType {
                grant_type: body.grant_type,
            });
        }

        let token = self.authority.issue(&user.username);
        info!(username = %user.username, scope = %user.scope(), "password grant succeeded");
        Ok(TokenResponse::new(token, user.scope()))
    }

    /// Validates `Authorization: Bearer <token>`. Anything else is invalid.
    pub fn handle_validation(&self, authorization: Option<&str>) -> ValidationResponse {
        match authorization.and_then(bearer_token) {
            Some(token) => self.authority.validate(token).into(),
            None => {
                debug!("validation request without bearer token");
                ValidationResponse::invalid()
            }
        }
    }

    fn invalid_client(&self) -> GrantError {
        GrantError::InvalidClient {
            realm: self.realm.to_owned(),
        }
    }
}
