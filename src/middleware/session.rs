use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::error::Error;

pub const SESSION_HEADER: &str = "x-session-token";

/// Raw session token from the `x-session-token` header. The signature is
/// checked when the session is looked up.
#[derive(Debug, Clone)]
pub struct SessionToken(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for SessionToken
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(header) = parts.headers.get(SESSION_HEADER) else {
            return Err(Error::Unauthorized("missing_session_token".to_string()));
        };
        let Ok(token) = header.to_str() else {
            return Err(Error::Unauthorized("bad_session_token".to_string()));
        };
        let token = token.trim();
        if token.is_empty() {
            return Err(Error::Unauthorized("missing_session_token".to_string()));
        }
        Ok(SessionToken(token.to_string()))
    }
}
