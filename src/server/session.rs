use super::api_error::ApiError;
use super::state::ServerState;
use crate::user::auth::AuthTokenValue;

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde_json::json;
use tracing::debug;

#[derive(Debug)]
pub struct Session {
    pub user_id: usize,
    pub token: String,
}

impl Session {
    /// Per-user routes only serve the logged-in user's own data.
    pub fn require_user(&self, user_id: usize) -> Result<(), ApiError> {
        if self.user_id == user_id {
            Ok(())
        } else {
            debug!(
                "Session for user {} tried to access user {}",
                self.user_id, user_id
            );
            Err(ApiError::Forbidden)
        }
    }
}

pub const COOKIE_SESSION_TOKEN_KEY: &str = "session_token";
pub const HEADER_SESSION_TOKEN_KEY: &str = "Authorization";

pub enum SessionExtractionError {
    Unauthenticated,
    InternalError,
}

impl IntoResponse for SessionExtractionError {
    fn into_response(self) -> Response {
        match self {
            SessionExtractionError::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "Authentication required" })),
            )
                .into_response(),
            SessionExtractionError::InternalError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Internal server error" })),
            )
                .into_response(),
        }
    }
}

async fn extract_session_token_from_cookies(
    parts: &mut Parts,
    ctx: &ServerState,
) -> Option<String> {
    // CookieJar extraction is infallible
    let jar = CookieJar::from_request_parts(parts, ctx).await.ok()?;
    jar.get(COOKIE_SESSION_TOKEN_KEY)
        .map(Cookie::value)
        .map(|s| s.to_string())
}

fn extract_session_token_from_headers(parts: &mut Parts) -> Option<String> {
    let raw = parts.headers.get(HEADER_SESSION_TOKEN_KEY)?.to_str().ok()?;
    let token = raw.strip_prefix("Bearer ").unwrap_or(raw).trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

async fn extract_session_from_request_parts(
    parts: &mut Parts,
    ctx: &ServerState,
) -> Result<Option<Session>, SessionExtractionError> {
    let token = match extract_session_token_from_cookies(parts, ctx)
        .await
        .or_else(|| extract_session_token_from_headers(parts))
    {
        None => {
            debug!("No token in cookies nor headers.");
            return Ok(None);
        }
        Some(x) => x,
    };

    match ctx.user_manager.get_auth_token(&AuthTokenValue(token)) {
        Ok(Some(auth_token)) => {
            debug!("Found auth token for user_id={}", auth_token.user_id);
            Ok(Some(Session {
                user_id: auth_token.user_id,
                token: auth_token.value.0,
            }))
        }
        Ok(None) => {
            debug!("Auth token not found in database");
            Ok(None)
        }
        Err(e) => {
            debug!("Failed to get auth token from database: {}", e);
            Err(SessionExtractionError::InternalError)
        }
    }
}

impl FromRequestParts<ServerState> for Session {
    type Rejection = SessionExtractionError;

    async fn from_request_parts(
        parts: &mut Parts,
        ctx: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        extract_session_from_request_parts(parts, ctx)
            .await?
            .ok_or(SessionExtractionError::Unauthenticated)
    }
}

impl FromRequestParts<ServerState> for Option<Session> {
    type Rejection = SessionExtractionError;

    async fn from_request_parts(
        parts: &mut Parts,
        ctx: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        extract_session_from_request_parts(parts, ctx).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with_header(value: &str) -> Parts {
        let (parts, _) = Request::builder()
            .header(HEADER_SESSION_TOKEN_KEY, value)
            .body(())
            .unwrap()
            .into_parts();
        parts
    }

    #[test]
    fn reads_raw_and_bearer_tokens() {
        let mut parts = parts_with_header("abc123");
        assert_eq!(
            extract_session_token_from_headers(&mut parts).as_deref(),
            Some("abc123")
        );
        let mut parts = parts_with_header("Bearer abc123");
        assert_eq!(
            extract_session_token_from_headers(&mut parts).as_deref(),
            Some("abc123")
        );
        let mut parts = parts_with_header("Bearer ");
        assert!(extract_session_token_from_headers(&mut parts).is_none());
    }

    #[test]
    fn require_user_matches_only_self() {
        let session = Session {
            user_id: 7,
            token: "t".to_string(),
        };
        assert!(session.require_user(7).is_ok());
        assert!(matches!(session.require_user(8), Err(ApiError::Forbidden)));
    }
}
