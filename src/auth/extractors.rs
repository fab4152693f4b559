use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use tracing::debug;

use crate::auth::token::TokenKeys;
use crate::auth::{repo, transport};
use crate::domain::User;
use crate::error::{ApiError, AuthError};
use crate::state::AppState;

/// Resolves the authenticated user from the request's `access_token` cookie.
///
/// Extraction, token validation, user lookup and the `is_active` check all
/// collapse into a single `Unauthenticated` rejection. The distinction is
/// logged at debug level but never surfaced, so a caller cannot probe which
/// stage rejected the credential.
pub struct CurrentUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let keys = TokenKeys::from_ref(state);
        let cookie_header = parts
            .headers
            .get(axum::http::header::COOKIE)
            .and_then(|v| v.to_str().ok());

        let subject = resolve_subject(cookie_header, &keys).map_err(|e| {
            debug!(error = %e, "credential rejected");
            ApiError::Unauthenticated
        })?;

        let record = repo::find_by_email(&state.db, &subject)
            .await
            .map_err(|e| {
                debug!(error = %e, "user lookup failed");
                ApiError::Unauthenticated
            })?
            .ok_or(ApiError::Unauthenticated)?;

        if !record.is_active {
            debug!(user_id = record.id, "inactive user rejected");
            return Err(ApiError::Unauthenticated);
        }

        Ok(CurrentUser(record.into()))
    }
}

/// The pure part of resolution: cookie header in, token subject out.
fn resolve_subject(cookie_header: Option<&str>, keys: &TokenKeys) -> Result<String, AuthError> {
    let raw = cookie_header.and_then(|h| transport::find_cookie(h, transport::ACCESS_TOKEN_COOKIE));
    let token = transport::token_from_cookie(raw)?;
    let claims = keys.validate(token)?;
    Ok(claims.sub)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AuthConfig;
    use jsonwebtoken::Algorithm;

    fn make_keys() -> TokenKeys {
        TokenKeys::from_config(&AuthConfig {
            secret: "test-secret".into(),
            algorithm: Algorithm::HS256,
            access_ttl_minutes: 5,
        })
    }

    #[test]
    fn resolves_subject_from_valid_cookie() {
        let keys = make_keys();
        let token = keys.issue("alice@example.com").expect("issue");
        let header = format!("access_token=Bearer {token}");
        let subject = resolve_subject(Some(&header), &keys).expect("resolve");
        assert_eq!(subject, "alice@example.com");
    }

    #[test]
    fn no_cookie_header_is_missing_credential() {
        let keys = make_keys();
        assert_eq!(
            resolve_subject(None, &keys).unwrap_err(),
            AuthError::MissingCredential
        );
    }

    #[test]
    fn unrelated_cookies_are_missing_credential() {
        let keys = make_keys();
        assert_eq!(
            resolve_subject(Some("theme=dark; lang=en"), &keys).unwrap_err(),
            AuthError::MissingCredential
        );
    }

    #[test]
    fn basic_scheme_is_malformed_credential() {
        let keys = make_keys();
        let token = keys.issue("alice@example.com").expect("issue");
        let header = format!("access_token=Basic {token}");
        assert_eq!(
            resolve_subject(Some(&header), &keys).unwrap_err(),
            AuthError::MalformedCredential
        );
    }

    #[test]
    fn tampered_token_fails_validation() {
        let keys = make_keys();
        let token = keys.issue("alice@example.com").expect("issue");
        let header = format!("access_token=Bearer {token}tampered");
        assert!(resolve_subject(Some(&header), &keys).is_err());
    }
}
