use axum::{
    extract::{FromRef, State},
    http::{header::SET_COOKIE, HeaderMap},
    routing::{get, post},
    Json, Router,
};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, instrument, warn};

use crate::auth::dto::{AuthResponse, LoginRequest, PublicUser, RegisterRequest};
use crate::auth::extractors::CurrentUser;
use crate::auth::password::{hash_password, verify_password};
use crate::auth::token::TokenKeys;
use crate::auth::transport::{ACCESS_TOKEN_COOKIE, SCHEME};
use crate::auth::repo;
use crate::error::ApiError;
use crate::state::AppState;

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me))
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

fn auth_cookie(token: &str, max_age_secs: u64) -> HeaderMap {
    let mut headers = HeaderMap::new();
    let cookie = format!(
        "{ACCESS_TOKEN_COOKIE}={SCHEME} {token}; HttpOnly; SameSite=Lax; Path=/; Max-Age={max_age_secs}"
    );
    headers.insert(SET_COOKIE, cookie.parse().expect("cookie header value"));
    headers
}

fn clear_auth_cookie() -> HeaderMap {
    let mut headers = HeaderMap::new();
    let cookie = format!("{ACCESS_TOKEN_COOKIE}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0");
    headers.insert(SET_COOKIE, cookie.parse().expect("cookie header value"));
    headers
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(mut payload): Json<RegisterRequest>,
) -> Result<(HeaderMap, Json<AuthResponse>), ApiError> {
    payload.email = payload.email.trim().to_lowercase();
    payload.username = payload.username.trim().to_string();

    if payload.username.is_empty() {
        return Err(ApiError::Validation("Username is required".into()));
    }
    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(ApiError::Validation("Invalid email".into()));
    }
    if payload.password.len() < 8 {
        warn!("password too short");
        return Err(ApiError::Validation("Password too short".into()));
    }

    if repo::find_by_email(&state.db, &payload.email).await?.is_some() {
        warn!(email = %payload.email, "email already registered");
        return Err(ApiError::Conflict("Email already registered".into()));
    }
    if repo::find_by_username(&state.db, &payload.username).await?.is_some() {
        warn!(username = %payload.username, "username already taken");
        return Err(ApiError::Conflict("Username already taken".into()));
    }

    let hash = hash_password(&payload.password)?;
    let user = repo::create(&state.db, &payload.username, &payload.email, &hash).await?;

    let keys = TokenKeys::from_ref(&state);
    let access_token = keys.issue(&user.email)?;

    info!(user_id = user.id, email = %user.email, "user registered");
    let headers = auth_cookie(
        &access_token,
        (state.config.auth.access_ttl_minutes as u64) * 60,
    );
    Ok((
        headers,
        Json(AuthResponse {
            access_token,
            user: crate::domain::User::from(user).into(),
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(mut payload): Json<LoginRequest>,
) -> Result<(HeaderMap, Json<AuthResponse>), ApiError> {
    payload.email = payload.email.trim().to_lowercase();

    // Unknown email and wrong password are indistinguishable to the caller.
    let user = repo::find_by_email(&state.db, &payload.email)
        .await?
        .ok_or_else(|| {
            warn!(email = %payload.email, "login unknown email");
            ApiError::InvalidCredentials
        })?;

    let ok = verify_password(&payload.password, &user.hashed_password)?;
    if !ok {
        warn!(email = %payload.email, user_id = user.id, "login invalid password");
        return Err(ApiError::InvalidCredentials);
    }
    if !user.is_active {
        warn!(user_id = user.id, "login inactive user");
        return Err(ApiError::InvalidCredentials);
    }

    let keys = TokenKeys::from_ref(&state);
    let access_token = keys.issue(&user.email)?;

    info!(user_id = user.id, email = %user.email, "user logged in");
    let headers = auth_cookie(
        &access_token,
        (state.config.auth.access_ttl_minutes as u64) * 60,
    );
    Ok((
        headers,
        Json(AuthResponse {
            access_token,
            user: crate::domain::User::from(user).into(),
        }),
    ))
}

/// Clears the cookie client-side. Tokens are stateless, so a copy of the
/// token kept elsewhere stays valid until its embedded expiry.
#[instrument]
pub async fn logout() -> (HeaderMap, Json<serde_json::Value>) {
    (
        clear_auth_cookie(),
        Json(serde_json::json!({ "detail": "Logged out" })),
    )
}

#[instrument(skip_all)]
pub async fn get_me(CurrentUser(user): CurrentUser) -> Json<PublicUser> {
    Json(user.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_validation_accepts_plain_addresses() {
        assert!(is_valid_email("alice@example.com"));
        assert!(!is_valid_email("alice"));
        assert!(!is_valid_email("alice@nodot"));
        assert!(!is_valid_email("a b@example.com"));
    }

    #[test]
    fn auth_cookie_carries_scheme_and_token() {
        let headers = auth_cookie("abc.def.ghi", 1800);
        let value = headers.get(SET_COOKIE).expect("set-cookie").to_str().unwrap();
        assert!(value.starts_with("access_token=Bearer abc.def.ghi;"));
        assert!(value.contains("HttpOnly"));
        assert!(value.contains("Max-Age=1800"));
    }

    #[test]
    fn clear_cookie_expires_immediately() {
        let headers = clear_auth_cookie();
        let value = headers.get(SET_COOKIE).expect("set-cookie").to_str().unwrap();
        assert!(value.contains("Max-Age=0"));
    }

    #[test]
    fn public_user_serialization_omits_hash() {
        let response = PublicUser {
            id: 1,
            username: "alice".into(),
            email: "alice@example.com".into(),
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("alice@example.com"));
        assert!(!json.contains("password"));
    }
}
