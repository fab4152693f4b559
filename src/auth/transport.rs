//! Pure parsing of the credential cookie. No I/O and no clock: everything
//! here is a function of the header string.

use crate::error::AuthError;

/// Cookie carrying the signed token.
pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

/// Transport scheme tag expected in front of the raw token. Case-sensitive.
pub const SCHEME: &str = "Bearer";

/// Picks a single cookie value out of a `Cookie:` header.
pub fn find_cookie<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header.split(';').map(str::trim).find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        (key == name).then_some(value)
    })
}

/// Extracts the raw token from a cookie value of the form `"Bearer <token>"`.
pub fn token_from_cookie(cookie_value: Option<&str>) -> Result<&str, AuthError> {
    let value = cookie_value.ok_or(AuthError::MissingCredential)?;
    let (scheme, token) = value
        .split_once(' ')
        .ok_or(AuthError::MalformedCredential)?;
    if scheme != SCHEME || token.is_empty() {
        return Err(AuthError::MalformedCredential);
    }
    Ok(token)
}
