use std::time::Duration;

use axum::extract::FromRef;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::debug;

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::state::AppState;

/// Payload embedded in every issued token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user email
    pub iat: usize,
    pub exp: usize,
}

/// Signing and verification material, built once from configuration and
/// passed by reference. Validation never reads ambient environment state,
/// so tests run with injected secrets.
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    algorithm: Algorithm,
    access_ttl: Duration,
}

impl FromRef<AppState> for TokenKeys {
    fn from_ref(state: &AppState) -> Self {
        Self::from_config(&state.config.auth)
    }
}

impl TokenKeys {
    pub fn from_config(cfg: &AuthConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(cfg.secret.as_bytes()),
            decoding: DecodingKey::from_secret(cfg.secret.as_bytes()),
            algorithm: cfg.algorithm,
            access_ttl: Duration::from_secs((cfg.access_ttl_minutes as u64) * 60),
        }
    }

    /// Issues a signed token for `subject`, valid for the configured TTL.
    /// Tokens are stateless: there is no revocation list, so a token issued
    /// before logout stays valid until its natural expiry.
    pub fn issue(&self, subject: &str) -> anyhow::Result<String> {
        let now = OffsetDateTime::now_utc();
        let exp = now + TimeDuration::seconds(self.access_ttl.as_secs() as i64);
        let claims = Claims {
            sub: subject.to_owned(),
            iat: now.unix_timestamp() as usize,
            exp: exp.unix_timestamp() as usize,
        };
        let token = encode(&Header::new(self.algorithm), &claims, &self.encoding)?;
        debug!(subject = %subject, "token issued");
        Ok(token)
    }

    /// Validates a presented token and returns its claims. The subject is
    /// only ever taken from a token whose signature checked out.
    pub fn validate(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 0;
        let data = decode::<Claims>(token, &self.decoding, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::Expired,
                ErrorKind::InvalidSignature
                | ErrorKind::InvalidAlgorithm
                | ErrorKind::InvalidAlgorithmName => AuthError::InvalidSignature,
                _ => AuthError::MalformedToken,
            }
        })?;
        debug!(subject = %data.claims.sub, "token verified");
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_keys(secret: &str) -> TokenKeys {
        TokenKeys::from_config(&AuthConfig {
            secret: secret.into(),
            algorithm: Algorithm::HS256,
            access_ttl_minutes: 30,
        })
    }

    #[test]
    fn issue_and_validate_roundtrip() {
        let keys = make_keys("dev-secret");
        let token = keys.issue("alice@example.com").expect("issue");
        let claims = keys.validate(&token).expect("validate");
        assert_eq!(claims.sub, "alice@example.com");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn validate_rejects_expired_token() {
        let keys = make_keys("dev-secret");
        let now = OffsetDateTime::now_utc().unix_timestamp() as usize;
        let stale = Claims {
            sub: "alice@example.com".into(),
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = encode(&Header::new(Algorithm::HS256), &stale, &keys.encoding)
            .expect("encode stale token");
        assert_eq!(keys.validate(&token).unwrap_err(), AuthError::Expired);
    }

    #[test]
    fn validate_rejects_swapped_signature() {
        let keys = make_keys("dev-secret");
        let a = keys.issue("alice@example.com").expect("issue");
        let b = keys.issue("mallory@example.com").expect("issue");
        let a_body = a.rsplit_once('.').expect("three segments").0;
        let b_sig = b.rsplit_once('.').expect("three segments").1;
        let forged = format!("{a_body}.{b_sig}");
        assert_eq!(
            keys.validate(&forged).unwrap_err(),
            AuthError::InvalidSignature
        );
    }

    #[test]
    fn validate_rejects_wrong_secret() {
        let keys = make_keys("dev-secret");
        let other = make_keys("another-secret");
        let token = keys.issue("alice@example.com").expect("issue");
        assert_eq!(other.validate(&token).unwrap_err(), AuthError::InvalidSignature);
    }

    #[test]
    fn validate_rejects_garbage() {
        let keys = make_keys("dev-secret");
        assert_eq!(
            keys.validate("not-a-token").unwrap_err(),
            AuthError::MalformedToken
        );
        assert_eq!(keys.validate("").unwrap_err(), AuthError::MalformedToken);
    }
}
