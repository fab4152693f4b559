use anyhow::Context;
use jsonwebtoken::Algorithm;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    pub secret: String,
    pub algorithm: Algorithm,
    pub access_ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub auth: AuthConfig,
}

impl AppConfig {
    /// Reads configuration from the process environment once at startup.
    /// A missing SECRET_KEY is fatal: the service must never issue tokens
    /// signed with a default or empty secret.
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let secret = std::env::var("SECRET_KEY").context("SECRET_KEY must be set")?;
        if secret.is_empty() {
            anyhow::bail!("SECRET_KEY must not be empty");
        }
        let algorithm = std::env::var("TOKEN_ALGORITHM")
            .unwrap_or_else(|_| "HS256".into())
            .parse::<Algorithm>()
            .map_err(|_| anyhow::anyhow!("TOKEN_ALGORITHM is not a known algorithm"))?;
        let access_ttl_minutes = std::env::var("ACCESS_TOKEN_EXPIRE_MINUTES")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(30);
        Ok(Self {
            database_url,
            auth: AuthConfig {
                secret,
                algorithm,
                access_ttl_minutes,
            },
        })
    }
}
