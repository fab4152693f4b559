use sqlx::{FromRow, PgPool};

use crate::domain::User;

/// Persisted shape of a user row. Only this layer sees it; callers get the
/// plain [`User`] plus the hash where they need it.
#[derive(Debug, Clone, FromRow)]
pub struct UserRecord {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub hashed_password: String,
    pub is_active: bool,
    pub is_superuser: bool,
}

impl From<UserRecord> for User {
    fn from(r: UserRecord) -> Self {
        User {
            id: r.id,
            username: r.username,
            email: r.email,
            is_active: r.is_active,
            is_superuser: r.is_superuser,
        }
    }
}

/// Find a user by email. Email doubles as the token subject.
pub async fn find_by_email(db: &PgPool, email: &str) -> anyhow::Result<Option<UserRecord>> {
    let user = sqlx::query_as::<_, UserRecord>(
        r#"
        SELECT id, username, email, hashed_password, is_active, is_superuser
        FROM users
        WHERE email = $1
        "#,
    )
    .bind(email)
    .fetch_optional(db)
    .await?;
    Ok(user)
}

pub async fn find_by_username(db: &PgPool, username: &str) -> anyhow::Result<Option<UserRecord>> {
    let user = sqlx::query_as::<_, UserRecord>(
        r#"
        SELECT id, username, email, hashed_password, is_active, is_superuser
        FROM users
        WHERE username = $1
        "#,
    )
    .bind(username)
    .fetch_optional(db)
    .await?;
    Ok(user)
}

/// Create a new user. New users are active and never superusers; the
/// superuser flag is only ever set out of band.
pub async fn create(
    db: &PgPool,
    username: &str,
    email: &str,
    hashed_password: &str,
) -> anyhow::Result<UserRecord> {
    let user = sqlx::query_as::<_, UserRecord>(
        r#"
        INSERT INTO users (username, email, hashed_password, is_active, is_superuser)
        VALUES ($1, $2, $3, TRUE, FALSE)
        RETURNING id, username, email, hashed_password, is_active, is_superuser
        "#,
    )
    .bind(username)
    .bind(email)
    .bind(hashed_password)
    .fetch_one(db)
    .await?;
    Ok(user)
}
