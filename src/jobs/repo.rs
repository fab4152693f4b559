use sqlx::{FromRow, PgPool};
use time::{Date, OffsetDateTime};

use crate::domain::Job;
use crate::jobs::dto::JobPayload;

#[derive(Debug, Clone, FromRow)]
pub struct JobRecord {
    pub id: i64,
    pub title: String,
    pub company: String,
    pub company_url: Option<String>,
    pub location: String,
    pub description: String,
    pub date_posted: Date,
    pub is_active: bool,
    pub owner_id: i64,
}

impl From<JobRecord> for Job {
    fn from(r: JobRecord) -> Self {
        Job {
            id: r.id,
            title: r.title,
            company: r.company,
            company_url: r.company_url,
            location: r.location,
            description: r.description,
            date_posted: r.date_posted,
            is_active: r.is_active,
            owner_id: r.owner_id,
        }
    }
}

const JOB_COLUMNS: &str =
    "id, title, company, company_url, location, description, date_posted, is_active, owner_id";

/// Create a job owned by `owner_id`. The owner comes in as its own typed
/// argument, never merged into the payload.
pub async fn create(db: &PgPool, payload: &JobPayload, owner_id: i64) -> anyhow::Result<JobRecord> {
    let date_posted = payload
        .date_posted
        .unwrap_or_else(|| OffsetDateTime::now_utc().date());
    let job = sqlx::query_as::<_, JobRecord>(&format!(
        r#"
        INSERT INTO jobs (title, company, company_url, location, description, date_posted, is_active, owner_id)
        VALUES ($1, $2, $3, $4, $5, $6, TRUE, $7)
        RETURNING {JOB_COLUMNS}
        "#
    ))
    .bind(&payload.title)
    .bind(&payload.company)
    .bind(&payload.company_url)
    .bind(&payload.location)
    .bind(&payload.description)
    .bind(date_posted)
    .bind(owner_id)
    .fetch_one(db)
    .await?;
    Ok(job)
}

pub async fn find_by_id(db: &PgPool, id: i64) -> anyhow::Result<Option<JobRecord>> {
    let job = sqlx::query_as::<_, JobRecord>(&format!(
        "SELECT {JOB_COLUMNS} FROM jobs WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(job)
}

pub async fn list(db: &PgPool, limit: i64, offset: i64) -> anyhow::Result<Vec<JobRecord>> {
    let rows = sqlx::query_as::<_, JobRecord>(&format!(
        "SELECT {JOB_COLUMNS} FROM jobs ORDER BY date_posted DESC, id DESC LIMIT $1 OFFSET $2"
    ))
    .bind(limit)
    .bind(offset)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn list_by_owner(
    db: &PgPool,
    owner_id: i64,
    limit: i64,
    offset: i64,
) -> anyhow::Result<Vec<JobRecord>> {
    let rows = sqlx::query_as::<_, JobRecord>(&format!(
        r#"
        SELECT {JOB_COLUMNS} FROM jobs
        WHERE owner_id = $1
        ORDER BY date_posted DESC, id DESC
        LIMIT $2 OFFSET $3
        "#
    ))
    .bind(owner_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

/// Overwrite a job's fields. `owner_id` is fixed at creation and never
/// touched here; ownership transfer is not supported.
pub async fn update(db: &PgPool, id: i64, payload: &JobPayload) -> anyhow::Result<JobRecord> {
    let date_posted = payload
        .date_posted
        .unwrap_or_else(|| OffsetDateTime::now_utc().date());
    let job = sqlx::query_as::<_, JobRecord>(&format!(
        r#"
        UPDATE jobs
        SET title = $2, company = $3, company_url = $4, location = $5,
            description = $6, date_posted = $7
        WHERE id = $1
        RETURNING {JOB_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(&payload.title)
    .bind(&payload.company)
    .bind(&payload.company_url)
    .bind(&payload.location)
    .bind(&payload.description)
    .bind(date_posted)
    .fetch_one(db)
    .await?;
    Ok(job)
}

/// Hard removal, no tombstone.
pub async fn delete(db: &PgPool, id: i64) -> anyhow::Result<u64> {
    let result = sqlx::query("DELETE FROM jobs WHERE id = $1")
        .bind(id)
        .execute(db)
        .await?;
    Ok(result.rows_affected())
}

/// Substring match over titles.
pub async fn search_by_title(db: &PgPool, query: &str) -> anyhow::Result<Vec<JobRecord>> {
    let rows = sqlx::query_as::<_, JobRecord>(&format!(
        r#"
        SELECT {JOB_COLUMNS} FROM jobs
        WHERE title ILIKE '%' || $1 || '%'
        ORDER BY date_posted DESC, id DESC
        "#
    ))
    .bind(query)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

/// Matching titles only, for the autocomplete endpoint.
pub async fn search_titles(db: &PgPool, query: &str) -> anyhow::Result<Vec<String>> {
    let rows: Vec<(String,)> = sqlx::query_as(
        "SELECT title FROM jobs WHERE title ILIKE '%' || $1 || '%' ORDER BY title",
    )
    .bind(query)
    .fetch_all(db)
    .await?;
    Ok(rows.into_iter().map(|(t,)| t).collect())
}
