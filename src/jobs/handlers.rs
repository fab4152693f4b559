use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use tracing::{info, instrument};

use crate::auth::extractors::CurrentUser;
use crate::auth::guard;
use crate::domain::Job;
use crate::error::ApiError;
use crate::jobs::dto::{AutocompleteQuery, JobPayload, Pagination, SearchQuery, ShowJob};
use crate::jobs::repo;
use crate::state::AppState;

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/jobs", get(list_jobs))
        .route("/jobs/search", get(search_jobs))
        .route("/jobs/autocomplete", get(autocomplete))
        .route("/jobs/:id", get(get_job))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/jobs", post(create_job))
        .route("/jobs/mine", get(my_jobs))
        .route("/jobs/:id", put(update_job))
        .route("/jobs/:id", delete(delete_job))
}

#[instrument(skip_all)]
pub async fn create_job(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<JobPayload>,
) -> Result<(StatusCode, Json<ShowJob>), ApiError> {
    let job = repo::create(&state.db, &payload, user.id).await?;
    info!(job_id = job.id, owner_id = user.id, "job created");
    Ok((StatusCode::CREATED, Json(Job::from(job).into())))
}

#[instrument(skip(state))]
pub async fn get_job(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ShowJob>, ApiError> {
    let job = repo::find_by_id(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("job"))?;
    Ok(Json(Job::from(job).into()))
}

#[instrument(skip(state))]
pub async fn list_jobs(
    State(state): State<AppState>,
    Query(p): Query<Pagination>,
) -> Result<Json<Vec<ShowJob>>, ApiError> {
    let jobs = repo::list(&state.db, p.limit, p.offset).await?;
    Ok(Json(jobs.into_iter().map(|j| Job::from(j).into()).collect()))
}

#[instrument(skip_all)]
pub async fn my_jobs(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(p): Query<Pagination>,
) -> Result<Json<Vec<ShowJob>>, ApiError> {
    let jobs = repo::list_by_owner(&state.db, user.id, p.limit, p.offset).await?;
    Ok(Json(jobs.into_iter().map(|j| Job::from(j).into()).collect()))
}

/// Existence is checked before the ownership decision: an absent job is 404
/// even for a request that would also have been denied.
#[instrument(skip_all)]
pub async fn update_job(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<JobPayload>,
) -> Result<Json<ShowJob>, ApiError> {
    let existing = repo::find_by_id(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("job"))?;
    guard::require_can_mutate(&user, &existing.into())?;

    let job = repo::update(&state.db, id, &payload).await?;
    info!(job_id = id, actor_id = user.id, "job updated");
    Ok(Json(Job::from(job).into()))
}

#[instrument(skip_all)]
pub async fn delete_job(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let existing = repo::find_by_id(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("job"))?;
    guard::require_can_mutate(&user, &existing.into())?;

    repo::delete(&state.db, id).await?;
    info!(job_id = id, actor_id = user.id, "job deleted");
    Ok(Json(serde_json::json!({ "detail": "Successfully deleted." })))
}

#[instrument(skip(state))]
pub async fn search_jobs(
    State(state): State<AppState>,
    Query(q): Query<SearchQuery>,
) -> Result<Json<Vec<ShowJob>>, ApiError> {
    let jobs = repo::search_by_title(&state.db, &q.q).await?;
    Ok(Json(jobs.into_iter().map(|j| Job::from(j).into()).collect()))
}

#[instrument(skip(state))]
pub async fn autocomplete(
    State(state): State<AppState>,
    Query(q): Query<AutocompleteQuery>,
) -> Result<Json<Vec<String>>, ApiError> {
    let titles = repo::search_titles(&state.db, &q.term).await?;
    Ok(Json(titles))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn show_job_serializes_date_and_owner() {
        let job = Job {
            id: 7,
            title: "Backend Engineer".into(),
            company: "Acme".into(),
            company_url: Some("https://acme.example".into()),
            location: "Remote".into(),
            description: "Build things".into(),
            date_posted: date!(2024 - 01 - 15),
            is_active: true,
            owner_id: 3,
        };
        let json = serde_json::to_string(&ShowJob::from(job)).unwrap();
        assert!(json.contains("\"owner_id\":3"));
        assert!(json.contains("2024-01-15"));
    }

    #[test]
    fn payload_has_no_owner_field() {
        // A client cannot smuggle an owner id in through the payload.
        let raw = r#"{
            "title": "Backend Engineer",
            "company": "Acme",
            "location": "Remote",
            "description": "Build things",
            "owner_id": 999
        }"#;
        let payload: JobPayload = serde_json::from_str(raw).unwrap();
        assert_eq!(payload.title, "Backend Engineer");
        assert!(payload.date_posted.is_none());
    }
}
