use serde::{Deserialize, Serialize};
use time::Date;

use crate::domain::Job;

/// Client-supplied job fields. Deliberately has no owner field: the owner id
/// always comes from the resolved identity, passed to the repo separately.
#[derive(Debug, Clone, Deserialize)]
pub struct JobPayload {
    pub title: String,
    pub company: String,
    pub company_url: Option<String>,
    pub location: String,
    pub description: String,
    pub date_posted: Option<Date>,
}

#[derive(Debug, Serialize)]
pub struct ShowJob {
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

impl From<Job> for ShowJob {
    fn from(j: Job) -> Self {
        ShowJob {
            id: j.id,
            title: j.title,
            company: j.company,
            company_url: j.company_url,
            location: j.location,
            description: j.description,
            date_posted: j.date_posted,
            is_active: j.is_active,
            owner_id: j.owner_id,
        }
    }
}

fn default_limit() -> i64 {
    50
}

#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Deserialize)]
pub struct AutocompleteQuery {
    #[serde(default)]
    pub term: String,
}
