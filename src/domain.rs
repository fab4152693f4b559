//! Plain domain entities consumed by the authorization core. These carry no
//! storage wiring: the guard and the resolver only need ids and flags as
//! values, so the persisted-record shapes stay in the repo layer and convert
//! into these.

use time::Date;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub is_active: bool,
    pub is_superuser: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
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
