//! Ownership authorization for job mutations.
//!
//! Callers must confirm the job exists before asking for a decision: a
//! missing job is `NotFound`, never `Deny`. Denial is a distinct kind from
//! unauthenticated — by the time the guard runs, identity is established.

use crate::domain::{Job, User};
use crate::error::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

/// Allow iff the actor owns the job or is a superuser.
pub fn authorize_mutation(actor: &User, job: &Job) -> Decision {
    if actor.id == job.owner_id || actor.is_superuser {
        Decision::Allow
    } else {
        Decision::Deny
    }
}

/// Convenience for handlers: map `Deny` onto the error taxonomy.
pub fn require_can_mutate(actor: &User, job: &Job) -> Result<(), ApiError> {
    match authorize_mutation(actor, job) {
        Decision::Allow => Ok(()),
        Decision::Deny => Err(ApiError::PermissionDenied),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn user(id: i64, is_superuser: bool) -> User {
        User {
            id,
            username: format!("user{id}"),
            email: format!("user{id}@example.com"),
            is_active: true,
            is_superuser,
        }
    }

    fn job(id: i64, owner_id: i64) -> Job {
        Job {
            id,
            title: "Backend Engineer".into(),
            company: "Acme".into(),
            company_url: None,
            location: "Remote".into(),
            description: "Build things".into(),
            date_posted: date!(2024 - 01 - 15),
            is_active: true,
            owner_id,
        }
    }

    #[test]
    fn owner_may_mutate() {
        assert_eq!(authorize_mutation(&user(1, false), &job(7, 1)), Decision::Allow);
    }

    #[test]
    fn superuser_may_mutate_any_job() {
        assert_eq!(authorize_mutation(&user(2, true), &job(7, 1)), Decision::Allow);
    }

    #[test]
    fn other_users_are_denied() {
        assert_eq!(authorize_mutation(&user(2, false), &job(7, 1)), Decision::Deny);
    }

    #[test]
    fn denial_maps_to_permission_denied() {
        let err = require_can_mutate(&user(2, false), &job(7, 1)).unwrap_err();
        assert!(matches!(err, ApiError::PermissionDenied));
    }
}
