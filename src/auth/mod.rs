use axum::Router;

use crate::state::AppState;

mod dto;
pub mod extractors;
pub mod guard;
pub mod handlers;
pub mod password;
pub mod repo;
pub mod token;
pub mod transport;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(handlers::auth_routes())
        .merge(handlers::me_routes())
}
