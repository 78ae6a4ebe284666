use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};

use crate::handlers;
use crate::services::session::SessionService;

pub fn session_routes(session: Arc<SessionService>) -> Router {
    Router::new()
        .route("/", get(handlers::get_session))
        .route("/refresh", post(handlers::refresh_session))
        .with_state(session)
}
