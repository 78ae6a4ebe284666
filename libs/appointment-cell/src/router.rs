// libs/appointment-cell/src/router.rs
use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post, put},
    middleware,
};

use session_cell::{require_admin, SessionService};

use crate::handlers;
use crate::handlers::BookingContext;

/// Public client surface: a fresh form and the submission endpoint.
pub fn client_routes(state: Arc<BookingContext>) -> Router {
    Router::new()
        .route("/form", get(handlers::get_intake_form))
        .route("/appointments", post(handlers::submit_intake))
        .with_state(state)
}

/// Admin surface. Every route is gated on the process session being the
/// administrator.
pub fn admin_routes(state: Arc<BookingContext>, session: Arc<SessionService>) -> Router {
    let protected_routes = Router::new()
        .route("/appointments", get(handlers::list_appointments))
        .route("/appointments/views", get(handlers::get_appointment_views))
        .route("/appointments/feed", get(handlers::get_feed_status))
        .route("/review", get(handlers::get_review).delete(handlers::close_review))
        .route("/review/{appointment_id}", post(handlers::open_review))
        .route("/review/draft", put(handlers::edit_review_draft))
        .route("/review/confirm", post(handlers::confirm_review))
        .route("/review/reject", post(handlers::reject_review))
        .route("/notifications", get(handlers::list_notifications))
        .layer(middleware::from_fn_with_state(session, require_admin));

    Router::new()
        .merge(protected_routes)
        .with_state(state)
}
