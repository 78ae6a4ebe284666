use std::sync::Arc;

use axum::{
    Router,
    extract::State,
    routing::get,
    Json,
};
use serde_json::{json, Value};

use appointment_cell::handlers::BookingContext;
use appointment_cell::router::{admin_routes, client_routes};
use session_cell::router::session_routes;
use session_cell::SessionService;

pub fn create_router(booking: Arc<BookingContext>, session: Arc<SessionService>) -> Router {
    Router::new()
        .route("/", get(home_view))
        .with_state(Arc::clone(&session))
        .nest("/session", session_routes(Arc::clone(&session)))
        .nest("/client", client_routes(Arc::clone(&booking)))
        .nest("/admin", admin_routes(booking, session))
}

/// The home screen: the views this deployment can navigate to. The admin
/// view is offered only when the process session is the administrator.
async fn home_view(State(session): State<Arc<SessionService>>) -> Json<Value> {
    let snapshot = session.snapshot();

    let mut views = vec!["home", "client"];
    if snapshot.is_admin {
        views.push("admin");
    }

    Json(json!({
        "service": "Salon booking API is running!",
        "views": views,
        "session": snapshot
    }))
}
