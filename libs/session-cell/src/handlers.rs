use std::sync::Arc;

use axum::{extract::State, Json};
use serde_json::{json, Value};
use tracing::debug;

use shared_models::auth::SessionSnapshot;
use shared_models::error::AppError;

use crate::services::session::SessionService;

#[axum::debug_handler]
pub async fn get_session(State(session): State<Arc<SessionService>>) -> Json<SessionSnapshot> {
    Json(session.snapshot())
}

/// Re-run the sign-in sequence by hand, for deployments recovering from an
/// auth outage at startup.
#[axum::debug_handler]
pub async fn refresh_session(
    State(session): State<Arc<SessionService>>,
) -> Result<Json<Value>, AppError> {
    debug!("Refreshing session");

    let snapshot = session.refresh().await;

    if !snapshot.ready {
        return Err(AppError::Auth("Could not establish a session".to_string()));
    }

    Ok(Json(json!({
        "success": true,
        "session": snapshot
    })))
}
