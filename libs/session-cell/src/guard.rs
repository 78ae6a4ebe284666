use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};

use shared_models::error::AppError;

use crate::services::session::SessionService;

/// Gate for the administrator surface. The process session must be ready and
/// must be the administrator; everyone else gets a 401.
pub async fn require_admin(
    State(session): State<Arc<SessionService>>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let snapshot = session.snapshot();

    if !snapshot.ready {
        return Err(AppError::Auth("Session is not ready".to_string()));
    }

    if !snapshot.is_admin {
        return Err(AppError::Auth("Administrator session required".to_string()));
    }

    Ok(next.run(request).await)
}
