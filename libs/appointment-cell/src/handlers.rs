// libs/appointment-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use shared_models::appointment::AppointmentStatus;
use shared_models::error::AppError;

use crate::models::{AppointmentError, DraftUpdate, IntakeForm};
use crate::services::intake::IntakeService;
use crate::services::live_list::AppointmentHub;
use crate::services::notify::RecordingNotifier;
use crate::services::review::ReviewDesk;

// ==============================================================================
// SHARED STATE
// ==============================================================================

/// State behind the booking surface: the intake service for clients plus the
/// review desk, list hub and notifier for the administrator.
pub struct BookingContext {
    pub intake: IntakeService,
    pub review: ReviewDesk,
    pub hub: Arc<AppointmentHub>,
    pub notifier: Arc<RecordingNotifier>,
}

// ==============================================================================
// QUERY PARAMETER STRUCTS
// ==============================================================================

#[derive(Debug, Deserialize)]
pub struct AppointmentQueryParams {
    pub status: Option<AppointmentStatus>,
}

// ==============================================================================
// CLIENT INTAKE HANDLERS
// ==============================================================================

/// A fresh intake form with the requested date defaulted to today.
#[axum::debug_handler]
pub async fn get_intake_form(
    State(state): State<Arc<BookingContext>>,
) -> Result<Json<Value>, AppError> {
    let form = state.intake.fresh_form();

    Ok(Json(json!({
        "success": true,
        "form": form
    })))
}

/// Submit an appointment request from the public form.
#[axum::debug_handler]
pub async fn submit_intake(
    State(state): State<Arc<BookingContext>>,
    Json(form): Json<IntakeForm>,
) -> Result<Json<Value>, AppError> {
    let outcome = state.intake.submit(form).await.map_err(|e| match e {
        AppointmentError::ValidationError(message) => AppError::ValidationError(message),
        AppointmentError::SubmissionInFlight => {
            AppError::Conflict("A submission is already in progress".to_string())
        }
        AppointmentError::NotSignedIn => AppError::Auth("No active session".to_string()),
        AppointmentError::StoreError(message) => AppError::Store(message),
        _ => AppError::Internal(e.to_string()),
    })?;

    Ok(Json(json!({
        "success": true,
        "appointment_id": outcome.appointment_id,
        "message": outcome.message,
        "form": outcome.form
    })))
}

// ==============================================================================
// ADMIN LIST HANDLERS
// ==============================================================================

/// The mirrored appointment list, optionally filtered by status.
#[axum::debug_handler]
pub async fn list_appointments(
    State(state): State<Arc<BookingContext>>,
    Query(params): Query<AppointmentQueryParams>,
) -> Result<Json<Value>, AppError> {
    let appointments = match params.status {
        Some(status) => state.hub.by_status(status).await,
        None => state.hub.all().await,
    };

    Ok(Json(json!({
        "success": true,
        "total": appointments.len(),
        "appointments": appointments,
        "live": state.hub.is_live().await,
        "degraded": state.hub.is_degraded()
    })))
}

/// The list partitioned into pending, confirmed and rejected views.
#[axum::debug_handler]
pub async fn get_appointment_views(
    State(state): State<Arc<BookingContext>>,
) -> Result<Json<Value>, AppError> {
    let views = state.hub.views().await;

    Ok(Json(json!({
        "success": true,
        "total": views.total(),
        "views": views
    })))
}

/// Health of the live snapshot feed.
#[axum::debug_handler]
pub async fn get_feed_status(
    State(state): State<Arc<BookingContext>>,
) -> Result<Json<Value>, AppError> {
    Ok(Json(json!({
        "success": true,
        "live": state.hub.is_live().await,
        "degraded": state.hub.is_degraded(),
        "total": state.hub.all().await.len()
    })))
}

// ==============================================================================
// REVIEW HANDLERS
// ==============================================================================

/// Open the review dialog for one appointment from the mirrored list.
#[axum::debug_handler]
pub async fn open_review(
    State(state): State<Arc<BookingContext>>,
    Path(appointment_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let selection = state
        .review
        .open(&appointment_id)
        .await
        .map_err(|e| match e {
            AppointmentError::NotFound => AppError::NotFound("Appointment not found".to_string()),
            _ => AppError::Internal(e.to_string()),
        })?;

    Ok(Json(json!({
        "success": true,
        "selection": selection
    })))
}

/// The current selection and draft, if a review is open.
#[axum::debug_handler]
pub async fn get_review(
    State(state): State<Arc<BookingContext>>,
) -> Result<Json<Value>, AppError> {
    let selection = state.review.current().await;

    Ok(Json(json!({
        "success": true,
        "open": selection.is_some(),
        "selection": selection
    })))
}

/// Merge edits into the open draft. Nothing is written until confirm.
#[axum::debug_handler]
pub async fn edit_review_draft(
    State(state): State<Arc<BookingContext>>,
    Json(update): Json<DraftUpdate>,
) -> Result<Json<Value>, AppError> {
    let draft = state.review.edit_draft(update).await.map_err(|e| match e {
        AppointmentError::NoSelection => {
            AppError::BadRequest("No appointment is selected for review".to_string())
        }
        _ => AppError::Internal(e.to_string()),
    })?;

    Ok(Json(json!({
        "success": true,
        "draft": draft
    })))
}

/// Confirm the selected appointment with the draft's date, time and cost.
#[axum::debug_handler]
pub async fn confirm_review(
    State(state): State<Arc<BookingContext>>,
) -> Result<Json<Value>, AppError> {
    let appointment_id = state.review.confirm().await.map_err(|e| match e {
        AppointmentError::NoSelection => {
            AppError::BadRequest("No appointment is selected for review".to_string())
        }
        AppointmentError::ValidationError(message) => AppError::ValidationError(message),
        AppointmentError::InvalidCost(value) => {
            AppError::ValidationError(format!("Invalid cost: {}", value))
        }
        AppointmentError::NotSignedIn => AppError::Auth("No active session".to_string()),
        AppointmentError::StoreError(message) => AppError::Store(message),
        _ => AppError::Internal(e.to_string()),
    })?;

    Ok(Json(json!({
        "success": true,
        "appointment_id": appointment_id,
        "message": "Appointment confirmed"
    })))
}

/// Reject the selected appointment, clearing its confirmation fields.
#[axum::debug_handler]
pub async fn reject_review(
    State(state): State<Arc<BookingContext>>,
) -> Result<Json<Value>, AppError> {
    let appointment_id = state.review.reject().await.map_err(|e| match e {
        AppointmentError::NoSelection => {
            AppError::BadRequest("No appointment is selected for review".to_string())
        }
        AppointmentError::NotSignedIn => AppError::Auth("No active session".to_string()),
        AppointmentError::StoreError(message) => AppError::Store(message),
        _ => AppError::Internal(e.to_string()),
    })?;

    Ok(Json(json!({
        "success": true,
        "appointment_id": appointment_id,
        "message": "Appointment rejected"
    })))
}

/// Close the dialog without writing a decision.
#[axum::debug_handler]
pub async fn close_review(
    State(state): State<Arc<BookingContext>>,
) -> Result<Json<Value>, AppError> {
    let was_open = state.review.close().await;

    Ok(Json(json!({
        "success": true,
        "was_open": was_open
    })))
}

// ==============================================================================
// NOTIFICATION HANDLERS
// ==============================================================================

/// Recently raised local notifications, newest first.
#[axum::debug_handler]
pub async fn list_notifications(
    State(state): State<Arc<BookingContext>>,
) -> Result<Json<Value>, AppError> {
    let notifications = state.notifier.recent().await;

    Ok(Json(json!({
        "success": true,
        "total": notifications.len(),
        "notifications": notifications
    })))
}
