use std::sync::Arc;

use serde_json::json;
use tokio::sync::RwLock;
use tracing::info;

use session_cell::SessionService;
use shared_models::appointment::AppointmentStatus;
use shared_store::StoreClient;

use crate::models::{AppointmentError, ConfirmationDraft, DraftUpdate, ReviewSelection};
use crate::services::live_list::AppointmentHub;

pub const CONFIRMATION_FIELDS_MESSAGE: &str = "Confirmation date, time and cost are required";
pub const DEFAULT_REJECTION_NOTE: &str =
    "Requested date is unavailable. Please submit a new request.";

/// Admin review workflow. One appointment is under review at a time;
/// confirm and reject write the decision to the store and close the
/// selection, the mirrored list only changes when the next snapshot
/// arrives.
pub struct ReviewDesk {
    store: Arc<StoreClient>,
    session: Arc<SessionService>,
    hub: Arc<AppointmentHub>,
    selection: RwLock<Option<ReviewSelection>>,
}

impl ReviewDesk {
    pub fn new(
        store: Arc<StoreClient>,
        session: Arc<SessionService>,
        hub: Arc<AppointmentHub>,
    ) -> Self {
        Self {
            store,
            session,
            hub,
            selection: RwLock::new(None),
        }
    }

    /// Open the review dialog for one appointment, replacing any previous
    /// selection. The draft is prefilled from the record every time, so
    /// reopening discards unsaved edits.
    pub async fn open(&self, appointment_id: &str) -> Result<ReviewSelection, AppointmentError> {
        let record = self
            .hub
            .find(appointment_id)
            .await
            .ok_or(AppointmentError::NotFound)?;

        let selection = ReviewSelection {
            draft: ConfirmationDraft::prefill(&record),
            appointment: record,
        };

        *self.selection.write().await = Some(selection.clone());
        Ok(selection)
    }

    pub async fn current(&self) -> Option<ReviewSelection> {
        self.selection.read().await.clone()
    }

    /// Merge edits into the open draft. Nothing is written to the store
    /// until confirm or reject.
    pub async fn edit_draft(
        &self,
        update: DraftUpdate,
    ) -> Result<ConfirmationDraft, AppointmentError> {
        let mut guard = self.selection.write().await;
        let selection = guard.as_mut().ok_or(AppointmentError::NoSelection)?;
        selection.draft.apply(update);
        Ok(selection.draft.clone())
    }

    /// Confirm the selected appointment with the draft's date, time and
    /// cost. On a store failure the selection stays open so the admin can
    /// retry without losing the draft.
    pub async fn confirm(&self) -> Result<String, AppointmentError> {
        let (appointment_id, draft) = self.selected().await?;

        if !draft.is_complete() {
            return Err(AppointmentError::ValidationError(
                CONFIRMATION_FIELDS_MESSAGE.to_string(),
            ));
        }

        let cost = parse_cost(&draft.cost)?;

        let fields = json!({
            "status": AppointmentStatus::Confirmed,
            "confirmation_date": draft.confirmation_date.trim(),
            "confirmation_time": draft.confirmation_time.trim(),
            "cost": cost,
            "notes": draft.notes,
        });

        self.write_decision(&appointment_id, fields).await?;

        self.selection.write().await.take();
        info!(appointment_id = %appointment_id, cost = cost, "Appointment confirmed");

        Ok(appointment_id)
    }

    /// Reject the selected appointment, clearing any confirmation fields.
    /// An empty draft note falls back to the standard rejection note.
    pub async fn reject(&self) -> Result<String, AppointmentError> {
        let (appointment_id, draft) = self.selected().await?;

        let notes = if draft.notes.trim().is_empty() {
            DEFAULT_REJECTION_NOTE.to_string()
        } else {
            draft.notes.clone()
        };

        let fields = json!({
            "status": AppointmentStatus::Rejected,
            "confirmation_date": "",
            "confirmation_time": "",
            "cost": null,
            "notes": notes,
        });

        self.write_decision(&appointment_id, fields).await?;

        self.selection.write().await.take();
        info!(appointment_id = %appointment_id, "Appointment rejected");

        Ok(appointment_id)
    }

    /// Close the dialog without deciding. Returns whether a selection was
    /// actually open.
    pub async fn close(&self) -> bool {
        self.selection.write().await.take().is_some()
    }

    async fn selected(&self) -> Result<(String, ConfirmationDraft), AppointmentError> {
        let guard = self.selection.read().await;
        let selection = guard.as_ref().ok_or(AppointmentError::NoSelection)?;
        Ok((selection.appointment.id.clone(), selection.draft.clone()))
    }

    async fn write_decision(
        &self,
        appointment_id: &str,
        fields: serde_json::Value,
    ) -> Result<(), AppointmentError> {
        let auth_token = self
            .session
            .auth_token()
            .await
            .ok_or(AppointmentError::NotSignedIn)?;

        self.store
            .update_appointment(appointment_id, fields, &auth_token)
            .await
            .map_err(|e| AppointmentError::StoreError(e.to_string()))
    }
}

fn parse_cost(raw: &str) -> Result<f64, AppointmentError> {
    let trimmed = raw.trim();
    let cost: f64 = trimmed
        .parse()
        .map_err(|_| AppointmentError::InvalidCost(trimmed.to_string()))?;

    if !cost.is_finite() || cost < 0.0 {
        return Err(AppointmentError::InvalidCost(trimmed.to_string()));
    }

    Ok(cost)
}
