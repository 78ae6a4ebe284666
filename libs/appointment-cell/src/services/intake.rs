use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info};

use session_cell::SessionService;
use shared_models::appointment::{AppointmentStatus, NewAppointment, CEDULA_SENTINEL};
use shared_store::StoreClient;
use shared_utils::time::parse_request_date;

use crate::models::{AppointmentError, IntakeForm, IntakeOutcome};

pub const REQUIRED_FIELDS_MESSAGE: &str = "Please complete the required fields";
pub const SUBMITTED_MESSAGE: &str =
    "Your appointment request has been received. We will contact you once it is confirmed.";

/// Accepts appointment requests from the public intake form. At most one
/// submission is in flight at a time; the guard releases when the store
/// call finishes either way.
pub struct IntakeService {
    store: Arc<StoreClient>,
    session: Arc<SessionService>,
    in_flight: Mutex<()>,
}

impl IntakeService {
    pub fn new(store: Arc<StoreClient>, session: Arc<SessionService>) -> Self {
        Self {
            store,
            session,
            in_flight: Mutex::new(()),
        }
    }

    /// A blank form with the requested date defaulted to today.
    pub fn fresh_form(&self) -> IntakeForm {
        IntakeForm::fresh()
    }

    /// Validate and submit one request. Name, phone and requested date are
    /// required; a blank cedula falls back to the sentinel. On success the
    /// caller gets the store-assigned id and a reset form.
    pub async fn submit(&self, form: IntakeForm) -> Result<IntakeOutcome, AppointmentError> {
        if form.name.trim().is_empty()
            || form.phone.trim().is_empty()
            || form.date_requested.trim().is_empty()
        {
            return Err(AppointmentError::ValidationError(
                REQUIRED_FIELDS_MESSAGE.to_string(),
            ));
        }

        let date_requested = parse_request_date(&form.date_requested)
            .map_err(AppointmentError::ValidationError)?;

        // Double submissions race here; the loser is rejected, not queued.
        let _guard = self
            .in_flight
            .try_lock()
            .map_err(|_| AppointmentError::SubmissionInFlight)?;

        let auth_token = self
            .session
            .auth_token()
            .await
            .ok_or(AppointmentError::NotSignedIn)?;

        let cedula = if form.cedula.trim().is_empty() {
            CEDULA_SENTINEL.to_string()
        } else {
            form.cedula.trim().to_string()
        };

        let input = NewAppointment {
            name: form.name.trim().to_string(),
            cedula,
            phone: form.phone.trim().to_string(),
            date_requested,
            status: AppointmentStatus::Pending,
            confirmation_date: None,
            confirmation_time: None,
            notes: String::new(),
        };

        debug!("Submitting appointment request for {}", input.name);

        let created = self
            .store
            .create_appointment(&input, &auth_token)
            .await
            .map_err(|e| AppointmentError::StoreError(e.to_string()))?;

        info!(appointment_id = %created.id, "Appointment request submitted");

        Ok(IntakeOutcome {
            appointment_id: created.id,
            message: SUBMITTED_MESSAGE.to_string(),
            form: IntakeForm::fresh(),
        })
    }
}
