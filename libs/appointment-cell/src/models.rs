// libs/appointment-cell/src/models.rs
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};

use shared_models::appointment::{AppointmentRecord, AppointmentStatus};
use shared_utils::time::today_string;

// ==============================================================================
// INTAKE MODELS
// ==============================================================================

/// The public intake form. The requested date travels as a `YYYY-MM-DD`
/// string and is validated on submission, not while typing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntakeForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub cedula: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub date_requested: String,
}

impl IntakeForm {
    /// A blank form with the requested date defaulted to today.
    pub fn fresh() -> Self {
        Self {
            name: String::new(),
            cedula: String::new(),
            phone: String::new(),
            date_requested: today_string(),
        }
    }
}

/// Returned to the client after a successful submission: the confirmation
/// message plus a reset form for the next request.
#[derive(Debug, Clone, Serialize)]
pub struct IntakeOutcome {
    pub appointment_id: String,
    pub message: String,
    pub form: IntakeForm,
}

// ==============================================================================
// REVIEW MODELS
// ==============================================================================

/// Editable confirmation fields. Everything stays a string while under edit;
/// validation happens when the admin confirms.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ConfirmationDraft {
    #[serde(default)]
    pub confirmation_date: String,
    #[serde(default)]
    pub confirmation_time: String,
    #[serde(default)]
    pub cost: String,
    #[serde(default)]
    pub notes: String,
}

impl ConfirmationDraft {
    /// Prefill from the record under review: existing confirmation details
    /// when the record was decided before, otherwise the requested date as
    /// the starting point.
    pub fn prefill(record: &AppointmentRecord) -> Self {
        if record.has_confirmation() {
            Self {
                confirmation_date: record.confirmation_date.clone().unwrap_or_default(),
                confirmation_time: record.confirmation_time.clone().unwrap_or_default(),
                cost: format_cost(record.cost),
                notes: record.notes.clone(),
            }
        } else {
            Self {
                confirmation_date: record.date_requested.to_string(),
                confirmation_time: String::new(),
                cost: String::new(),
                notes: record.notes.clone(),
            }
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.confirmation_date.trim().is_empty()
            && !self.confirmation_time.trim().is_empty()
            && !self.cost.trim().is_empty()
    }

    /// Merge a partial edit; absent fields keep their value.
    pub fn apply(&mut self, update: DraftUpdate) {
        if let Some(confirmation_date) = update.confirmation_date {
            self.confirmation_date = confirmation_date;
        }
        if let Some(confirmation_time) = update.confirmation_time {
            self.confirmation_time = confirmation_time;
        }
        if let Some(cost) = update.cost {
            self.cost = cost;
        }
        if let Some(notes) = update.notes {
            self.notes = notes;
        }
    }
}

fn format_cost(cost: f64) -> String {
    if cost > 0.0 {
        format!("{}", cost)
    } else {
        String::new()
    }
}

/// Partial edit of the confirmation draft.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DraftUpdate {
    pub confirmation_date: Option<String>,
    pub confirmation_time: Option<String>,
    pub cost: Option<String>,
    pub notes: Option<String>,
}

/// The appointment currently open in the review dialog, with its draft.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewSelection {
    pub appointment: AppointmentRecord,
    pub draft: ConfirmationDraft,
}

// ==============================================================================
// LIVE LIST MODELS
// ==============================================================================

/// The admin list partitioned by decision state. Every record lands in
/// exactly one bucket.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AppointmentViews {
    pub pending: Vec<AppointmentRecord>,
    pub confirmed: Vec<AppointmentRecord>,
    pub rejected: Vec<AppointmentRecord>,
}

impl AppointmentViews {
    pub fn partition(records: &[AppointmentRecord]) -> Self {
        let mut views = Self::default();

        for record in records {
            match record.status {
                AppointmentStatus::Pending => views.pending.push(record.clone()),
                AppointmentStatus::Confirmed => views.confirmed.push(record.clone()),
                AppointmentStatus::Rejected => views.rejected.push(record.clone()),
            }
        }

        views
    }

    pub fn total(&self) -> usize {
        self.pending.len() + self.confirmed.len() + self.rejected.len()
    }
}

// ==============================================================================
// NOTIFICATION MODELS
// ==============================================================================

pub const NOTIFICATION_ICON: &str = "/icons/salon-192.png";
pub const NOTIFICATION_BADGE: &str = "/icons/salon-badge-72.png";

/// A desktop-style notification raised for the administrator when a new
/// request lands.
#[derive(Debug, Clone, Serialize)]
pub struct LocalNotification {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    pub icon: String,
    pub badge: String,
    pub raised_at: DateTime<Utc>,
}

impl LocalNotification {
    pub fn new_request(record: &AppointmentRecord) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: "New appointment request".to_string(),
            body: format!("{} requested {}", record.name, record.date_requested),
            icon: NOTIFICATION_ICON.to_string(),
            badge: NOTIFICATION_BADGE.to_string(),
            raised_at: Utc::now(),
        }
    }
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AppointmentError {
    #[error("Appointment not found")]
    NotFound,

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("A submission is already in progress")]
    SubmissionInFlight,

    #[error("No appointment is selected for review")]
    NoSelection,

    #[error("Invalid cost: {0}")]
    InvalidCost(String),

    #[error("No active session")]
    NotSignedIn,

    #[error("Store error: {0}")]
    StoreError(String),
}
