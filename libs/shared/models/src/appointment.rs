// libs/shared/models/src/appointment.rs
use serde::{Deserialize, Deserializer, Serialize};
use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;
use std::fmt;

/// Stored in place of the cedula when the client leaves the field blank.
pub const CEDULA_SENTINEL: &str = "N/A";

// ==============================================================================
// APPOINTMENT DOCUMENT
// ==============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Rejected,
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Pending => write!(f, "PENDING"),
            AppointmentStatus::Confirmed => write!(f, "CONFIRMED"),
            AppointmentStatus::Rejected => write!(f, "REJECTED"),
        }
    }
}

/// One appointment request as stored in the remote collection.
///
/// `id` and `requested_at` are assigned by the store; documents written by
/// earlier front ends may carry `cost` as a numeric string or omit the
/// confirmation fields, so deserialization is deliberately lenient there.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppointmentRecord {
    pub id: String,
    #[serde(default)]
    pub app_id: String,
    pub name: String,
    #[serde(default = "cedula_default")]
    pub cedula: String,
    pub phone: String,
    pub date_requested: NaiveDate,
    #[serde(default)]
    pub requested_at: Option<DateTime<Utc>>,
    pub status: AppointmentStatus,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub confirmation_date: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub confirmation_time: Option<String>,
    #[serde(default, deserialize_with = "lenient_cost")]
    pub cost: f64,
    #[serde(default)]
    pub notes: String,
}

impl AppointmentRecord {
    pub fn is_pending(&self) -> bool {
        self.status == AppointmentStatus::Pending
    }

    pub fn has_confirmation(&self) -> bool {
        self.confirmation_date.is_some() && self.confirmation_time.is_some()
    }
}

/// Payload for creating a new appointment request. The store assigns the
/// document id and the `requested_at` timestamp; the decision fields start
/// empty and `status` is always `PENDING` at this point.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAppointment {
    pub name: String,
    pub cedula: String,
    pub phone: String,
    pub date_requested: NaiveDate,
    pub status: AppointmentStatus,
    pub confirmation_date: Option<String>,
    pub confirmation_time: Option<String>,
    pub notes: String,
}

// ==============================================================================
// SERDE HELPERS
// ==============================================================================

fn cedula_default() -> String {
    CEDULA_SENTINEL.to_string()
}

/// Older documents store cleared confirmation fields as `""` rather than
/// omitting them; both read back as `None`.
fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|raw| !raw.trim().is_empty()))
}

fn lenient_cost<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(coerce_cost(raw.as_ref()))
}

/// Coerce a stored cost to a number. A JSON number wins, a parseable numeric
/// string is next, anything else reads as zero.
pub fn coerce_cost(raw: Option<&Value>) -> f64 {
    match raw {
        Some(Value::Number(number)) => number.as_f64().unwrap_or(0.0),
        Some(Value::String(text)) => text.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    }
}
