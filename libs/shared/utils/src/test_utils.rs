use std::sync::Arc;

use serde_json::json;
use uuid::Uuid;

use shared_config::AppConfig;

pub struct TestConfig {
    pub store_url: String,
    pub store_anon_key: String,
    pub store_app_id: String,
    pub session_credential: Option<String>,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            store_url: "http://localhost:54321".to_string(),
            store_anon_key: "test-anon-key".to_string(),
            store_app_id: "salon-test".to_string(),
            session_credential: None,
        }
    }
}

impl TestConfig {
    pub fn with_credential(credential: &str) -> Self {
        Self {
            session_credential: Some(credential.to_string()),
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            store_url: self.store_url.clone(),
            store_anon_key: self.store_anon_key.clone(),
            store_app_id: self.store_app_id.clone(),
            session_credential: self.session_credential.clone(),
            snapshot_poll_seconds: 1,
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }
}

/// Canned JSON bodies in the shapes the hosted store answers with.
pub struct MockStoreResponses;

impl MockStoreResponses {
    pub fn identity_response(user_id: &str, anonymous: bool) -> serde_json::Value {
        json!({
            "user_id": user_id,
            "access_token": format!("token-{}", user_id),
            "anonymous": anonymous
        })
    }

    pub fn admin_identity_response() -> serde_json::Value {
        Self::identity_response("admin-user", false)
    }

    pub fn anonymous_identity_response() -> serde_json::Value {
        Self::identity_response("anon-user", true)
    }

    pub fn pending_appointment(id: &str, name: &str, date_requested: &str) -> serde_json::Value {
        json!({
            "id": id,
            "app_id": "salon-test",
            "name": name,
            "cedula": "001-0000000-1",
            "phone": "809-555-0100",
            "date_requested": date_requested,
            "requested_at": "2024-01-01T00:00:00Z",
            "status": "PENDING",
            "confirmation_date": "",
            "confirmation_time": "",
            "cost": "",
            "notes": ""
        })
    }

    pub fn confirmed_appointment(
        id: &str,
        name: &str,
        date_requested: &str,
        confirmation_date: &str,
        confirmation_time: &str,
        cost: f64,
    ) -> serde_json::Value {
        json!({
            "id": id,
            "app_id": "salon-test",
            "name": name,
            "cedula": "001-0000000-1",
            "phone": "809-555-0100",
            "date_requested": date_requested,
            "requested_at": "2024-01-01T00:00:00Z",
            "status": "CONFIRMED",
            "confirmation_date": confirmation_date,
            "confirmation_time": confirmation_time,
            "cost": cost,
            "notes": ""
        })
    }

    pub fn rejected_appointment(id: &str, name: &str, date_requested: &str) -> serde_json::Value {
        json!({
            "id": id,
            "app_id": "salon-test",
            "name": name,
            "cedula": "001-0000000-1",
            "phone": "809-555-0100",
            "date_requested": date_requested,
            "requested_at": "2024-01-01T00:00:00Z",
            "status": "REJECTED",
            "confirmation_date": "",
            "confirmation_time": "",
            "cost": null,
            "notes": "Requested date is unavailable. Please submit a new request."
        })
    }

    pub fn created_appointment(name: &str, date_requested: &str) -> serde_json::Value {
        json!({
            "id": Uuid::new_v4().to_string(),
            "app_id": "salon-test",
            "name": name,
            "cedula": "N/A",
            "phone": "809-555-0100",
            "date_requested": date_requested,
            "requested_at": "2024-01-01T00:00:00Z",
            "status": "PENDING",
            "confirmation_date": null,
            "confirmation_time": null,
            "cost": null,
            "notes": ""
        })
    }

    pub fn error_response(message: &str, code: &str) -> serde_json::Value {
        json!({
            "error": {
                "message": message,
                "code": code
            }
        })
    }
}
