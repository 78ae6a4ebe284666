use anyhow::{Result, anyhow};
use reqwest::{
    Client,
    header::{HeaderMap, HeaderValue, CONTENT_TYPE, AUTHORIZATION},
    Method, StatusCode,
};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::{debug, error};

use shared_config::AppConfig;
use shared_models::appointment::{AppointmentRecord, NewAppointment};
use shared_models::auth::Identity;

/// Facade over the hosted auth and document APIs. Every collection path is
/// scoped to this deployment's `app_id`; callers never build paths themselves.
pub struct StoreClient {
    client: Client,
    base_url: String,
    anon_key: String,
    app_id: String,
}

impl StoreClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.store_url.clone(),
            anon_key: config.store_anon_key.clone(),
            app_id: config.store_app_id.clone(),
        }
    }

    fn get_headers(&self, auth_token: Option<&str>) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();

        headers.insert("apikey", HeaderValue::from_str(&self.anon_key)?);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(token) = auth_token {
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {}", token))?,
            );
        }

        Ok(headers)
    }

    fn api_error(status: StatusCode, error_text: String) -> anyhow::Error {
        match status.as_u16() {
            401 | 403 => anyhow!("Authentication error: {}", error_text),
            404 => anyhow!("Resource not found: {}", error_text),
            _ => anyhow!("Store error ({}): {}", status, error_text),
        }
    }

    pub async fn request<T>(
        &self,
        method: Method,
        path: &str,
        auth_token: Option<&str>,
        body: Option<Value>,
    ) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.request_with_headers(method, path, auth_token, body, None)
            .await
    }

    pub async fn request_with_headers<T>(
        &self,
        method: Method,
        path: &str,
        auth_token: Option<&str>,
        body: Option<Value>,
        extra_headers: Option<HeaderMap>,
    ) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!("Making request to {}", url);

        let mut headers = self.get_headers(auth_token)?;
        if let Some(extra) = extra_headers {
            headers.extend(extra);
        }

        let mut req = self.client.request(method, &url).headers(headers);

        if let Some(body_data) = body {
            req = req.json(&body_data);
        }

        let response = req.send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await?;
            error!("Store error ({}): {}", status, error_text);
            return Err(Self::api_error(status, error_text));
        }

        let data = response.json::<T>().await?;
        Ok(data)
    }

    /// Issue a write whose response body is irrelevant; the store answers
    /// `204 No Content` unless a representation is requested.
    async fn execute(
        &self,
        method: Method,
        path: &str,
        auth_token: Option<&str>,
        body: Option<Value>,
    ) -> Result<()> {
        let url = format!("{}{}", self.base_url, path);
        debug!("Making request to {}", url);

        let headers = self.get_headers(auth_token)?;
        let mut req = self.client.request(method, &url).headers(headers);

        if let Some(body_data) = body {
            req = req.json(&body_data);
        }

        let response = req.send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await?;
            error!("Store error ({}): {}", status, error_text);
            return Err(Self::api_error(status, error_text));
        }

        Ok(())
    }

    // ===== AUTH ENDPOINTS =====

    /// Redeem the deployment credential for the administrator identity.
    pub async fn sign_in_with_credential(&self, credential: &str) -> Result<Identity> {
        self.request(
            Method::POST,
            "/auth/v1/token",
            None,
            Some(json!({ "credential": credential })),
        )
        .await
    }

    /// Establish a throwaway identity for a client visit.
    pub async fn sign_in_anonymously(&self) -> Result<Identity> {
        self.request(
            Method::POST,
            "/auth/v1/signup/anonymous",
            None,
            Some(json!({})),
        )
        .await
    }

    // ===== APPOINTMENTS COLLECTION =====

    /// All appointment documents for this deployment, oldest request first.
    pub async fn fetch_appointments(&self, auth_token: &str) -> Result<Vec<AppointmentRecord>> {
        let path = format!(
            "/rest/v1/appointments?app_id=eq.{}&order=requested_at.asc",
            self.app_id
        );

        self.request(Method::GET, &path, Some(auth_token), None).await
    }

    /// Create an appointment document and return it with the store-assigned
    /// id and timestamp. The deployment scope is stamped here, not by callers.
    pub async fn create_appointment(
        &self,
        input: &NewAppointment,
        auth_token: &str,
    ) -> Result<AppointmentRecord> {
        let mut body = serde_json::to_value(input)?;
        body["app_id"] = json!(self.app_id);

        let mut headers = HeaderMap::new();
        headers.insert("Prefer", HeaderValue::from_static("return=representation"));

        let created: Vec<AppointmentRecord> = self
            .request_with_headers(
                Method::POST,
                "/rest/v1/appointments",
                Some(auth_token),
                Some(body),
                Some(headers),
            )
            .await?;

        created
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("Store returned no representation for the created appointment"))
    }

    /// Patch fields on one appointment document. Last writer wins; there is
    /// no read-modify-write cycle here.
    pub async fn update_appointment(
        &self,
        appointment_id: &str,
        fields: Value,
        auth_token: &str,
    ) -> Result<()> {
        let path = format!(
            "/rest/v1/appointments?id=eq.{}&app_id=eq.{}",
            appointment_id, self.app_id
        );

        self.execute(Method::PATCH, &path, Some(auth_token), Some(fields))
            .await
    }

    pub fn get_base_url(&self) -> &str {
        &self.base_url
    }

    pub fn app_id(&self) -> &str {
        &self.app_id
    }
}
