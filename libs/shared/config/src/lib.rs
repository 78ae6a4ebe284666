use std::env;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub store_url: String,
    pub store_anon_key: String,
    pub store_app_id: String,
    pub session_credential: Option<String>,
    pub snapshot_poll_seconds: u64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            store_url: env::var("STORE_URL")
                .unwrap_or_else(|_| {
                    warn!("STORE_URL not set, using empty value");
                    String::new()
                }),
            store_anon_key: env::var("STORE_ANON_KEY")
                .unwrap_or_else(|_| {
                    warn!("STORE_ANON_KEY not set, using empty value");
                    String::new()
                }),
            store_app_id: env::var("STORE_APP_ID")
                .unwrap_or_else(|_| {
                    warn!("STORE_APP_ID not set, using empty value");
                    String::new()
                }),
            session_credential: env::var("STORE_SESSION_CREDENTIAL")
                .ok()
                .filter(|credential| !credential.is_empty()),
            snapshot_poll_seconds: env::var("SNAPSHOT_POLL_SECONDS")
                .ok()
                .and_then(|raw| match raw.parse() {
                    Ok(seconds) => Some(seconds),
                    Err(_) => {
                        warn!("SNAPSHOT_POLL_SECONDS is not a number, using default");
                        None
                    }
                })
                .unwrap_or(5),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.store_url.is_empty()
            && !self.store_anon_key.is_empty()
            && !self.store_app_id.is_empty()
    }

    pub fn has_session_credential(&self) -> bool {
        self.session_credential.is_some()
    }
}
