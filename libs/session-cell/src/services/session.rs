use std::sync::Arc;

use tokio::sync::{watch, RwLock};
use tracing::{info, warn};

use shared_config::AppConfig;
use shared_models::auth::{Identity, SessionSnapshot};
use shared_store::StoreClient;

/// Owns the single processwide identity against the hosted store. A
/// deployment started with a session credential runs as the administrator;
/// anything else runs anonymously. Consumers read the published
/// `SessionSnapshot`; the access token never leaves this service except
/// through `auth_token`.
pub struct SessionService {
    config: Arc<AppConfig>,
    store: Arc<StoreClient>,
    identity: RwLock<Option<Identity>>,
    state: watch::Sender<SessionSnapshot>,
}

impl SessionService {
    pub fn new(config: Arc<AppConfig>, store: Arc<StoreClient>) -> Self {
        let (state, _) = watch::channel(SessionSnapshot::not_ready());

        Self {
            config,
            store,
            identity: RwLock::new(None),
            state,
        }
    }

    /// Establish the process identity: redeem the configured credential when
    /// present, fall back to an anonymous sign-in otherwise or when the
    /// redemption fails. Auth failures leave the session not ready instead of
    /// aborting startup; `refresh` runs the same sequence again.
    pub async fn bootstrap(&self) {
        let identity = match self.config.session_credential.as_deref() {
            Some(credential) => match self.store.sign_in_with_credential(credential).await {
                Ok(identity) => Some(identity),
                Err(e) => {
                    warn!("Credential redemption failed, falling back to anonymous: {}", e);
                    self.anonymous_identity().await
                }
            },
            None => self.anonymous_identity().await,
        };

        let snapshot = match &identity {
            Some(identity) => {
                info!(
                    user_id = %identity.user_id,
                    is_admin = identity.is_administrator(),
                    "Session established"
                );
                SessionSnapshot::for_identity(identity)
            }
            None => SessionSnapshot::not_ready(),
        };

        *self.identity.write().await = identity;
        self.state.send_replace(snapshot);
    }

    async fn anonymous_identity(&self) -> Option<Identity> {
        match self.store.sign_in_anonymously().await {
            Ok(identity) => Some(identity),
            Err(e) => {
                warn!("Anonymous sign-in failed, session stays unavailable: {}", e);
                None
            }
        }
    }

    /// Re-run the sign-in sequence and publish the result to subscribers.
    pub async fn refresh(&self) -> SessionSnapshot {
        self.bootstrap().await;
        self.snapshot()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.state.borrow().clone()
    }

    /// Identity changes are published here, including refreshes that land on
    /// the same identity.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.state.subscribe()
    }

    pub async fn auth_token(&self) -> Option<String> {
        self.identity
            .read()
            .await
            .as_ref()
            .map(|identity| identity.access_token.clone())
    }

    pub fn is_admin(&self) -> bool {
        self.state.borrow().is_admin
    }
}
