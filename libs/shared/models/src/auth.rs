use serde::{Deserialize, Serialize};

/// An identity established against the hosted store's auth endpoint. The
/// access token accompanies every document read and write.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Identity {
    pub user_id: String,
    pub access_token: String,
    #[serde(default)]
    pub anonymous: bool,
}

impl Identity {
    /// Only the identity redeemed from a deployment credential counts as the
    /// administrator. Replace this predicate to change the policy; nothing
    /// else inspects `anonymous`.
    pub fn is_administrator(&self) -> bool {
        !self.anonymous
    }
}

/// What the rest of the application sees of the process session. Tokens stay
/// inside the session service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub user_id: Option<String>,
    pub ready: bool,
    pub is_admin: bool,
}

impl SessionSnapshot {
    pub fn not_ready() -> Self {
        Self {
            user_id: None,
            ready: false,
            is_admin: false,
        }
    }

    pub fn for_identity(identity: &Identity) -> Self {
        Self {
            user_id: Some(identity.user_id.clone()),
            ready: true,
            is_admin: identity.is_administrator(),
        }
    }
}
