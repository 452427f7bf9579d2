use serde::Deserialize;
use std::time::Duration;

const DEFAULT_NOTIFICATION_TTL_MS: u64 = 5_000;

/// Where the delegated login handshake is sent.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct IdentityProviderConfig {
    pub url: String,
}

impl IdentityProviderConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    /// Identity provider served by a local development replica.
    pub fn local_replica(canister_id: &str) -> Self {
        Self::new(format!("http://{canister_id}.localhost:4943/"))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ControllerConfig {
    pub identity_provider: IdentityProviderConfig,
    #[serde(default = "default_notification_ttl_ms")]
    pub notification_ttl_ms: u64,
    /// Client-side deadline for remote calls. Unset means calls may take
    /// arbitrarily long and keep the controller busy until they settle.
    #[serde(default)]
    pub rpc_timeout_ms: Option<u64>,
}

fn default_notification_ttl_ms() -> u64 {
    DEFAULT_NOTIFICATION_TTL_MS
}

impl ControllerConfig {
    pub fn new(identity_provider: IdentityProviderConfig) -> Self {
        Self {
            identity_provider,
            notification_ttl_ms: DEFAULT_NOTIFICATION_TTL_MS,
            rpc_timeout_ms: None,
        }
    }

    pub fn notification_ttl(mut self, ttl: Duration) -> Self {
        self.notification_ttl_ms = ttl.as_millis() as u64;
        self
    }

    pub fn rpc_timeout(mut self, timeout: Duration) -> Self {
        self.rpc_timeout_ms = Some(timeout.as_millis() as u64);
        self
    }

    pub fn notification_ttl_duration(&self) -> Duration {
        Duration::from_millis(self.notification_ttl_ms)
    }

    pub fn rpc_timeout_duration(&self) -> Option<Duration> {
        self.rpc_timeout_ms.map(Duration::from_millis)
    }
}
