use super::provider::{AuthError, IdentityProvider};
use crate::config::IdentityProviderConfig;
use crate::error::{ControllerError, OperationError};
use crate::operation::{Outcome, OutcomeFuture};
use model::{Identity, Principal, SessionState};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Incremented whenever the session ends. Completions dispatched under an
/// older epoch belong to a session that no longer exists.
pub type SessionEpoch = u64;

/// Owns the caller's identity. A session is authenticated exactly while an
/// identity is held; the handshake in between is tracked by whoever drives
/// the login call.
pub struct SessionManager {
    provider: Arc<dyn IdentityProvider>,
    endpoint: IdentityProviderConfig,
    identity: Option<Identity>,
    epoch: SessionEpoch,
    initialized: bool,
}

impl SessionManager {
    pub fn new(provider: Arc<dyn IdentityProvider>, endpoint: IdentityProviderConfig) -> Self {
        Self {
            provider,
            endpoint,
            identity: None,
            epoch: 0,
            initialized: false,
        }
    }

    /// Settled state, never `Authenticating`.
    pub fn state(&self) -> SessionState {
        if self.identity.is_some() {
            SessionState::Authenticated
        } else {
            SessionState::Unauthenticated
        }
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn principal(&self) -> Option<&Principal> {
        self.identity.as_ref().map(Identity::principal)
    }

    pub fn epoch(&self) -> SessionEpoch {
        self.epoch
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    /// Identity to scope a remote call with.
    pub fn require_identity(&self) -> Result<&Identity, ControllerError> {
        if !self.initialized {
            return Err(ControllerError::NotInitialized);
        }
        self.identity.as_ref().ok_or(ControllerError::NotAuthenticated)
    }

    /// Recovers a still-valid credential from the provider. Provider errors
    /// are treated as "no credential".
    #[instrument(skip(self))]
    pub async fn initialize(&mut self) -> Option<&Identity> {
        let recovered = match self.provider.is_authenticated().await {
            Ok(true) => self.provider.identity().await,
            Ok(false) => None,
            Err(e) => {
                warn!("Could not check for an existing credential: {e}");
                None
            }
        };
        self.initialized = true;

        match recovered {
            Some(identity) => {
                info!(principal = %identity.principal(), "Recovered session");
                self.identity = Some(identity);
            }
            None => info!("No session to recover"),
        }
        self.identity.as_ref()
    }

    /// Returns the handshake to run. The session is untouched until
    /// [`SessionManager::complete_login`]. Callers must hold the busy flag.
    pub fn begin_login(&self) -> Result<OutcomeFuture, ControllerError> {
        if !self.initialized {
            return Err(ControllerError::NotInitialized);
        }
        if self.identity.is_some() {
            return Err(ControllerError::AlreadyAuthenticated);
        }

        let provider = self.provider.clone();
        let endpoint = self.endpoint.clone();
        Ok(Box::pin(async move {
            Outcome::LoggedIn(provider.login(&endpoint).await)
        }))
    }

    pub fn complete_login(
        &mut self,
        result: Result<Identity, AuthError>,
    ) -> Result<&Identity, OperationError> {
        match result {
            Ok(identity) => {
                info!(principal = %identity.principal(), "Logged in");
                Ok(self.identity.insert(identity))
            }
            Err(e) => {
                warn!("Login failed: {e}");
                self.identity = None;
                Err(OperationError::Login(e))
            }
        }
    }

    /// Revokes the credential and ends the session. The local reset happens
    /// even when the provider fails to revoke.
    #[instrument(skip(self))]
    pub async fn logout(&mut self) -> Result<(), AuthError> {
        let revoked = self.provider.logout().await;
        if let Err(e) = &revoked {
            warn!("Identity provider failed to revoke the credential: {e}");
        }

        self.identity = None;
        self.epoch += 1;
        info!(epoch = self.epoch, "Logged out");
        revoked
    }
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("endpoint", &self.endpoint)
            .field("state", &self.state())
            .field("identity", &self.identity)
            .field("epoch", &self.epoch)
            .finish_non_exhaustive()
    }
}
