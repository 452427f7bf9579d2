use crate::gate::Gate;
use async_trait::async_trait;
use controller::{AuthError, IdentityProvider, IdentityProviderConfig};
use model::{Identity, Principal};
use std::collections::VecDeque;
use std::sync::Mutex;

#[derive(Debug, Default)]
struct ProviderState {
    credential: Option<Identity>,
    login_outcomes: VecDeque<Result<Identity, AuthError>>,
    endpoints: Vec<IdentityProviderConfig>,
    logouts: usize,
}

/// Identity provider double. Logins answer with queued outcomes, falling back
/// to issuing the configured principal.
#[derive(Debug)]
pub struct ScriptedIdentityProvider {
    principal: Principal,
    state: Mutex<ProviderState>,
    gate: Gate,
}

impl ScriptedIdentityProvider {
    pub fn new(principal: Principal) -> Self {
        Self {
            principal,
            state: Mutex::new(ProviderState::default()),
            gate: Gate::default(),
        }
    }

    /// A credential from an earlier run that is still valid.
    pub fn with_stored_credential(self) -> Self {
        let identity = Identity::new(self.principal.clone());
        self.lock().credential = Some(identity);
        self
    }

    pub fn queue_login(&self, outcome: Result<Identity, AuthError>) {
        self.lock().login_outcomes.push_back(outcome);
    }

    pub fn reject_next_login(&self, reason: &str) {
        self.queue_login(Err(AuthError::Rejected(reason.to_owned())));
    }

    /// Logins wait here before they are answered.
    pub fn gate(&self) -> &Gate {
        &self.gate
    }

    pub fn endpoints(&self) -> Vec<IdentityProviderConfig> {
        self.lock().endpoints.clone()
    }

    pub fn logouts(&self) -> usize {
        self.lock().logouts
    }

    pub fn has_credential(&self) -> bool {
        self.lock().credential.is_some()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ProviderState> {
        self.state
            .lock()
            .expect("No one should panic while holding this lock")
    }
}

#[async_trait]
impl IdentityProvider for ScriptedIdentityProvider {
    async fn is_authenticated(&self) -> Result<bool, AuthError> {
        Ok(self.lock().credential.is_some())
    }

    async fn identity(&self) -> Option<Identity> {
        self.lock().credential.clone()
    }

    async fn login(&self, endpoint: &IdentityProviderConfig) -> Result<Identity, AuthError> {
        self.lock().endpoints.push(endpoint.clone());
        self.gate.pass().await;

        let mut state = self.lock();
        let outcome = state
            .login_outcomes
            .pop_front()
            .unwrap_or_else(|| Ok(Identity::new(self.principal.clone())));
        if let Ok(identity) = &outcome {
            state.credential = Some(identity.clone());
        }
        outcome
    }

    async fn logout(&self) -> Result<(), AuthError> {
        let mut state = self.lock();
        state.credential = None;
        state.logouts += 1;
        Ok(())
    }
}
