//! Test doubles and helpers shared by the workspace's tests.

mod data_service;
mod gate;
mod identity_provider;

pub use data_service::{InMemoryDataService, ReceivedCall};
pub use gate::Gate;
pub use identity_provider::ScriptedIdentityProvider;

// Re-export proptest for convenience
pub use proptest;

use controller::{Controller, ControllerConfig, IdentityProviderConfig};
use model::{Identity, Principal};
use std::future::Future;
use std::sync::Arc;

pub const TEST_PRINCIPAL: &str = "rrkah-fqaaa-aaaaa-aaaaq-cai";
pub const OTHER_PRINCIPAL: &str = "ryjl3-tyaaa-aaaaa-aaaba-cai";
pub const TEST_IDENTITY_PROVIDER: &str = "be2us-64aaa-aaaaa-qaabq-cai";

pub fn test_principal() -> Principal {
    Principal::new(TEST_PRINCIPAL).expect("constant principal is not blank")
}

pub fn other_principal() -> Principal {
    Principal::new(OTHER_PRINCIPAL).expect("constant principal is not blank")
}

pub fn test_identity() -> Identity {
    Identity::new(test_principal())
}

pub fn test_config() -> ControllerConfig {
    ControllerConfig::new(IdentityProviderConfig::local_replica(TEST_IDENTITY_PROVIDER))
}

/// Collaborators of a controller under test, kept to inspect and steer them.
pub struct TestHarness {
    pub service: Arc<InMemoryDataService>,
    pub provider: Arc<ScriptedIdentityProvider>,
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with_provider(ScriptedIdentityProvider::new(test_principal()))
    }

    /// The provider still holds a credential from an earlier run.
    pub fn with_stored_credential() -> Self {
        Self::with_provider(ScriptedIdentityProvider::new(test_principal()).with_stored_credential())
    }

    pub fn with_provider(provider: ScriptedIdentityProvider) -> Self {
        Self {
            service: Arc::new(InMemoryDataService::new()),
            provider: Arc::new(provider),
        }
    }

    pub fn controller(&self) -> Controller {
        self.controller_with(&test_config())
    }

    pub fn controller_with(&self, config: &ControllerConfig) -> Controller {
        Controller::new(config, self.service.clone(), self.provider.clone())
    }

    /// An initialized controller that has completed a login.
    pub async fn logged_in(&self) -> Controller {
        let mut controller = self.controller();
        controller.initialize().await;
        controller
            .login()
            .await
            .expect("scripted login should succeed");
        controller
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// Installs a test-friendly tracing subscriber. Safe to call from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .without_time()
        .try_init();
}

/// Runs an async property body on a fresh current-thread runtime.
/// Panics are treated as test failures.
pub fn test_prop<F, Fut>(f: F)
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = ()>,
{
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("failed to create tokio runtime");

    rt.block_on(async {
        f().await;
    });
}
