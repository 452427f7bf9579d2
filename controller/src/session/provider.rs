use crate::config::IdentityProviderConfig;
use async_trait::async_trait;
use model::Identity;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The provider rejected or aborted the handshake, with its reason.
    #[error("{0}")]
    Rejected(String),

    #[error("identity provider unavailable: {0}")]
    Unavailable(String),
}

/// Identity-provider integration that issues signed identities.
///
/// Credential persistence across restarts is the provider's concern; the
/// session manager only asks whether a credential is still valid.
#[async_trait]
pub trait IdentityProvider: Send + Sync + 'static {
    async fn is_authenticated(&self) -> Result<bool, AuthError>;

    /// Identity of the currently held credential, if any.
    async fn identity(&self) -> Option<Identity>;

    /// Runs the delegated handshake against `endpoint`. Resolves exactly once,
    /// with either the issued identity or the provider's failure reason.
    async fn login(&self, endpoint: &IdentityProviderConfig) -> Result<Identity, AuthError>;

    /// Revokes the locally held credential.
    async fn logout(&self) -> Result<(), AuthError>;
}
