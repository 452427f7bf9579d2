mod manager;
mod provider;

pub use manager::{SessionEpoch, SessionManager};
pub use provider::{AuthError, IdentityProvider};
