pub mod busy;
pub mod config;
pub mod controller;
pub mod error;
pub mod mutation;
pub mod operation;
pub mod query;
pub mod registry;
pub mod remote;
pub mod request;
pub mod session;
pub mod snapshot;

#[cfg(test)]
mod test_stubs;

pub use config::{ControllerConfig, IdentityProviderConfig};
pub use controller::{Controller, Dispatched, Intent, Settled};
pub use error::{ControllerError, OperationError};
pub use remote::{DataService, RemoteError};
pub use session::{AuthError, IdentityProvider};
pub use snapshot::Snapshot;
