use crate::remote::RemoteError;
use crate::session::AuthError;
use catalog::DraftError;
use thiserror::Error;

/// Failure of an orchestrated operation after it reached a collaborator.
///
/// The rendered message is exactly what the user is shown as a notification.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OperationError {
    #[error("Login failed: {0}")]
    Login(#[source] AuthError),

    #[error("Failed to fetch tables: {0}")]
    ListTables(#[source] RemoteError),

    #[error("Failed to select table: {0}")]
    SelectTable(#[source] RemoteError),

    #[error("Failed to create table: {0}")]
    CreateTable(#[source] RemoteError),

    #[error("Failed to insert row: {0}")]
    InsertRow(#[source] RemoteError),

    #[error("Failed to delete table: {0}")]
    DropTable(#[source] RemoteError),

    #[error("Failed to query data: {0}")]
    QueryColumn(#[source] RemoteError),

    #[error("Failed to query all data: {0}")]
    QueryAll(#[source] RemoteError),
}

/// Answer to an intent that did not complete successfully.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ControllerError {
    #[error("Session has not been initialized")]
    NotInitialized,

    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Already authenticated")]
    AlreadyAuthenticated,

    #[error("Another operation is in progress")]
    Busy,

    #[error("No table is selected")]
    NoTableSelected,

    #[error(transparent)]
    Draft(#[from] DraftError),

    #[error(transparent)]
    Failed(#[from] OperationError),

    #[error("Session changed while the operation was in flight")]
    Discarded,

    #[error("Controller is no longer running")]
    Stopped,
}
