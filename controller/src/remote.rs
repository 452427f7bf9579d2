use async_trait::async_trait;
use model::query::{SelectAll, SelectColumn};
use model::table::{CreateTable, DropTable, GetTableDetails, InsertInto};
use model::{CellValue, Identity, Row, TableDetail, TableName};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RemoteError {
    /// The service answered with an explicit failure (not found, name
    /// collision, arity mismatch, ...).
    #[error("{0}")]
    Rejected(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("no response within {0:?}")]
    Timeout(Duration),
}

/// Calls exposed by the remote data service. Every call is scoped by the
/// caller's identity; the service alone decides what is valid.
#[async_trait]
pub trait DataService: Send + Sync + 'static {
    async fn list_tables(&self, identity: &Identity) -> Result<Vec<TableName>, RemoteError>;

    async fn create_table(&self, identity: &Identity, req: CreateTable) -> Result<(), RemoteError>;

    async fn get_table_details(
        &self,
        identity: &Identity,
        req: GetTableDetails,
    ) -> Result<TableDetail, RemoteError>;

    async fn insert_into(&self, identity: &Identity, req: InsertInto) -> Result<(), RemoteError>;

    async fn select(
        &self,
        identity: &Identity,
        req: SelectColumn,
    ) -> Result<Vec<CellValue>, RemoteError>;

    async fn select_all(&self, identity: &Identity, req: SelectAll) -> Result<Vec<Row>, RemoteError>;

    async fn drop_table(&self, identity: &Identity, req: DropTable) -> Result<(), RemoteError>;
}

/// Shared handle to the data service, with the optional client-side deadline
/// applied to every call.
#[derive(Clone)]
pub struct Remote {
    service: Arc<dyn DataService>,
    deadline: Option<Duration>,
}

impl Remote {
    pub fn new(service: Arc<dyn DataService>, deadline: Option<Duration>) -> Self {
        Self { service, deadline }
    }

    pub fn service(&self) -> &dyn DataService {
        self.service.as_ref()
    }

    pub async fn within_deadline<T, F>(&self, call: F) -> Result<T, RemoteError>
    where
        F: Future<Output = Result<T, RemoteError>>,
    {
        match self.deadline {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .map_err(|_| RemoteError::Timeout(limit))?,
            None => call.await,
        }
    }
}

impl std::fmt::Debug for Remote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Remote")
            .field("deadline", &self.deadline)
            .finish_non_exhaustive()
    }
}
