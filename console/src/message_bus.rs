use crate::console::{ConsoleRequest, GetSnapshot};
use catalog::Notification;
use controller::request::Request;
use controller::{ControllerError, Intent, Snapshot};
use model::table::CreateTable;
use model::{CellValue, ColumnName, TableName};
use tokio::sync::watch;

/// Sending side of the console. Cheap to clone; the console keeps running
/// while at least one handle exists.
#[derive(Clone, Debug)]
pub struct ConsoleHandle {
    sender: flume::Sender<ConsoleRequest>,
    snapshots: watch::Receiver<Snapshot>,
    notifications: watch::Receiver<Option<Notification>>,
}

impl ConsoleHandle {
    pub(crate) fn new(
        sender: flume::Sender<ConsoleRequest>,
        snapshots: watch::Receiver<Snapshot>,
        notifications: watch::Receiver<Option<Notification>>,
    ) -> Self {
        Self {
            sender,
            snapshots,
            notifications,
        }
    }

    async fn request<P, R>(&self, payload: P) -> Result<R, ControllerError>
    where
        P: std::fmt::Debug,
        Request<P, R>: Into<ConsoleRequest>,
    {
        let (rx, request) = Request::new(payload);
        self.sender
            .send_async(request.into())
            .await
            .map_err(|_| ControllerError::Stopped)?;
        rx.await.map_err(|_| ControllerError::Stopped)
    }

    /// Resolves once the intent and any refresh it triggers have settled.
    pub async fn submit(&self, intent: Intent) -> Result<(), ControllerError> {
        self.request(intent).await?
    }

    pub async fn snapshot(&self) -> Result<Snapshot, ControllerError> {
        self.request(GetSnapshot).await
    }

    /// Updated after every handled intent, settled operation and
    /// notification change.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.snapshots.clone()
    }

    pub fn subscribe_notifications(&self) -> watch::Receiver<Option<Notification>> {
        self.notifications.clone()
    }

    pub async fn login(&self) -> Result<(), ControllerError> {
        self.submit(Intent::Login).await
    }

    pub async fn logout(&self) -> Result<(), ControllerError> {
        self.submit(Intent::Logout).await
    }

    pub async fn refresh_tables(&self) -> Result<(), ControllerError> {
        self.submit(Intent::RefreshTables).await
    }

    pub async fn select_table(&self, name: impl Into<TableName>) -> Result<(), ControllerError> {
        self.submit(Intent::SelectTable(name.into())).await
    }

    pub async fn deselect(&self) -> Result<(), ControllerError> {
        self.submit(Intent::Deselect).await
    }

    pub async fn create_table(&self, req: CreateTable) -> Result<(), ControllerError> {
        self.submit(Intent::CreateTable(req)).await
    }

    pub async fn set_draft_value(
        &self,
        column: impl Into<ColumnName>,
        value: impl Into<CellValue>,
    ) -> Result<(), ControllerError> {
        self.submit(Intent::SetDraftValue {
            column: column.into(),
            value: value.into(),
        })
        .await
    }

    pub async fn insert_row(&self) -> Result<(), ControllerError> {
        self.submit(Intent::InsertRow).await
    }

    pub async fn drop_table(&self, name: impl Into<TableName>) -> Result<(), ControllerError> {
        self.submit(Intent::DropTable(name.into())).await
    }

    pub async fn query_column(&self, column: impl Into<ColumnName>) -> Result<(), ControllerError> {
        self.submit(Intent::QueryColumn(column.into())).await
    }

    pub async fn query_all(&self) -> Result<(), ControllerError> {
        self.submit(Intent::QueryAll).await
    }
}
