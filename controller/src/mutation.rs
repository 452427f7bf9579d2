use crate::error::{ControllerError, OperationError};
use crate::operation::{Operation, Outcome, OutcomeFuture};
use crate::remote::{Remote, RemoteError};
use catalog::Catalog;
use model::{Identity, TableName};
use model::table::{CreateTable, DropTable, GetTableDetails, InsertInto};
use tracing::debug;

/// Runs create, insert and drop, and decides which refresh must follow a
/// successful mutation.
#[derive(Debug, Clone)]
pub struct MutationOrchestrator {
    remote: Remote,
}

impl MutationOrchestrator {
    pub fn new(remote: Remote) -> Self {
        Self { remote }
    }

    /// Blank column inputs are dropped before sending. An empty column list
    /// is still sent.
    pub fn prepare_create(&self, req: CreateTable) -> CreateTable {
        req.without_empty_columns()
    }

    /// Row values in schema order, one per column of the selected table.
    pub fn prepare_insert(&self, catalog: &Catalog) -> Result<InsertInto, ControllerError> {
        let detail = catalog
            .tables
            .selected()
            .ok_or(ControllerError::NoTableSelected)?;
        Ok(InsertInto::from_draft(detail, catalog.tables.draft()))
    }

    pub fn create_table(&self, identity: &Identity, req: CreateTable) -> OutcomeFuture {
        let remote = self.remote.clone();
        let identity = identity.clone();
        Box::pin(async move {
            let result = remote
                .within_deadline(remote.service().create_table(&identity, req))
                .await;
            Outcome::TableCreated(result)
        })
    }

    pub fn insert_row(&self, identity: &Identity, req: InsertInto) -> OutcomeFuture {
        let remote = self.remote.clone();
        let identity = identity.clone();
        Box::pin(async move {
            let table = req.table.clone();
            let result = remote
                .within_deadline(remote.service().insert_into(&identity, req))
                .await;
            Outcome::RowInserted { table, result }
        })
    }

    pub fn drop_table(&self, identity: &Identity, req: DropTable) -> OutcomeFuture {
        let remote = self.remote.clone();
        let identity = identity.clone();
        Box::pin(async move {
            let table = req.name.clone();
            let result = remote
                .within_deadline(remote.service().drop_table(&identity, req))
                .await;
            Outcome::TableDropped { table, result }
        })
    }

    /// A new table only shows up through a full list refresh.
    pub fn apply_create(&self, result: Result<(), RemoteError>) -> Result<Operation, OperationError> {
        result.map_err(OperationError::CreateTable)?;
        Ok(Operation::ListTables)
    }

    /// Re-selects the table so the new row count is picked up.
    pub fn apply_insert(
        &self,
        catalog: &mut Catalog,
        table: TableName,
        result: Result<(), RemoteError>,
    ) -> Result<Operation, OperationError> {
        result.map_err(OperationError::InsertRow)?;
        catalog.tables.clear_draft();
        Ok(Operation::SelectTable(GetTableDetails::new(table)))
    }

    /// Nothing changes locally when the drop fails.
    pub fn apply_drop(
        &self,
        catalog: &mut Catalog,
        table: TableName,
        result: Result<(), RemoteError>,
    ) -> Result<Operation, OperationError> {
        result.map_err(OperationError::DropTable)?;
        if catalog.tables.is_selected(&table) {
            debug!(%table, "Dropped the selected table");
            catalog.deselect();
        }
        Ok(Operation::ListTables)
    }
}
