use crate::error::OperationError;
use crate::operation::{Outcome, OutcomeFuture};
use crate::remote::{Remote, RemoteError};
use catalog::Catalog;
use model::table::GetTableDetails;
use model::{Identity, TableDetail, TableName};
use tracing::debug;

/// Keeps the cached table list and selection in line with the service.
#[derive(Debug, Clone)]
pub struct TableRegistry {
    remote: Remote,
}

impl TableRegistry {
    pub fn new(remote: Remote) -> Self {
        Self { remote }
    }

    pub fn refresh_list(&self, identity: &Identity) -> OutcomeFuture {
        let remote = self.remote.clone();
        let identity = identity.clone();
        Box::pin(async move {
            let result = remote
                .within_deadline(remote.service().list_tables(&identity))
                .await;
            Outcome::TablesListed(result)
        })
    }

    pub fn select(&self, identity: &Identity, req: GetTableDetails) -> OutcomeFuture {
        let remote = self.remote.clone();
        let identity = identity.clone();
        Box::pin(async move {
            let result = remote
                .within_deadline(remote.service().get_table_details(&identity, req))
                .await;
            Outcome::TableSelected(result)
        })
    }

    /// The listed names replace the cache; nothing is merged.
    pub fn apply_list(
        &self,
        catalog: &mut Catalog,
        result: Result<Vec<TableName>, RemoteError>,
    ) -> Result<(), OperationError> {
        let tables = result.map_err(OperationError::ListTables)?;
        catalog.tables.replace_tables(tables);
        Ok(())
    }

    /// On failure the previous selection stays as it was.
    pub fn apply_select(
        &self,
        catalog: &mut Catalog,
        result: Result<TableDetail, RemoteError>,
    ) -> Result<(), OperationError> {
        let detail = result.map_err(OperationError::SelectTable)?;
        debug!(table = %detail.name, rows = detail.row_count, "Selected table");
        catalog.select(detail);
        Ok(())
    }

    pub fn deselect(&self, catalog: &mut Catalog) {
        if let Some(previous) = catalog.deselect() {
            debug!(table = %previous.name, "Deselected table");
        }
    }
}
