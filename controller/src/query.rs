use crate::error::{ControllerError, OperationError};
use crate::operation::{Outcome, OutcomeFuture};
use crate::remote::{Remote, RemoteError};
use catalog::Catalog;
use model::query::{ColumnResult, SelectAll, SelectColumn};
use model::{CellValue, ColumnName, Identity, Row, TableName};

/// Column-scoped and full-table queries against the selected table.
///
/// Starting a query in one mode empties the other mode's results before the
/// call is made, so the two views are never shown together, even when the
/// query fails.
#[derive(Debug, Clone)]
pub struct QueryExecutor {
    remote: Remote,
}

impl QueryExecutor {
    pub fn new(remote: Remote) -> Self {
        Self { remote }
    }

    pub fn prepare_column(
        &self,
        catalog: &mut Catalog,
        column: ColumnName,
    ) -> Result<SelectColumn, ControllerError> {
        let table = selected_table(catalog)?;
        catalog.results.begin_column_query();
        Ok(SelectColumn::new(table, column))
    }

    pub fn prepare_all(&self, catalog: &mut Catalog) -> Result<SelectAll, ControllerError> {
        let table = selected_table(catalog)?;
        catalog.results.begin_table_query();
        Ok(SelectAll::new(table))
    }

    pub fn query_column(&self, identity: &Identity, req: SelectColumn) -> OutcomeFuture {
        let remote = self.remote.clone();
        let identity = identity.clone();
        Box::pin(async move {
            let column = req.column.clone();
            let result = remote
                .within_deadline(remote.service().select(&identity, req))
                .await;
            Outcome::ColumnQueried { column, result }
        })
    }

    pub fn query_all(&self, identity: &Identity, req: SelectAll) -> OutcomeFuture {
        let remote = self.remote.clone();
        let identity = identity.clone();
        Box::pin(async move {
            let result = remote
                .within_deadline(remote.service().select_all(&identity, req))
                .await;
            Outcome::TableQueried(result)
        })
    }

    pub fn apply_column(
        &self,
        catalog: &mut Catalog,
        column: ColumnName,
        result: Result<Vec<CellValue>, RemoteError>,
    ) -> Result<(), OperationError> {
        let values = result.map_err(OperationError::QueryColumn)?;
        catalog
            .results
            .replace_column(ColumnResult { column, values });
        Ok(())
    }

    pub fn apply_all(
        &self,
        catalog: &mut Catalog,
        result: Result<Vec<Row>, RemoteError>,
    ) -> Result<(), OperationError> {
        let rows = result.map_err(OperationError::QueryAll)?;
        catalog.results.replace_table(rows);
        Ok(())
    }
}

fn selected_table(catalog: &Catalog) -> Result<TableName, ControllerError> {
    catalog
        .tables
        .selected()
        .map(|detail| detail.name.clone())
        .ok_or(ControllerError::NoTableSelected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_stubs::NoService;
    use model::TableDetail;
    use std::sync::Arc;

    fn executor() -> QueryExecutor {
        QueryExecutor::new(Remote::new(Arc::new(NoService), None))
    }

    fn with_results() -> Catalog {
        let mut catalog = Catalog::new();
        catalog.select(TableDetail {
            name: "t1".into(),
            columns: vec!["a".into()],
            row_count: 1,
        });
        catalog.results.replace_column(ColumnResult {
            column: "a".into(),
            values: vec!["1".into()],
        });
        catalog.results.replace_table(vec![vec!["1".into()]]);
        catalog
    }

    #[test]
    fn queries_need_a_selection() {
        let mut catalog = Catalog::new();
        assert_eq!(
            executor().prepare_column(&mut catalog, "a".into()),
            Err(ControllerError::NoTableSelected)
        );
        assert_eq!(
            executor().prepare_all(&mut catalog),
            Err(ControllerError::NoTableSelected)
        );
    }

    #[test]
    fn column_query_targets_selected_table() {
        let mut catalog = with_results();
        let req = executor().prepare_column(&mut catalog, "a".into()).unwrap();

        assert_eq!(req, SelectColumn::new("t1", "a"));
        assert!(catalog.results.table().is_empty());
    }

    #[test]
    fn failed_full_query_leaves_both_views_empty() {
        let mut catalog = with_results();
        let executor = executor();
        executor.prepare_all(&mut catalog).unwrap();

        let err = executor
            .apply_all(&mut catalog, Err(RemoteError::Rejected("gone".into())))
            .unwrap_err();

        assert_eq!(err.to_string(), "Failed to query all data: gone");
        assert!(catalog.results.is_empty());
    }

    #[test]
    fn column_result_is_labelled_with_its_column() {
        let mut catalog = with_results();
        executor()
            .apply_column(&mut catalog, "a".into(), Ok(vec!["1".into(), "2".into()]))
            .unwrap();

        let result = catalog.results.column().unwrap();
        assert_eq!(result.column, "a");
        assert_eq!(result.values, vec!["1", "2"]);
    }
}
