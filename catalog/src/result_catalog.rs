use model::Row;
use model::query::{ColumnResult, TableResult};

/// Result sets of the two query modes. Only one mode is ever populated:
/// starting a query in one mode empties the other, whatever the outcome.
#[derive(Debug, Default)]
pub struct ResultCatalog {
    column: Option<ColumnResult>,
    table: TableResult,
}

impl ResultCatalog {
    pub fn column(&self) -> Option<&ColumnResult> {
        self.column.as_ref()
    }

    pub fn table(&self) -> &[Row] {
        &self.table
    }

    pub fn begin_column_query(&mut self) {
        self.table.clear();
    }

    pub fn replace_column(&mut self, result: ColumnResult) {
        self.column = Some(result);
    }

    pub fn begin_table_query(&mut self) {
        self.column = None;
    }

    pub fn replace_table(&mut self, rows: TableResult) {
        self.table = rows;
    }

    pub fn clear(&mut self) {
        self.column = None;
        self.table.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.column.is_none() && self.table.is_empty()
    }
}
