use crate::table::{CellValue, ColumnName, Row, TableName};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectColumn {
    pub table: TableName,
    pub column: ColumnName,
}

impl SelectColumn {
    pub fn new(table: impl Into<TableName>, column: impl Into<ColumnName>) -> Self {
        Self {
            table: table.into(),
            column: column.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectAll {
    pub table: TableName,
}

impl SelectAll {
    pub fn new(table: impl Into<TableName>) -> Self {
        Self {
            table: table.into(),
        }
    }
}

/// Values of one column, one per row, in row order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnResult {
    pub column: ColumnName,
    pub values: Vec<CellValue>,
}

/// Every row of a table, cells in column order.
pub type TableResult = Vec<Row>;
