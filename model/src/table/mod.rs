pub mod draft;

pub use draft::RowDraft;

use serde::{Deserialize, Serialize};

pub type TableName = String;
pub type ColumnName = String;
pub type CellValue = String;

/// One row of a full-table query, cells aligned with [`TableDetail::columns`].
pub type Row = Vec<CellValue>;

/// Schema and size of a single table, as reported by the data service.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableDetail {
    pub name: TableName,
    pub columns: Vec<ColumnName>,
    pub row_count: u64,
}

impl TableDetail {
    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreateTable {
    pub name: TableName,
    pub columns: Vec<ColumnName>,
}

impl CreateTable {
    pub fn new(name: impl Into<TableName>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
        }
    }

    pub fn with_column(mut self, column: impl Into<ColumnName>) -> Self {
        self.columns.push(column.into());
        self
    }

    pub fn with_columns<I, C>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<ColumnName>,
    {
        self.columns.extend(columns.into_iter().map(Into::into));
        self
    }

    /// Drops blank column inputs. The result may be empty; the data service
    /// decides whether such a schema is acceptable.
    pub fn without_empty_columns(mut self) -> Self {
        self.columns.retain(|c| !c.is_empty());
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GetTableDetails {
    pub name: TableName,
}

impl GetTableDetails {
    pub fn new(name: impl Into<TableName>) -> Self {
        Self { name: name.into() }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InsertInto {
    pub table: TableName,
    pub values: Vec<CellValue>,
}

impl InsertInto {
    /// Assembles the positional row for `detail` from `draft`.
    pub fn from_draft(detail: &TableDetail, draft: &RowDraft) -> Self {
        Self {
            table: detail.name.clone(),
            values: draft.values_for(&detail.columns),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DropTable {
    pub name: TableName,
}

impl DropTable {
    pub fn new(name: impl Into<TableName>) -> Self {
        Self { name: name.into() }
    }
}
