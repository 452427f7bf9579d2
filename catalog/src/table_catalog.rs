use model::table::RowDraft;
use model::{ColumnName, TableDetail, TableName};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DraftError {
    #[error("No table is selected")]
    NoTableSelected,

    #[error("Table '{table}' has no column '{column}'")]
    UnknownColumn { table: TableName, column: ColumnName },
}

/// Local mirror of the caller's tables: the listed names, the schema of the
/// selected table, and the row being drafted for it.
#[derive(Debug, Default)]
pub struct TableCatalog {
    tables: Vec<TableName>,
    selected: Option<TableDetail>,
    draft: RowDraft,
}

impl TableCatalog {
    pub fn tables(&self) -> &[TableName] {
        &self.tables
    }

    /// Replaces the listed names with the service's view. Order is kept as
    /// listed; repeated names keep their first position.
    pub fn replace_tables(&mut self, tables: Vec<TableName>) {
        let mut unique: Vec<TableName> = Vec::with_capacity(tables.len());
        for name in tables {
            if !unique.contains(&name) {
                unique.push(name);
            }
        }
        debug!(count = unique.len(), "Replacing table list");
        self.tables = unique;
    }

    pub fn selected(&self) -> Option<&TableDetail> {
        self.selected.as_ref()
    }

    pub fn is_selected(&self, name: &str) -> bool {
        self.selected.as_ref().is_some_and(|d| d.name == name)
    }

    /// Replaces the selected detail and starts a fresh draft.
    pub fn select(&mut self, detail: TableDetail) {
        self.selected = Some(detail);
        self.draft.clear();
    }

    pub fn deselect(&mut self) -> Option<TableDetail> {
        self.draft.clear();
        self.selected.take()
    }

    pub fn draft(&self) -> &RowDraft {
        &self.draft
    }

    pub fn set_draft_value(
        &mut self,
        column: &str,
        value: impl Into<String>,
    ) -> Result<(), DraftError> {
        let detail = self.selected.as_ref().ok_or(DraftError::NoTableSelected)?;
        if !detail.has_column(column) {
            return Err(DraftError::UnknownColumn {
                table: detail.name.clone(),
                column: column.to_owned(),
            });
        }
        self.draft.set(column, value);
        Ok(())
    }

    pub fn clear_draft(&mut self) {
        self.draft.clear();
    }

    pub fn clear(&mut self) {
        self.tables.clear();
        self.selected = None;
        self.draft.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty() && self.selected.is_none() && self.draft.is_empty()
    }
}
