use super::{CellValue, ColumnName};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Pending cell inputs for the next row of the selected table.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowDraft {
    values: HashMap<ColumnName, CellValue>,
}

impl RowDraft {
    pub fn set(&mut self, column: impl Into<ColumnName>, value: impl Into<CellValue>) {
        self.values.insert(column.into(), value.into());
    }

    /// Current input for `column`, empty when nothing was entered.
    pub fn get(&self, column: &str) -> &str {
        self.values.get(column).map(String::as_str).unwrap_or("")
    }

    /// One value per column, in column order. Missing inputs become empty
    /// values so the row always has the schema's arity.
    pub fn values_for(&self, columns: &[ColumnName]) -> Vec<CellValue> {
        columns.iter().map(|c| self.get(c).to_owned()).collect()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
