pub mod notification;
pub mod result_catalog;
pub mod table_catalog;

#[cfg(test)]
mod test_utils;

pub use notification::{Notification, NotificationChannel};
pub use result_catalog::ResultCatalog;
pub use table_catalog::{DraftError, TableCatalog};

use model::TableDetail;

/// Facade over the locally cached state of one session.
///
/// Selection, deselection and logout always update both caches.
#[derive(Debug, Default)]
pub struct Catalog {
    pub tables: TableCatalog,
    pub results: ResultCatalog,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the selection wholesale. Results belong to the previous
    /// selection and are dropped with it.
    pub fn select(&mut self, detail: TableDetail) {
        self.tables.select(detail);
        self.results.clear();
    }

    pub fn deselect(&mut self) -> Option<TableDetail> {
        self.results.clear();
        self.tables.deselect()
    }

    pub fn clear(&mut self) {
        self.tables.clear();
        self.results.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty() && self.results.is_empty()
    }
}
