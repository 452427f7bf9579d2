//! Data service stand-ins for unit tests that never reach a real service.

use crate::remote::{DataService, RemoteError};
use async_trait::async_trait;
use model::query::{SelectAll, SelectColumn};
use model::table::{CreateTable, DropTable, GetTableDetails, InsertInto};
use model::{CellValue, Identity, Row, TableDetail, TableName};

/// Panics on any call.
pub(crate) struct NoService;

#[async_trait]
impl DataService for NoService {
    async fn list_tables(&self, _: &Identity) -> Result<Vec<TableName>, RemoteError> {
        unimplemented!()
    }
    async fn create_table(&self, _: &Identity, _: CreateTable) -> Result<(), RemoteError> {
        unimplemented!()
    }
    async fn get_table_details(
        &self,
        _: &Identity,
        _: GetTableDetails,
    ) -> Result<TableDetail, RemoteError> {
        unimplemented!()
    }
    async fn insert_into(&self, _: &Identity, _: InsertInto) -> Result<(), RemoteError> {
        unimplemented!()
    }
    async fn select(&self, _: &Identity, _: SelectColumn) -> Result<Vec<CellValue>, RemoteError> {
        unimplemented!()
    }
    async fn select_all(&self, _: &Identity, _: SelectAll) -> Result<Vec<Row>, RemoteError> {
        unimplemented!()
    }
    async fn drop_table(&self, _: &Identity, _: DropTable) -> Result<(), RemoteError> {
        unimplemented!()
    }
}

/// Never answers.
pub(crate) struct Unresponsive;

#[async_trait]
impl DataService for Unresponsive {
    async fn list_tables(&self, _: &Identity) -> Result<Vec<TableName>, RemoteError> {
        std::future::pending().await
    }
    async fn create_table(&self, _: &Identity, _: CreateTable) -> Result<(), RemoteError> {
        std::future::pending().await
    }
    async fn get_table_details(
        &self,
        _: &Identity,
        _: GetTableDetails,
    ) -> Result<TableDetail, RemoteError> {
        std::future::pending().await
    }
    async fn insert_into(&self, _: &Identity, _: InsertInto) -> Result<(), RemoteError> {
        std::future::pending().await
    }
    async fn select(&self, _: &Identity, _: SelectColumn) -> Result<Vec<CellValue>, RemoteError> {
        std::future::pending().await
    }
    async fn select_all(&self, _: &Identity, _: SelectAll) -> Result<Vec<Row>, RemoteError> {
        std::future::pending().await
    }
    async fn drop_table(&self, _: &Identity, _: DropTable) -> Result<(), RemoteError> {
        std::future::pending().await
    }
}
