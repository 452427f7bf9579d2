use crate::gate::Gate;
use async_trait::async_trait;
use controller::{DataService, RemoteError};
use model::query::{SelectAll, SelectColumn};
use model::table::{CreateTable, DropTable, GetTableDetails, InsertInto};
use model::{CellValue, ColumnName, Identity, Principal, Row, TableDetail, TableName};
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::debug;

/// A call as received by [`InMemoryDataService`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReceivedCall {
    ListTables,
    CreateTable(CreateTable),
    GetTableDetails(GetTableDetails),
    InsertInto(InsertInto),
    Select(SelectColumn),
    SelectAll(SelectAll),
    DropTable(DropTable),
}

#[derive(Debug, Clone)]
struct StoredTable {
    name: TableName,
    columns: Vec<ColumnName>,
    rows: Vec<Row>,
}

#[derive(Debug, Default)]
struct Store {
    // Tables per principal, in creation order
    tables: HashMap<Principal, Vec<StoredTable>>,
    received: Vec<ReceivedCall>,
    fail_next: Option<RemoteError>,
}

/// Data service double with per-principal tables and the failure modes of
/// the real service: name collisions, unknown tables and columns, arity
/// mismatches.
#[derive(Debug, Default)]
pub struct InMemoryDataService {
    store: Mutex<Store>,
    gate: Gate,
}

impl InMemoryDataService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Calls wait here before they are answered.
    pub fn gate(&self) -> &Gate {
        &self.gate
    }

    /// The next call, whatever it is, fails with `err`.
    pub fn fail_next(&self, err: RemoteError) {
        self.lock().fail_next = Some(err);
    }

    /// The service's own view of `principal`'s tables.
    pub fn tables_of(&self, principal: &Principal) -> Vec<TableName> {
        self.lock()
            .tables
            .get(principal)
            .map(|tables| tables.iter().map(|t| t.name.clone()).collect())
            .unwrap_or_default()
    }

    /// Creates a table directly, as if another client had done it.
    pub fn create_table_for(&self, identity: &Identity, req: CreateTable) -> Result<(), RemoteError> {
        let mut store = self.lock();
        create(
            store.tables.entry(identity.principal().clone()).or_default(),
            req,
        )
    }

    /// Drops a table directly, as if another client had done it.
    pub fn drop_table_for(&self, identity: &Identity, name: &str) -> Result<(), RemoteError> {
        let mut store = self.lock();
        drop_named(store.tables.entry(identity.principal().clone()).or_default(), name)
    }

    pub fn received(&self) -> Vec<ReceivedCall> {
        self.lock().received.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Store> {
        self.store
            .lock()
            .expect("No one should panic while holding this lock")
    }

    /// Records the call, waits at the gate, then answers through `f`.
    async fn answer<T>(
        &self,
        identity: &Identity,
        call: ReceivedCall,
        f: impl FnOnce(&mut Vec<StoredTable>) -> Result<T, RemoteError>,
    ) -> Result<T, RemoteError> {
        debug!(principal = %identity.principal(), ?call, "Received");
        self.lock().received.push(call);
        self.gate.pass().await;

        let mut store = self.lock();
        if let Some(err) = store.fail_next.take() {
            return Err(err);
        }
        let tables = store
            .tables
            .entry(identity.principal().clone())
            .or_default();
        f(tables)
    }
}

fn create(tables: &mut Vec<StoredTable>, req: CreateTable) -> Result<(), RemoteError> {
    if req.name.is_empty() {
        return Err(RemoteError::Rejected("Table name must not be empty".into()));
    }
    if req.columns.is_empty() {
        return Err(RemoteError::Rejected(
            "Table must have at least one column".into(),
        ));
    }
    if tables.iter().any(|t| t.name == req.name) {
        return Err(RemoteError::Rejected(format!(
            "Table '{}' already exists",
            req.name
        )));
    }
    for (i, column) in req.columns.iter().enumerate() {
        if req.columns[..i].contains(column) {
            return Err(RemoteError::Rejected(format!("Duplicate column '{column}'")));
        }
    }
    tables.push(StoredTable {
        name: req.name,
        columns: req.columns,
        rows: Vec::new(),
    });
    Ok(())
}

fn drop_named(tables: &mut Vec<StoredTable>, name: &str) -> Result<(), RemoteError> {
    let before = tables.len();
    tables.retain(|t| t.name != name);
    if tables.len() == before {
        return Err(not_found(name));
    }
    Ok(())
}

fn not_found(name: &str) -> RemoteError {
    RemoteError::Rejected(format!("Table '{name}' not found"))
}

fn find<'a>(tables: &'a mut [StoredTable], name: &str) -> Result<&'a mut StoredTable, RemoteError> {
    tables
        .iter_mut()
        .find(|t| t.name == name)
        .ok_or_else(|| not_found(name))
}

#[async_trait]
impl DataService for InMemoryDataService {
    async fn list_tables(&self, identity: &Identity) -> Result<Vec<TableName>, RemoteError> {
        self.answer(identity, ReceivedCall::ListTables, |tables| {
            Ok(tables.iter().map(|t| t.name.clone()).collect())
        })
        .await
    }

    async fn create_table(&self, identity: &Identity, req: CreateTable) -> Result<(), RemoteError> {
        self.answer(identity, ReceivedCall::CreateTable(req.clone()), |tables| {
            create(tables, req)
        })
        .await
    }

    async fn get_table_details(
        &self,
        identity: &Identity,
        req: GetTableDetails,
    ) -> Result<TableDetail, RemoteError> {
        self.answer(identity, ReceivedCall::GetTableDetails(req.clone()), |tables| {
            let table = find(tables, &req.name)?;
            Ok(TableDetail {
                name: table.name.clone(),
                columns: table.columns.clone(),
                row_count: table.rows.len() as u64,
            })
        })
        .await
    }

    async fn insert_into(&self, identity: &Identity, req: InsertInto) -> Result<(), RemoteError> {
        self.answer(identity, ReceivedCall::InsertInto(req.clone()), |tables| {
            let table = find(tables, &req.table)?;
            if req.values.len() != table.columns.len() {
                return Err(RemoteError::Rejected(format!(
                    "Expected {} values, got {}",
                    table.columns.len(),
                    req.values.len()
                )));
            }
            table.rows.push(req.values);
            Ok(())
        })
        .await
    }

    async fn select(
        &self,
        identity: &Identity,
        req: SelectColumn,
    ) -> Result<Vec<CellValue>, RemoteError> {
        self.answer(identity, ReceivedCall::Select(req.clone()), |tables| {
            let table = find(tables, &req.table)?;
            let index = table
                .columns
                .iter()
                .position(|c| *c == req.column)
                .ok_or_else(|| RemoteError::Rejected(format!("Column '{}' not found", req.column)))?;
            Ok(table.rows.iter().map(|row| row[index].clone()).collect())
        })
        .await
    }

    async fn select_all(&self, identity: &Identity, req: SelectAll) -> Result<Vec<Row>, RemoteError> {
        self.answer(identity, ReceivedCall::SelectAll(req.clone()), |tables| {
            Ok(find(tables, &req.table)?.rows.clone())
        })
        .await
    }

    async fn drop_table(&self, identity: &Identity, req: DropTable) -> Result<(), RemoteError> {
        self.answer(identity, ReceivedCall::DropTable(req.clone()), |tables| {
            drop_named(tables, &req.name)
        })
        .await
    }
}
