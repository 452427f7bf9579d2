use crate::busy::BusyGuard;
use crate::remote::RemoteError;
use crate::session::{AuthError, SessionEpoch};
use model::query::{SelectAll, SelectColumn};
use model::table::{CreateTable, DropTable, GetTableDetails, InsertInto};
use model::{CellValue, ColumnName, Identity, Row, TableDetail, TableName};
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use strum::Display;
use tracing::{Instrument, debug_span};

/// A remote call the controller orchestrates. At most one is in flight.
#[derive(Clone, Debug, PartialEq, Eq, Display)]
pub enum Operation {
    Login,
    ListTables,
    SelectTable(GetTableDetails),
    CreateTable(CreateTable),
    InsertRow(InsertInto),
    DropTable(DropTable),
    QueryColumn(SelectColumn),
    QueryAll(SelectAll),
}

/// Raw answer of the collaborator, before it is applied to local state.
#[derive(Debug)]
pub enum Outcome {
    LoggedIn(Result<Identity, AuthError>),
    TablesListed(Result<Vec<TableName>, RemoteError>),
    TableSelected(Result<TableDetail, RemoteError>),
    TableCreated(Result<(), RemoteError>),
    RowInserted {
        table: TableName,
        result: Result<(), RemoteError>,
    },
    TableDropped {
        table: TableName,
        result: Result<(), RemoteError>,
    },
    ColumnQueried {
        column: ColumnName,
        result: Result<Vec<CellValue>, RemoteError>,
    },
    TableQueried(Result<Vec<Row>, RemoteError>),
}

pub type OutcomeFuture = Pin<Box<dyn Future<Output = Outcome> + Send>>;

/// Identifies a dispatched operation and the session it was dispatched in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ticket {
    pub id: u64,
    pub epoch: SessionEpoch,
    pub operation: Operation,
}

/// A settled remote call, still holding the busy flag until it is applied.
#[derive(Debug)]
pub struct Completion {
    pub ticket: Ticket,
    pub outcome: Outcome,
    pub(crate) guard: BusyGuard,
}

/// The in-flight remote call. Polling it drives the call; dropping it
/// releases the busy flag.
pub struct PendingOperation {
    ticket: Ticket,
    future: Pin<Box<dyn Future<Output = Completion> + Send>>,
}

impl PendingOperation {
    pub(crate) fn new(ticket: Ticket, guard: BusyGuard, call: OutcomeFuture) -> Self {
        let span = debug_span!("operation", id = ticket.id, operation = %ticket.operation);
        let completion_ticket = ticket.clone();
        let future = Box::pin(
            async move {
                let outcome = call.await;
                Completion {
                    ticket: completion_ticket,
                    outcome,
                    guard,
                }
            }
            .instrument(span),
        );
        Self { ticket, future }
    }
}

impl Future for PendingOperation {
    type Output = Completion;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.future.as_mut().poll(cx)
    }
}

impl std::fmt::Debug for PendingOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingOperation")
            .field("ticket", &self.ticket)
            .finish_non_exhaustive()
    }
}
