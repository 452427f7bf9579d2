use crate::busy::{BusyFlag, BusyGuard};
use crate::config::ControllerConfig;
use crate::error::{ControllerError, OperationError};
use crate::mutation::MutationOrchestrator;
use crate::operation::{Completion, Operation, Outcome, OutcomeFuture, PendingOperation, Ticket};
use crate::query::QueryExecutor;
use crate::registry::TableRegistry;
use crate::remote::{DataService, Remote};
use crate::session::{IdentityProvider, SessionManager};
use crate::snapshot::Snapshot;
use catalog::{Catalog, Notification, NotificationChannel};
use model::table::{CreateTable, DropTable, GetTableDetails};
use model::{CellValue, ColumnName, Principal, SessionState, TableName};
use std::sync::{Arc, Weak};
use tokio::sync::watch;
use tracing::{debug, instrument, warn};

/// A user intent forwarded by the presentation layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Intent {
    Login,
    Logout,
    RefreshTables,
    SelectTable(TableName),
    Deselect,
    CreateTable(CreateTable),
    SetDraftValue { column: ColumnName, value: CellValue },
    InsertRow,
    DropTable(TableName),
    QueryColumn(ColumnName),
    QueryAll,
}

/// Intents answered from local state.
#[derive(Debug)]
enum LocalIntent {
    Logout,
    Deselect,
    SetDraftValue { column: ColumnName, value: CellValue },
}

/// Intents that start a remote call.
#[derive(Debug)]
enum RemoteIntent {
    Login,
    RefreshTables,
    SelectTable(TableName),
    CreateTable(CreateTable),
    InsertRow,
    DropTable(TableName),
    QueryColumn(ColumnName),
    QueryAll,
}

#[derive(Debug)]
enum Route {
    Local(LocalIntent),
    Remote(RemoteIntent),
}

impl From<Intent> for Route {
    fn from(intent: Intent) -> Self {
        match intent {
            Intent::Logout => Route::Local(LocalIntent::Logout),
            Intent::Deselect => Route::Local(LocalIntent::Deselect),
            Intent::SetDraftValue { column, value } => {
                Route::Local(LocalIntent::SetDraftValue { column, value })
            }
            Intent::Login => Route::Remote(RemoteIntent::Login),
            Intent::RefreshTables => Route::Remote(RemoteIntent::RefreshTables),
            Intent::SelectTable(name) => Route::Remote(RemoteIntent::SelectTable(name)),
            Intent::CreateTable(req) => Route::Remote(RemoteIntent::CreateTable(req)),
            Intent::InsertRow => Route::Remote(RemoteIntent::InsertRow),
            Intent::DropTable(name) => Route::Remote(RemoteIntent::DropTable(name)),
            Intent::QueryColumn(column) => Route::Remote(RemoteIntent::QueryColumn(column)),
            Intent::QueryAll => Route::Remote(RemoteIntent::QueryAll),
        }
    }
}

/// The operation last started, valid while its busy guard is alive.
#[derive(Debug)]
struct InFlight {
    operation: Operation,
    lease: Weak<()>,
}

#[derive(Debug)]
pub enum Dispatched {
    /// Handled locally, nothing left in flight.
    Done,
    /// A remote call was started and must be driven to completion.
    Pending(PendingOperation),
}

#[derive(Debug)]
pub enum Settled {
    Done(Result<(), ControllerError>),
    /// The operation succeeded and requires a refresh, which keeps the busy
    /// flag of the operation it follows.
    FollowUp(PendingOperation),
}

/// Owns all session-scoped state and mediates every change to it.
///
/// Remote work is split into [`Controller::dispatch`], which validates the
/// intent, takes the busy flag and returns the call to drive, and
/// [`Controller::settle`], which applies the answer. Between the two the
/// controller may still log out; answers from an ended session are dropped.
pub struct Controller {
    session: SessionManager,
    registry: TableRegistry,
    mutations: MutationOrchestrator,
    queries: QueryExecutor,
    catalog: Catalog,
    notifications: NotificationChannel,
    busy: BusyFlag,
    in_flight: Option<InFlight>,
    last_ticket: u64,
}

impl Controller {
    pub fn new(
        config: &ControllerConfig,
        service: Arc<dyn DataService>,
        provider: Arc<dyn IdentityProvider>,
    ) -> Self {
        let remote = Remote::new(service, config.rpc_timeout_duration());
        Self {
            session: SessionManager::new(provider, config.identity_provider.clone()),
            registry: TableRegistry::new(remote.clone()),
            mutations: MutationOrchestrator::new(remote.clone()),
            queries: QueryExecutor::new(remote),
            catalog: Catalog::new(),
            notifications: NotificationChannel::new(config.notification_ttl_duration()),
            busy: BusyFlag::default(),
            in_flight: None,
            last_ticket: 0,
        }
    }

    /// Recovers an existing session and, if there is one, loads its tables.
    /// Must run before any other intent is dispatched.
    #[instrument(skip(self))]
    pub async fn initialize(&mut self) -> Option<Principal> {
        let recovered = self
            .session
            .initialize()
            .await
            .map(|identity| identity.principal().clone());

        if recovered.is_some() {
            // A failed fetch has already been raised as a notification
            if let Err(e) = self.execute(Intent::RefreshTables).await {
                debug!("Initial table fetch did not complete: {e}");
            }
        }
        recovered
    }

    pub async fn dispatch(&mut self, intent: Intent) -> Result<Dispatched, ControllerError> {
        debug!(?intent, "Dispatching");
        let dispatched = self.dispatch_intent(intent).await;
        if let Err(e) = &dispatched {
            warn!("Rejected: {e}");
        }
        dispatched
    }

    async fn dispatch_intent(&mut self, intent: Intent) -> Result<Dispatched, ControllerError> {
        match Route::from(intent) {
            Route::Local(intent) => {
                self.handle_local(intent).await?;
                Ok(Dispatched::Done)
            }
            Route::Remote(intent) => {
                if !matches!(intent, RemoteIntent::Login) {
                    self.session.require_identity()?;
                }
                let guard = self.acquire()?;
                let operation = self.prepare(intent)?;
                let call = self.call(&operation)?;
                Ok(Dispatched::Pending(self.start(operation, guard, call)))
            }
        }
    }

    async fn handle_local(&mut self, intent: LocalIntent) -> Result<(), ControllerError> {
        match intent {
            LocalIntent::Logout => self.end_session().await,
            LocalIntent::SetDraftValue { column, value } => {
                // The draft is replaced once the in-flight call settles
                if matches!(
                    self.in_flight(),
                    Some(Operation::InsertRow(_) | Operation::SelectTable(_))
                ) {
                    return Err(ControllerError::Busy);
                }
                self.catalog.tables.set_draft_value(&column, value)?;
            }
            LocalIntent::Deselect => {
                self.ensure_idle()?;
                self.registry.deselect(&mut self.catalog);
            }
        }
        Ok(())
    }

    /// Applies a finished remote call. The busy flag is released here unless
    /// a follow-up call takes it over.
    #[instrument(skip_all, fields(id = completion.ticket.id, operation = %completion.ticket.operation))]
    pub fn settle(&mut self, completion: Completion) -> Settled {
        let Completion {
            ticket,
            outcome,
            guard,
        } = completion;

        if ticket.epoch != self.session.epoch() {
            warn!(
                dispatched_in = ticket.epoch,
                current = self.session.epoch(),
                "Discarding answer from an ended session"
            );
            return Settled::Done(Err(ControllerError::Discarded));
        }

        match self.apply(outcome) {
            Ok(None) => {
                debug!("Settled");
                Settled::Done(Ok(()))
            }
            Ok(Some(next)) => match self.call(&next) {
                Ok(call) => Settled::FollowUp(self.start(next, guard, call)),
                Err(e) => Settled::Done(Err(e)),
            },
            Err(e) => {
                self.notifications.raise(e.to_string());
                Settled::Done(Err(e.into()))
            }
        }
    }

    /// Dispatches `intent` and drives it, including follow-ups, to the end.
    pub async fn execute(&mut self, intent: Intent) -> Result<(), ControllerError> {
        let mut pending = match self.dispatch(intent).await? {
            Dispatched::Done => return Ok(()),
            Dispatched::Pending(pending) => pending,
        };
        loop {
            let completion = pending.await;
            match self.settle(completion) {
                Settled::Done(result) => return result,
                Settled::FollowUp(next) => pending = next,
            }
        }
    }

    pub async fn login(&mut self) -> Result<(), ControllerError> {
        self.execute(Intent::Login).await
    }

    pub async fn logout(&mut self) -> Result<(), ControllerError> {
        self.execute(Intent::Logout).await
    }

    pub async fn refresh_tables(&mut self) -> Result<(), ControllerError> {
        self.execute(Intent::RefreshTables).await
    }

    pub async fn select_table(&mut self, name: impl Into<TableName>) -> Result<(), ControllerError> {
        self.execute(Intent::SelectTable(name.into())).await
    }

    pub async fn deselect(&mut self) -> Result<(), ControllerError> {
        self.execute(Intent::Deselect).await
    }

    pub async fn create_table<I, C>(
        &mut self,
        name: impl Into<TableName>,
        columns: I,
    ) -> Result<(), ControllerError>
    where
        I: IntoIterator<Item = C>,
        C: Into<ColumnName>,
    {
        let req = CreateTable::new(name).with_columns(columns);
        self.execute(Intent::CreateTable(req)).await
    }

    pub async fn set_draft_value(
        &mut self,
        column: impl Into<ColumnName>,
        value: impl Into<CellValue>,
    ) -> Result<(), ControllerError> {
        self.execute(Intent::SetDraftValue {
            column: column.into(),
            value: value.into(),
        })
        .await
    }

    pub async fn insert_row(&mut self) -> Result<(), ControllerError> {
        self.execute(Intent::InsertRow).await
    }

    pub async fn drop_table(&mut self, name: impl Into<TableName>) -> Result<(), ControllerError> {
        self.execute(Intent::DropTable(name.into())).await
    }

    pub async fn query_column(
        &mut self,
        column: impl Into<ColumnName>,
    ) -> Result<(), ControllerError> {
        self.execute(Intent::QueryColumn(column.into())).await
    }

    pub async fn query_all(&mut self) -> Result<(), ControllerError> {
        self.execute(Intent::QueryAll).await
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    /// `Authenticating` while a login call is in flight, otherwise the
    /// session's settled state.
    pub fn session_state(&self) -> SessionState {
        match self.in_flight() {
            Some(Operation::Login) => SessionState::Authenticating,
            _ => self.session.state(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn notification(&self) -> Option<Notification> {
        self.notifications.current()
    }

    pub fn subscribe_notifications(&self) -> watch::Receiver<Option<Notification>> {
        self.notifications.subscribe()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.is_busy()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            session: self.session_state(),
            principal: self.session.principal().cloned(),
            tables: self.catalog.tables.tables().to_vec(),
            selected: self.catalog.tables.selected().cloned(),
            draft: self.catalog.tables.draft().clone(),
            column_result: self.catalog.results.column().cloned(),
            table_result: self.catalog.results.table().to_vec(),
            notification: self.notifications.current(),
            busy: self.busy.is_busy(),
        }
    }

    async fn end_session(&mut self) {
        // Revocation failures are logged by the session manager; local state
        // is cleared regardless.
        let _ = self.session.logout().await;
        self.catalog.clear();
        // An answer still in flight is discarded when it settles
        self.in_flight = None;
    }

    fn in_flight(&self) -> Option<&Operation> {
        self.in_flight
            .as_ref()
            .filter(|in_flight| in_flight.lease.strong_count() > 0)
            .map(|in_flight| &in_flight.operation)
    }

    fn ensure_idle(&self) -> Result<(), ControllerError> {
        if self.busy.is_busy() {
            return Err(ControllerError::Busy);
        }
        Ok(())
    }

    fn acquire(&self) -> Result<BusyGuard, ControllerError> {
        self.busy.try_acquire().ok_or(ControllerError::Busy)
    }

    /// Local preparation of a remote intent, done once the busy flag is held.
    fn prepare(&mut self, intent: RemoteIntent) -> Result<Operation, ControllerError> {
        let operation = match intent {
            RemoteIntent::Login => Operation::Login,
            RemoteIntent::RefreshTables => Operation::ListTables,
            RemoteIntent::SelectTable(name) => Operation::SelectTable(GetTableDetails::new(name)),
            RemoteIntent::CreateTable(req) => {
                Operation::CreateTable(self.mutations.prepare_create(req))
            }
            RemoteIntent::InsertRow => {
                Operation::InsertRow(self.mutations.prepare_insert(&self.catalog)?)
            }
            RemoteIntent::DropTable(name) => Operation::DropTable(DropTable::new(name)),
            RemoteIntent::QueryColumn(column) => {
                Operation::QueryColumn(self.queries.prepare_column(&mut self.catalog, column)?)
            }
            RemoteIntent::QueryAll => {
                Operation::QueryAll(self.queries.prepare_all(&mut self.catalog)?)
            }
        };
        Ok(operation)
    }

    fn call(&mut self, operation: &Operation) -> Result<OutcomeFuture, ControllerError> {
        let call = match operation.clone() {
            Operation::Login => return self.session.begin_login(),
            Operation::ListTables => self.registry.refresh_list(self.session.require_identity()?),
            Operation::SelectTable(req) => {
                self.registry.select(self.session.require_identity()?, req)
            }
            Operation::CreateTable(req) => {
                self.mutations.create_table(self.session.require_identity()?, req)
            }
            Operation::InsertRow(req) => {
                self.mutations.insert_row(self.session.require_identity()?, req)
            }
            Operation::DropTable(req) => {
                self.mutations.drop_table(self.session.require_identity()?, req)
            }
            Operation::QueryColumn(req) => {
                self.queries.query_column(self.session.require_identity()?, req)
            }
            Operation::QueryAll(req) => self.queries.query_all(self.session.require_identity()?, req),
        };
        Ok(call)
    }

    fn start(&mut self, operation: Operation, guard: BusyGuard, call: OutcomeFuture) -> PendingOperation {
        self.last_ticket += 1;
        let ticket = Ticket {
            id: self.last_ticket,
            epoch: self.session.epoch(),
            operation,
        };
        debug!(id = ticket.id, operation = %ticket.operation, "Started");
        self.in_flight = Some(InFlight {
            operation: ticket.operation.clone(),
            lease: guard.lease(),
        });
        PendingOperation::new(ticket, guard, call)
    }

    fn apply(&mut self, outcome: Outcome) -> Result<Option<Operation>, OperationError> {
        match outcome {
            Outcome::LoggedIn(result) => {
                self.session.complete_login(result)?;
                Ok(Some(Operation::ListTables))
            }
            Outcome::TablesListed(result) => self
                .registry
                .apply_list(&mut self.catalog, result)
                .map(|_| None),
            Outcome::TableSelected(result) => self
                .registry
                .apply_select(&mut self.catalog, result)
                .map(|_| None),
            Outcome::TableCreated(result) => self.mutations.apply_create(result).map(Some),
            Outcome::RowInserted { table, result } => self
                .mutations
                .apply_insert(&mut self.catalog, table, result)
                .map(Some),
            Outcome::TableDropped { table, result } => self
                .mutations
                .apply_drop(&mut self.catalog, table, result)
                .map(Some),
            Outcome::ColumnQueried { column, result } => self
                .queries
                .apply_column(&mut self.catalog, column, result)
                .map(|_| None),
            Outcome::TableQueried(result) => self
                .queries
                .apply_all(&mut self.catalog, result)
                .map(|_| None),
        }
    }
}

impl std::fmt::Debug for Controller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Controller")
            .field("session", &self.session)
            .field("catalog", &self.catalog)
            .field("busy", &self.busy.is_busy())
            .finish_non_exhaustive()
    }
}
