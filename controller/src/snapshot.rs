use catalog::Notification;
use model::query::ColumnResult;
use model::table::RowDraft;
use model::{Principal, Row, SessionState, TableDetail, TableName};

/// Read-only view of the controller state handed to the presentation layer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub session: SessionState,
    pub principal: Option<Principal>,
    pub tables: Vec<TableName>,
    pub selected: Option<TableDetail>,
    pub draft: RowDraft,
    pub column_result: Option<ColumnResult>,
    pub table_result: Vec<Row>,
    pub notification: Option<Notification>,
    pub busy: bool,
}

impl Snapshot {
    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    /// True when nothing from a previous session is left behind.
    pub fn is_cleared(&self) -> bool {
        self.principal.is_none()
            && self.tables.is_empty()
            && self.selected.is_none()
            && self.draft.is_empty()
            && self.column_result.is_none()
            && self.table_result.is_empty()
    }
}
