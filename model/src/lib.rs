pub mod identity;
pub mod query;
pub mod session_state;
pub mod table;

#[cfg(feature = "testing")]
pub mod testing;

pub use identity::{Identity, Principal};
pub use session_state::SessionState;
pub use table::{CellValue, ColumnName, Row, TableDetail, TableName};
