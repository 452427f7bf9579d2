//! Session-and-table orchestration for user-scoped remote tables.

pub use catalog;
pub use console;
pub use controller;
pub use model;

pub use console::{ConsoleConfig, ConsoleHandle, start, start_test};
pub use controller::{Controller, ControllerConfig, ControllerError, Intent, Snapshot};
