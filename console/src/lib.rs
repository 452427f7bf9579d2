pub mod config;
pub mod console;
pub mod message_bus;
mod request_handler;

pub use config::{ConfigError, ConsoleConfig};
pub use console::{ConsoleRequest, GetSnapshot, start, start_test};
pub use message_bus::ConsoleHandle;
